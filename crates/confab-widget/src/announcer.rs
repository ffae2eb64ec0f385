//! Live-region announcer.
//!
//! One region per widget, updated in place so queued announcements replace
//! each other instead of stacking stale nodes. Each update starts a TTL
//! after which the region empties, unless a newer announcement superseded
//! it first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use confab_core::{Announcement, Announcer, Priority};

const DEFAULT_TTL: Duration = Duration::from_secs(1);

/// Screen-reader live region backing [`Announcer`].
///
/// Clones share the same region, so the host can keep one handle for
/// painting while the widget holds another for announcing. Expiry runs on a
/// spawned task; announce from inside a tokio runtime.
#[derive(Clone)]
pub struct LiveRegion {
    inner: Arc<RegionInner>,
    ttl: Duration,
}

struct RegionInner {
    current: Mutex<Option<Announcement>>,
    epoch: AtomicU64,
}

impl LiveRegion {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RegionInner {
                current: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
            ttl,
        }
    }

    /// The announcement currently in the region, if it has not expired.
    pub fn current(&self) -> Option<Announcement> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for LiveRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl Announcer for LiveRegion {
    fn announce(&self, text: &str, priority: Priority) {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Announcement::new(text, priority));

        let inner = Arc::clone(&self.inner);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            // A later announcement owns the region now; leave it alone.
            if inner.epoch.load(Ordering::SeqCst) == epoch {
                inner
                    .current
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_announcement_is_readable_until_ttl() {
        let region = LiveRegion::with_ttl(Duration::from_millis(100));
        region.announce("AI Chatbot opened", Priority::Polite);

        let current = region.current().expect("region holds the announcement");
        assert_eq!(current.text, "AI Chatbot opened");
        assert_eq!(current.priority, Priority::Polite);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(region.current().is_none());
    }

    #[tokio::test]
    async fn test_newer_announcement_survives_older_expiry() {
        let region = LiveRegion::with_ttl(Duration::from_millis(100));
        region.announce("first", Priority::Polite);
        tokio::time::sleep(Duration::from_millis(60)).await;
        region.announce("second", Priority::Assertive);

        // The first announcement's TTL elapses here; the second must stay.
        tokio::time::sleep(Duration::from_millis(80)).await;
        let current = region.current().expect("second announcement still live");
        assert_eq!(current.text, "second");

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(region.current().is_none());
    }
}

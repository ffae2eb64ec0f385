//! Sanitizing markdown renderer for assistant turns.
//!
//! Assistant text may carry markdown but is never trusted as markup: raw
//! HTML events are demoted to text (which the HTML writer escapes), and
//! link/image destinations are dropped unless they use an allowed scheme.
//! User turns never pass through here; they are escaped verbatim.

use pulldown_cmark::{Event, Options, Parser, Tag, html};

/// Renders assistant markdown to sanitized HTML.
pub fn render_assistant_markup(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = if safe_destination(&dest_url) {
                dest_url
            } else {
                "".into()
            };
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => {
            let dest_url = if safe_destination(&dest_url) {
                dest_url
            } else {
                "".into()
            };
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            })
        }
        other => other,
    });

    let mut rendered = String::new();
    html::push_html(&mut rendered, events);
    rendered
}

/// Allows absolute http/https/mailto destinations and scheme-less relative
/// paths; everything else is stripped.
fn safe_destination(dest: &str) -> bool {
    let normalized = dest.trim().to_ascii_lowercase();
    normalized.starts_with("http://")
        || normalized.starts_with("https://")
        || normalized.starts_with("mailto:")
        || !normalized.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_emphasis_and_strikethrough() {
        let rendered = render_assistant_markup("an **up** day, ~~flat~~");
        assert!(rendered.contains("<strong>up</strong>"));
        assert!(rendered.contains("<del>flat</del>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let rendered = render_assistant_markup("<script>alert('x')</script>");
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_inline_html_is_escaped() {
        let rendered = render_assistant_markup("spread is <b>wide</b> today");
        assert!(!rendered.contains("<b>"));
        assert!(rendered.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_script_scheme_links_are_stripped() {
        let rendered = render_assistant_markup("[click](javascript:alert(1))");
        assert!(rendered.contains(r#"href="""#));
        assert!(!rendered.contains("javascript:"));
    }

    #[test]
    fn test_http_and_relative_links_survive() {
        let rendered = render_assistant_markup("[docs](https://example.test/docs) and [local](/charts)");
        assert!(rendered.contains(r#"href="https://example.test/docs""#));
        assert!(rendered.contains(r#"href="/charts""#));
    }

    #[test]
    fn test_data_url_images_are_stripped() {
        let rendered = render_assistant_markup("![x](data:image/svg+xml;base64,AAAA)");
        assert!(rendered.contains(r#"src="""#));
        assert!(!rendered.contains("data:"));
    }
}

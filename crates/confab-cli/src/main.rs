//! Readline chat host for the Confab widget.
//!
//! Wires the HTTP answer client, an in-memory session store, and a live
//! region into the widget, then runs a REPL that paints the view tree after
//! every action. The `[sr polite]`/`[sr assertive]` lines echo whatever the
//! live region currently holds, the way a screen reader would speak it.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use confab_core::{Announcer, AnswerService, MemorySessionStore, Role, SessionStore};
use confab_transport::HttpAnswerClient;
use confab_widget::{
    AdvisoryState, ChatbotWidget, HostMount, LiveRegion, PaneNode, SubmitOutcome, WidgetChrome,
    WidgetOptions,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "confab")]
#[command(about = "Chat with the Confab answering service from a terminal", long_about = None)]
struct Cli {
    /// Base URL of the answering service.
    #[arg(long)]
    base_url: Option<String>,

    /// CSRF token forwarded with every request.
    #[arg(long)]
    csrf_token: Option<String>,

    /// Page path sent to the service as context.
    #[arg(long)]
    page: Option<String>,

    /// Render assistant replies as sanitized markdown.
    #[arg(long)]
    markdown: bool,

    /// Config file to read instead of ~/.config/confab/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => CliConfig::from_path(path)?,
        None => CliConfig::load()?,
    };

    let base_url = cli
        .base_url
        .or(file.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let page = cli.page.or(file.page).unwrap_or_else(|| "/".to_string());
    let csrf_token = cli.csrf_token.or(file.csrf_token);
    let markdown = cli.markdown || file.markdown.unwrap_or(false);

    let mut client = HttpAnswerClient::new(&base_url);
    if let Some(token) = csrf_token {
        client = client.with_csrf_token(token);
    }
    let service: Arc<dyn AnswerService> = Arc::new(client);
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let region = LiveRegion::new();
    let announcer: Arc<dyn Announcer> = Arc::new(region.clone());

    let mut options = WidgetOptions::default();
    if markdown {
        options = options.with_markdown();
    }

    let widget = ChatbotWidget::mount(
        HostMount::new(page)
            .with_launcher("confab-launcher")
            .with_panel("confab-panel"),
        service,
        store,
        announcer,
        options,
    )
    .await
    .context("the widget refused to mount")?;

    println!("{}", "=== Confab ===".bright_magenta().bold());
    println!("{}", format!("answering service: {base_url}").bright_black());
    println!(
        "{}",
        "Type a message, or /open /close /clear /retry /quit.".bright_black()
    );
    println!();

    widget.open().await;

    let mut painter = Painter {
        region,
        advisory_noted: false,
    };
    painter.after_action(&widget).await;

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "/quit" | "/exit" => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    "/open" => widget.open().await,
                    "/close" => widget.close().await,
                    "/clear" => {
                        if confirm_clear(&mut rl)? {
                            widget.clear().await;
                        }
                    }
                    "/retry" => retry_last(&widget).await,
                    command if command.starts_with('/') => {
                        println!("{}", "Unknown command".bright_black());
                    }
                    message => {
                        let outcome = widget.submit(message).await;
                        report(&widget, outcome).await;
                    }
                }

                painter.after_action(&widget).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

/// Mirrors chrome state the panel would show: the advisory banner when it
/// first appears, and the live region's current announcement.
struct Painter {
    region: LiveRegion,
    advisory_noted: bool,
}

impl Painter {
    async fn after_action(&mut self, widget: &ChatbotWidget) {
        let view = widget.view().await;
        match view.advisory {
            AdvisoryState::Shown if !self.advisory_noted => {
                self.advisory_noted = true;
                println!("{}", WidgetChrome::ADVISORY_TEXT.yellow());
            }
            AdvisoryState::Shown => {}
            _ => self.advisory_noted = false,
        }

        if let Some(announcement) = self.region.current() {
            println!(
                "{}",
                format!("[sr {}] {}", announcement.priority.as_str(), announcement.text)
                    .bright_black()
                    .italic()
            );
        }
    }
}

fn confirm_clear(rl: &mut DefaultEditor) -> Result<bool> {
    let answer =
        rl.readline("Clear conversation? This will delete your chat history. [y/N] ")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

async fn report(widget: &ChatbotWidget, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Answered => {
            let view = widget.view().await;
            if let Some(turn) = view.conversation.last() {
                if turn.role == Role::Assistant {
                    let prefix = format!("{}>", turn.role);
                    for line in turn.content.lines() {
                        println!("{} {}", prefix.bright_blue().bold(), line.bright_blue());
                    }
                }
            }
        }
        SubmitOutcome::ServiceUnavailable | SubmitOutcome::Failed => {
            let view = widget.view().await;
            let card = view
                .pane
                .nodes()
                .iter()
                .rev()
                .find(|node| matches!(node, PaneNode::ErrorCard { .. }));
            if let Some(PaneNode::ErrorCard {
                text,
                retryable,
                icon,
                ..
            }) = card
            {
                println!("{}", format!("{} {}", icon.as_str(), text).red());
                if *retryable {
                    println!("{}", "Type /retry to try again.".bright_black());
                }
            }
        }
        SubmitOutcome::Busy => {
            println!("{}", "Still waiting on the previous reply.".yellow());
        }
        SubmitOutcome::Ignored | SubmitOutcome::Stale => {}
    }
}

async fn retry_last(widget: &ChatbotWidget) {
    let view = widget.view().await;
    let card = view.pane.nodes().iter().rev().find_map(|node| match node {
        PaneNode::ErrorCard {
            id,
            retryable: true,
            ..
        } => Some(*id),
        _ => None,
    });

    match card {
        Some(card) => {
            let outcome = widget.retry(card).await;
            report(widget, outcome).await;
        }
        None => println!("{}", "Nothing to retry.".bright_black()),
    }
}

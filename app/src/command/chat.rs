//! Interactive terminal widget.
//!
//! Input is read only between questions, so the prompt is effectively
//! disabled while a request is pending.

use std::io::Write;
use std::sync::Arc;

use bookchat_config::{Config, ConfigHost};
use bookchat_conversation::{ChatWidget, SubmitOutcome};
use bookchat_providers::HttpTransport;
use tracing::{debug, info};

use super::build_widget;
use crate::terminal::{TerminalHost, TerminalRenderer};

#[derive(Debug, Clone)]
pub struct ChatInput {
    pub config: Config,
    /// Explicit per-instance base URL
    pub api_url: Option<String>,
    /// Single question to ask (non-interactive mode)
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config_host = ConfigHost::new(input.config, input.api_url);
        let widget = build_widget(&config_host)?;

        let renderer = Arc::new(TerminalRenderer::new(widget.is_open()));
        let host = TerminalHost::new(&config_host, &renderer);

        if let Some(question) = input.message {
            // One-shot: print only the answer, no banner.
            return match widget.submit(&question).await {
                SubmitOutcome::Answered(message) | SubmitOutcome::Failed { message, .. } => {
                    println!("{}", message.text);
                    Ok(())
                }
                SubmitOutcome::Dropped(reason) => anyhow::bail!("Question not sent: {reason:?}"),
            };
        }

        widget.subscribe(Arc::clone(&renderer) as Arc<dyn bookchat_core::ConversationObserver>);
        widget.mount(&host);
        run_loop(&widget, &renderer).await?;
        widget.unmount(&host);

        info!(
            "Conversation ended: {} total messages",
            widget.snapshot().message_count()
        );
        Ok(())
    }
}

async fn run_loop(
    widget: &ChatWidget<HttpTransport>,
    renderer: &TerminalRenderer,
) -> anyhow::Result<()> {
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        match parse_line(&input) {
            LineCommand::Quit => break,
            LineCommand::Toggle => {
                let open = widget.toggle();
                renderer.set_open(open, &widget.snapshot());
            }
            LineCommand::Health => match widget.health().await {
                Ok(report) => println!("Backend status: {}", report.status),
                Err(_) => println!("Backend unreachable."),
            },
            LineCommand::Question(question) => {
                if !widget.is_open() {
                    println!("(assistant hidden, /toggle to open)");
                    continue;
                }
                let outcome = widget.submit(question).await;
                debug!("Submit outcome: {outcome:?}");
            }
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum LineCommand<'a> {
    Quit,
    Toggle,
    Health,
    Question(&'a str),
}

/// Only slash commands are reserved; every other line is a question.
fn parse_line(line: &str) -> LineCommand<'_> {
    match line.trim() {
        "/quit" => LineCommand::Quit,
        "/toggle" => LineCommand::Toggle,
        "/health" => LineCommand::Health,
        question => LineCommand::Question(question),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands_are_recognized() {
        assert_eq!(parse_line("/quit\n"), LineCommand::Quit);
        assert_eq!(parse_line(" /toggle "), LineCommand::Toggle);
        assert_eq!(parse_line("/health"), LineCommand::Health);
    }

    #[test]
    fn bare_words_are_questions() {
        for word in ["quit", "exit", "q"] {
            assert_eq!(parse_line(word), LineCommand::Question(word));
        }
        assert_eq!(
            parse_line("What is chapter 2 about?\n"),
            LineCommand::Question("What is chapter 2 about?")
        );
    }
}

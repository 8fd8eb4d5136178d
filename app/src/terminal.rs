//! Terminal render layer and host adapter.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use bookchat_config::ConfigHost;
use bookchat_core::{ConversationObserver, ConversationState, HostAdapter, Message, Sender};

/// Prints each message once, in id order, while the panel is open.
///
/// Messages that arrive while closed are printed on reopen.
#[derive(Debug)]
pub struct TerminalRenderer {
    last_rendered: AtomicU64,
    open: AtomicBool,
}

impl TerminalRenderer {
    pub const fn new(open: bool) -> Self {
        Self {
            last_rendered: AtomicU64::new(0),
            open: AtomicBool::new(open),
        }
    }

    pub fn set_open(&self, open: bool, state: &ConversationState) {
        self.open.store(open, Ordering::SeqCst);
        if open {
            self.render(state);
        } else {
            println!("(assistant hidden, /toggle to open)");
        }
    }

    fn render(&self, state: &ConversationState) {
        if !self.open.load(Ordering::SeqCst) {
            return;
        }

        let seen = self.last_rendered.load(Ordering::SeqCst);
        let fresh = state.messages_after(seen);
        for message in fresh {
            println!("{}", format_message(message));
        }
        if let Some(last) = fresh.last() {
            self.last_rendered.store(last.id, Ordering::SeqCst);
        }

        if state.pending {
            println!("Thinking...");
        }
        let _ = std::io::stdout().flush();
    }
}

impl ConversationObserver for TerminalRenderer {
    fn on_change(&self, state: &ConversationState) {
        self.render(state);
    }
}

fn format_message(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Assistant => "Assistant",
    };
    format!("{who}: {}", message.text)
}

/// The terminal as a widget host: config-driven URL, banner on mount.
pub struct TerminalHost<'a> {
    config: &'a ConfigHost,
    renderer: &'a TerminalRenderer,
}

impl<'a> TerminalHost<'a> {
    pub const fn new(config: &'a ConfigHost, renderer: &'a TerminalRenderer) -> Self {
        Self { config, renderer }
    }
}

impl HostAdapter for TerminalHost<'_> {
    fn api_base_url(&self) -> Option<String> {
        self.config.api_base_url()
    }

    fn mount(&self, state: &ConversationState) {
        let site = &self.config.config().site;
        println!("=== {} ===", site.title);
        println!("{}", self.config.config().widget.placeholder);
        println!("Commands: /toggle, /health, /quit\n");
        self.renderer.render(state);
    }

    fn unmount(&self) {
        println!("\nSession ended.");
    }
}

//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use bookchat_config::{Config, ConfigHost};
use bookchat_conversation::{ChatWidget, WidgetConfig};
use bookchat_providers::HttpTransport;
use tracing::info;

mod chat;
mod health;
mod info;
mod init;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use health::HealthStrategy;
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Build a widget for the terminal host.
///
/// The base URL is read from the host exactly once, here.
fn build_widget(host: &ConfigHost) -> anyhow::Result<ChatWidget<HttpTransport>> {
    let settings = &host.config().widget;
    let transport = HttpTransport::new(settings.request_timeout())?;

    let widget_config = WidgetConfig::from_host(host)
        .with_greeting(settings.greeting.clone())
        .with_fallback_message(settings.fallback_message.clone())
        .with_start_open(settings.start_open);

    info!("Using backend at {}", widget_config.api_base_url);
    Ok(ChatWidget::new(widget_config, transport))
}

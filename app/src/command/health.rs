use bookchat_config::{Config, ConfigHost};

use super::build_widget;

/// Strategy for probing the backend's `/health` endpoint.
///
/// Unlike a chat turn, a failed probe is reported with its cause and makes
/// the command fail.
#[derive(Debug, Clone, Copy)]
pub struct HealthStrategy;

impl super::CommandStrategy for HealthStrategy {
    type Input = (Config, Option<String>);

    async fn execute(&self, (config, api_url): Self::Input) -> anyhow::Result<()> {
        let host = ConfigHost::new(config, api_url);
        let widget = build_widget(&host)?;
        let url = widget.config().api_base_url.health_url();

        let report = widget
            .health()
            .await
            .map_err(|e| anyhow::anyhow!("Health check against {url} failed: {e}"))?;

        println!("{url}: {}", report.status);
        for (key, value) in &report.details {
            println!("  {key}: {value}");
        }

        if !report.is_healthy() {
            anyhow::bail!("Backend reports status '{}'", report.status);
        }
        Ok(())
    }
}

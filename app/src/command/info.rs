use bookchat_config::{Config, ConfigHost};

/// Strategy for displaying the resolved configuration.
///
/// Shows where the backend URL came from, since four sources compete
/// for it.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = (Config, Option<String>);

    async fn execute(&self, (config, api_url): Self::Input) -> anyhow::Result<()> {
        println!("=== bookchat Configuration ===\n");

        println!("Config file:");
        match Config::config_path() {
            Ok(path) if path.exists() => println!("  {}", path.display()),
            Ok(path) => println!("  {} (not found, using defaults)", path.display()),
            Err(e) => println!("  unavailable: {e}"),
        }
        println!();

        let host = ConfigHost::new(config, api_url);
        let resolved = host.resolved();
        println!("Backend:");
        println!("  Base URL: {} (from {})", resolved.url, resolved.source);
        println!("  Ask: {}", resolved.url.ask_url());
        println!("  Health: {}", resolved.url.health_url());
        println!();

        let config = host.config();
        println!("Widget:");
        println!("  Title: {}", config.site.title);
        println!("  Greeting: {}", truncate(&config.widget.greeting, 60));
        println!(
            "  Fallback: {}",
            truncate(&config.widget.fallback_message, 60)
        );
        println!("  Start Open: {}", config.widget.start_open);
        println!(
            "  Request Timeout: {}s",
            config.widget.request_timeout().as_secs()
        );
        println!();

        println!("Logging:");
        println!("  Level: {}", config.logging.level);

        Ok(())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

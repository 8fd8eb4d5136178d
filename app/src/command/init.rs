use bookchat_config::Config;

/// Strategy for initializing the configuration.
///
/// This strategy creates the default configuration file at `~/bookchat/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;

        println!("✅ Created config file at: {}", path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Set site.api_base_url to your question-answering backend");
        println!("   2. Run 'bookchat health' to check the backend is reachable");
        println!("   3. Run 'bookchat chat' to start asking questions");
        println!();
        Ok(())
    }
}

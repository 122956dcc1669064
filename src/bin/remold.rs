use anyhow::Context;
use clap::Parser;
use remold::config::ConfigLoader;
use remold::logging::init_logging;
use remold::tooling::cli::{Cli, CliContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ConfigLoader::load().context("failed to load configuration")?,
    };

    // CLI log flags take precedence over config and environment defaults.
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        config.logging.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }
    init_logging(Some(&config.logging)).context("failed to initialize logging")?;

    let context = CliContext::new(&config, cli.store.clone())?;
    let output = context.execute(&cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use justtalk::{
    app,
    cli::{handle_config_command, handle_styles_command, Cli, CliCommand},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("JustTalk {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Styles) => {
            handle_styles_command();
            return Ok(());
        }
        Some(CliCommand::Config) => {
            handle_config_command()?;
            return Ok(());
        }
        None => {}
    }

    app::run_service().await
}

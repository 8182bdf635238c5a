mod args;

pub use args::{Cli, CliCommand};

use anyhow::Result;

use crate::config::Config;
use crate::global;
use crate::transform::StyleKind;

pub fn handle_styles_command() {
    println!("Available rewrite styles:\n");
    for style in StyleKind::all() {
        println!("  {:<8} {}", style.as_str(), style.instruction());
    }
}

pub fn handle_config_command() -> Result<()> {
    let config = Config::load()?;

    println!("Config file:    {:?}", global::config_file()?);
    println!("Recording file: {:?}", config.recording_path()?);
    println!(
        "Transcription:  model={} key={}",
        config
            .transcription
            .model
            .as_deref()
            .unwrap_or("(default)"),
        if config.transcription.api_key.is_some() {
            "configured"
        } else {
            "missing"
        }
    );
    println!(
        "Rewrite:        model={} temperature={} key={}",
        config.rewrite.model.as_deref().unwrap_or("(default)"),
        config.rewrite.temperature,
        if config.rewrite.api_key.is_some() {
            "configured"
        } else {
            "missing"
        }
    );
    println!("Server port:    {}", config.server.port);

    Ok(())
}

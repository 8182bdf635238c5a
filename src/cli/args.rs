use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "justtalk")]
#[command(about = "Record a voice note, get it back as styled text", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// List the available rewrite styles and their instructions
    Styles,
    /// Show the resolved configuration
    Config,
}

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hotpaste")]
#[command(about = "Paste clipboard Markdown into Word, WPS and spreadsheets with one hotkey", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Listen for the global hotkey (default mode)
    Run,
    /// Run the pipeline once and exit
    Once {
        /// Wait before reading the clipboard, so the target window can regain focus
        #[arg(short, long, default_value_t = 0)]
        delay_ms: u64,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the configuration file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration if none exists
    Init,
}

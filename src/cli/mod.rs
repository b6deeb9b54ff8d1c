//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

pub mod commands;
pub mod output;

pub use commands::Commands;
pub use output::OutputFormat;

/// dissect - split pasted prompts into typed, editable blocks
#[derive(Parser, Debug)]
#[command(name = "dissect", version, about, propagate_version = true)]
pub struct Cli {
    /// Machine-readable JSON output (shorthand for --format json)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Output format
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file to use instead of the global and project files
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Format forced by flags: `--format` wins, `--robot` alone means JSON.
    /// `None` leaves the choice to the `[robot]` config section.
    #[must_use]
    pub const fn format_override(&self) -> Option<OutputFormat> {
        match (self.format, self.robot) {
            (Some(format), _) => Some(format),
            (None, true) => Some(OutputFormat::Json),
            (None, false) => None,
        }
    }
}

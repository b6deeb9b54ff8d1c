//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use std::path::Path;

use clap::Subcommand;

pub mod classify;
pub mod config;
pub mod edit;
pub mod split;

use crate::app::AppContext;
use crate::error::Result;
use crate::input::{read_prompt_file, read_prompt_stdin};

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Split(args) => split::run(ctx, args),
        Commands::Classify(args) => classify::run(ctx, args),
        Commands::Edit(args) => edit::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a prompt into classified blocks
    Split(split::SplitArgs),

    /// Classify a single piece of text
    Classify(classify::ClassifyArgs),

    /// Dissect a prompt and replay an edit script over the blocks
    Edit(edit::EditArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),
}

/// Read prompt text from a file, or from stdin when `path` is `-`.
pub(crate) fn read_input(ctx: &AppContext, path: &Path) -> Result<String> {
    let max_bytes = ctx.config.input.max_bytes;
    if path == Path::new("-") {
        read_prompt_stdin(max_bytes)
    } else {
        read_prompt_file(path, max_bytes)
    }
}

pub(crate) fn source_name(path: &Path) -> String {
    if path == Path::new("-") {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

//! dissect - prompt dissection CLI
//!
//! Split pasted prompts into typed blocks, review them and replay edits.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dissect::app::AppContext;
use dissect::cli::Cli;
use dissect::cli::output::{OutputFormat, emit_robot, robot_error};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ctx = AppContext::from_cli(&cli);

    // The `[robot]` section can pick the format.
    let format = ctx.as_ref().map_or_else(
        |_| cli.format_override().unwrap_or_default(),
        |ctx| ctx.output_format,
    );
    init_tracing(&cli, format);

    let result = ctx.and_then(|ctx| dissect::cli::commands::run(&ctx, &cli.command));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let reported = format != OutputFormat::Human
                && emit_robot(format, &robot_error(e.code(), e.to_string())).is_ok();
            if !reported {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli, format: OutputFormat) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info,dissect=debug,session=debug",
        2 => "debug,dissect=trace,session=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_env("DISSECT_LOG").unwrap_or_else(|_| EnvFilter::new(filter));

    if format == OutputFormat::Human {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    }
}

//! dissect config - Show the effective configuration

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_robot, robot_ok};
use crate::config::Config;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print only the config file path
    #[arg(long)]
    pub path: bool,
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    path: String,
    exists: bool,
    config: &'a Config,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    if ctx.is_robot() {
        let report = ConfigReport {
            path: ctx.config_path.display().to_string(),
            exists: ctx.config_path.exists(),
            config: &ctx.config,
        };
        return emit_robot(ctx.output_format, &robot_ok(report));
    }

    if args.path {
        println!("{}", ctx.config_path.display());
        return Ok(());
    }

    println!("# {}", ctx.config_path.display());
    print!("{}", ctx.config.to_toml_string()?);
    Ok(())
}

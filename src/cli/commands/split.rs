//! dissect split - Split a prompt into classified blocks

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_human, emit_robot, robot_ok, HumanLayout};
use crate::error::Result;
use crate::import::{DissectedBlock, DissectionStats};

use super::{read_input, source_name};

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Prompt file to split (`-` reads stdin)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Characters of each block shown in human output
    #[arg(long, default_value_t = 120)]
    pub preview: usize,

    /// Include per-type and per-confidence counts
    #[arg(long)]
    pub stats: bool,
}

#[derive(Serialize)]
struct SplitReport {
    source: String,
    blocks: Vec<DissectedBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<DissectionStats>,
}

pub fn run(ctx: &AppContext, args: &SplitArgs) -> Result<()> {
    let text = read_input(ctx, &args.path)?;
    let mut session = ctx.session(text);
    session.dissect(&ctx.dissector());

    let blocks = session.into_blocks();
    let stats = args.stats.then(|| DissectionStats::from_blocks(&blocks));

    if ctx.is_robot() {
        let report = SplitReport {
            source: source_name(&args.path),
            blocks,
            stats,
        };
        return emit_robot(ctx.output_format, &robot_ok(report));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Prompt Dissection")
        .kv("Source", &source_name(&args.path))
        .kv("Blocks", &blocks.len().to_string())
        .blank();

    if blocks.is_empty() {
        layout.push_line(style("Nothing to split: the prompt is empty.").yellow().to_string());
        emit_human(layout);
        return Ok(());
    }

    layout.section("Blocks");
    for (index, block) in blocks.iter().enumerate() {
        layout.block(index, block, args.preview);
    }

    if let Some(stats) = stats {
        layout.blank().section("Statistics");
        for (block_type, count) in &stats.blocks_by_type {
            layout.kv(block_type, &count.to_string());
        }
        layout
            .kv("avg confidence", &format!("{:.1}", stats.avg_confidence))
            .kv("high", &stats.high_confidence_count.to_string())
            .kv("medium", &stats.medium_confidence_count.to_string())
            .kv("low", &stats.low_confidence_count.to_string());
    }

    emit_human(layout);
    Ok(())
}

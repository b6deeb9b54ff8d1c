//! dissect edit - Dissect a prompt and replay an edit script over the blocks

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_human, emit_robot, robot_partial, HumanLayout};
use crate::error::{DissectError, Result};
use crate::import::{BlockId, DissectedBlock};
use crate::library::{CommitEntry, CommitReceipt, MemoryLibrary};
use crate::session::script::{apply_script, parse_script, ScriptOutcome};
use crate::session::Stage;

use super::{read_input, source_name};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Prompt file to dissect (`-` reads stdin)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// JSON edit script to apply
    #[arg(long, value_name = "FILE")]
    pub ops: PathBuf,

    /// Commit the result to an in-memory library and report the receipt
    #[arg(long)]
    pub commit: bool,

    /// Characters of each block shown in human output
    #[arg(long, default_value_t = 120)]
    pub preview: usize,
}

#[derive(Serialize)]
struct HistoryReport {
    index: usize,
    snapshots: usize,
    can_undo: bool,
    can_redo: bool,
}

#[derive(Serialize)]
struct EditReport {
    source: String,
    stage: Stage,
    outcomes: Vec<ScriptOutcome>,
    blocks: Vec<DissectedBlock>,
    history: HistoryReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entries: Vec<CommitEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<CommitReceipt>,
}

pub fn run(ctx: &AppContext, args: &EditArgs) -> Result<()> {
    let text = read_input(ctx, &args.path)?;
    let raw_script = std::fs::read_to_string(&args.ops).map_err(|err| {
        DissectError::InvalidScript(format!("read {}: {err}", args.ops.display()))
    })?;
    let ops = parse_script(&raw_script)?;

    let mut session = ctx.session(text);
    session.dissect(&ctx.dissector());
    let outcomes = apply_script(&mut session, &ops);
    session.set_stage(Stage::Review);

    let applied = outcomes.iter().filter(|outcome| outcome.applied).count();
    let failed = outcomes.len() - applied;

    let history = HistoryReport {
        index: session.history().index(),
        snapshots: session.history().len(),
        can_undo: session.can_undo(),
        can_redo: session.can_redo(),
    };
    let blocks = session.blocks().to_vec();

    let (stage, entries, receipt) = if args.commit {
        let mut library = MemoryLibrary::new();
        let receipt = session.commit(&mut library)?;
        (Stage::Complete, Vec::new(), Some(receipt))
    } else {
        (session.stage(), session.commit_entries(), None)
    };

    if ctx.is_robot() {
        let report = EditReport {
            source: source_name(&args.path),
            stage,
            outcomes,
            blocks,
            history,
            entries,
            receipt,
        };
        return emit_robot(ctx.output_format, &robot_partial(report, applied, failed));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Prompt Edit")
        .kv("Source", &source_name(&args.path))
        .kv("Operations", &format!("{applied} applied, {failed} rejected"))
        .kv(
            "History",
            &format!("{} of {}", history.index + 1, history.snapshots),
        )
        .kv("Stage", stage.as_str())
        .blank();

    layout.section("Script");
    for outcome in &outcomes {
        layout.push_line(format_outcome(outcome));
    }

    layout.blank().section("Blocks");
    for (index, block) in blocks.iter().enumerate() {
        layout.block(index, block, args.preview);
    }

    if let Some(receipt) = &receipt {
        layout
            .blank()
            .section("Commit")
            .kv("Library items", &receipt.library_ids.len().to_string())
            .kv("Inline blocks", &receipt.inline_count().to_string());
        for id in &receipt.library_ids {
            layout.bullet(id);
        }
    }

    emit_human(layout);
    Ok(())
}

fn format_outcome(outcome: &ScriptOutcome) -> String {
    let marker = if outcome.applied {
        style("✓").green()
    } else {
        style("✗").red()
    };
    let mut line = format!("{marker} #{} {}", outcome.op_index + 1, outcome.op);
    if !outcome.created.is_empty() {
        let created = outcome
            .created
            .iter()
            .map(BlockId::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        line.push_str(&format!(" -> {created}"));
    }
    if let Some(detail) = outcome.detail.as_deref() {
        line.push_str(&format!(": {detail}"));
    }
    line
}

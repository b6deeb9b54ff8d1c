//! dissect classify - Classify a single piece of text

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{emit_human, emit_robot, robot_ok, HumanLayout};
use crate::error::{DissectError, Result};
use crate::import::{Classification, ConfidenceLevel};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Text to classify (words are joined with spaces)
    #[arg(value_name = "TEXT", required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Serialize)]
struct ClassifyReport {
    #[serde(flatten)]
    classification: Classification,
    level: ConfidenceLevel,
}

pub fn run(ctx: &AppContext, args: &ClassifyArgs) -> Result<()> {
    let text = args.text.join(" ");
    if text.trim().is_empty() {
        return Err(DissectError::InputRejected {
            path: "-".into(),
            reason: "nothing to classify".to_string(),
        });
    }

    let dissector = ctx.dissector();
    let classification = dissector.classifier().classify(text.trim());
    let level = classification.level();

    if ctx.is_robot() {
        let report = ClassifyReport {
            classification,
            level,
        };
        return emit_robot(ctx.output_format, &robot_ok(report));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Classification")
        .kv("Type", classification.block_type.as_str())
        .kv(
            "Confidence",
            &format!("{}% ({level})", classification.confidence),
        )
        .kv("Matched by", classification.tier.as_str());
    if let Some(matched) = classification.matched.as_deref() {
        layout.kv("Match", matched);
    }
    emit_human(layout);
    Ok(())
}

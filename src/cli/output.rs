use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::import::{ConfidenceLevel, DissectedBlock};

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Styled text for terminals
    #[default]
    Human,
    /// Pretty JSON envelope
    Json,
    /// One compact JSON envelope per line
    Jsonl,
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
    Partial { completed: usize, failed: usize },
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
    }
}

/// Envelope for a batch where some steps were skipped.
pub fn robot_partial<T: Serialize>(data: T, completed: usize, failed: usize) -> RobotResponse<T> {
    let status = if failed == 0 {
        RobotStatus::Ok
    } else {
        RobotStatus::Partial { completed, failed }
    };
    RobotResponse {
        status,
        ..robot_ok(data)
    }
}

pub fn robot_error(
    code: impl Into<String>,
    message: impl Into<String>,
) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: code.into(),
            message: message.into(),
        },
        ..robot_ok(serde_json::Value::Null)
    }
}

pub fn emit_robot<T: Serialize>(format: OutputFormat, response: &RobotResponse<T>) -> Result<()> {
    match format {
        OutputFormat::Jsonl => emit_jsonl(response),
        OutputFormat::Human | OutputFormat::Json => emit_json(response),
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

pub fn emit_jsonl<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string(value)?;
    println!("{payload}");
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 18,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let key_style = style(format!("{key:width$}", width = self.key_width))
            .dim()
            .to_string();
        self.lines.push(format!("{key_style} {value}"));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// One block as a header line plus an indented preview.
    pub fn block(&mut self, position: usize, block: &DissectedBlock, preview_chars: usize) -> &mut Self {
        let level = block.confidence_level;
        let score = format!("{:>3}%", block.confidence);
        let score = match level {
            ConfidenceLevel::High | ConfidenceLevel::Manual => style(score).green(),
            ConfidenceLevel::Medium => style(score).yellow(),
            ConfidenceLevel::Low => style(score).red(),
        };
        let mut header = format!(
            "{:>3}. {:<12} {score} {}",
            position + 1,
            block.suggested_type.as_str(),
            style(level.as_str()).dim()
        );
        if let Some(label) = block.label.as_deref() {
            header.push_str(&format!(" [{label}]"));
        }
        self.lines.push(header);
        for line in block.preview(preview_chars).lines() {
            self.lines.push(format!("     {line}"));
        }
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}

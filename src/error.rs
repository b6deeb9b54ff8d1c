//! Error types for dissect.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::EditRejection;

pub type Result<T> = std::result::Result<T, DissectError>;

#[derive(Debug, Error)]
pub enum DissectError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("input rejected ({path}): {reason}")]
    InputRejected { path: PathBuf, reason: String },

    #[error("invalid edit script: {0}")]
    InvalidScript(String),

    #[error("library commit failed: {0}")]
    Commit(String),

    #[error(transparent)]
    Edit(#[from] EditRejection),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DissectError {
    /// Stable machine-readable code for robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::MissingConfig(_) => "missing_config",
            Self::InputRejected { .. } => "input_rejected",
            Self::InvalidScript(_) => "invalid_script",
            Self::Commit(_) => "commit_failed",
            Self::Edit(_) => "edit_rejected",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

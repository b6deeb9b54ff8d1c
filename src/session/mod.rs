//! Import sessions: the editable, history-tracked list of dissected blocks.
//!
//! A [`Session`] is created when an import starts, seeded by the
//! [`Dissector`], corrected by a human through the editor operations
//! (see `editor.rs`), and finally consumed by [`Session::commit`].
//! Every successful structural edit records one [`History`] snapshot;
//! rejected edits change nothing and record nothing.

mod editor;
mod history;
pub mod script;

pub use editor::BlockPatch;
pub use history::History;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{DissectError, Result};
use crate::import::{BlockId, DissectedBlock, Dissector};
use crate::library::{BlockLibrary, CommitEntry, CommitReceipt};

/// Workflow position of a session. Moved forward by the caller only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Input,
    Dissection,
    Review,
    Complete,
}

impl Stage {
    /// The following stage; `Complete` stays `Complete`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Input => Self::Dissection,
            Self::Dissection => Self::Review,
            Self::Review | Self::Complete => Self::Complete,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Dissection => "dissection",
            Self::Review => "review",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session tunables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum snapshots kept for undo. `None` keeps everything.
    #[serde(default)]
    pub history_limit: Option<usize>,
}

/// Why an edit was ignored. The session is untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditRejection {
    #[error("block {0} not found")]
    UnknownBlock(BlockId),

    #[error("split position {position} must be inside 1..{len}")]
    SplitOutOfRange { position: usize, len: usize },

    #[error("edit would leave a block with empty content")]
    EmptyContent,

    #[error("merge needs at least two distinct blocks, got {0}")]
    TooFewBlocks(usize),

    #[error("patch changes nothing")]
    EmptyPatch,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

pub type EditResult<T> = std::result::Result<T, EditRejection>;

/// The working set of one import-and-review workflow.
#[derive(Debug, Clone)]
pub struct Session {
    original_text: String,
    blocks: Vec<DissectedBlock>,
    stage: Stage,
    history: History,
}

impl Session {
    /// Start a session for `original_text`, before dissection.
    #[must_use]
    pub fn new(original_text: impl Into<String>) -> Self {
        Self::with_config(original_text, &SessionConfig::default())
    }

    #[must_use]
    pub fn with_config(original_text: impl Into<String>, config: &SessionConfig) -> Self {
        Self {
            original_text: original_text.into(),
            blocks: Vec::new(),
            stage: Stage::Input,
            history: History::with_limit(Vec::new(), config.history_limit),
        }
    }

    /// Start a session and dissect it right away.
    #[must_use]
    pub fn from_text(original_text: impl Into<String>, dissector: &Dissector) -> Self {
        let mut session = Self::new(original_text);
        session.dissect(dissector);
        session
    }

    /// Seed a session with already-dissected blocks.
    #[must_use]
    pub fn from_blocks(original_text: impl Into<String>, blocks: Vec<DissectedBlock>) -> Self {
        let mut session = Self::new(original_text);
        session.history.reset(blocks.clone());
        session.blocks = blocks;
        session.stage = Stage::Dissection;
        session
    }

    /// Run the dissector over the original text. Replaces the blocks,
    /// restarts the history from the result and moves to `Dissection`.
    pub fn dissect(&mut self, dissector: &Dissector) {
        self.blocks = dissector.dissect(&self.original_text);
        self.history.reset(self.blocks.clone());
        self.stage = Stage::Dissection;
        info!(target: "session", blocks = self.blocks.len(), "prompt dissected");
    }

    #[must_use]
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    #[must_use]
    pub fn blocks(&self) -> &[DissectedBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn block(&self, id: &BlockId) -> Option<&DissectedBlock> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    #[must_use]
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Edits are accepted in any stage; only `Dissection` is meaningful.
    pub fn set_stage(&mut self, stage: Stage) {
        debug!(target: "session", from = %self.stage, to = %stage, "stage change");
        self.stage = stage;
    }

    pub fn advance(&mut self) -> Stage {
        self.set_stage(self.stage.next());
        self.stage
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Library-bound view of the blocks, in composition order.
    #[must_use]
    pub fn commit_entries(&self) -> Vec<CommitEntry> {
        self.blocks.iter().map(CommitEntry::from).collect()
    }

    /// Blocks whose exact content the library already knows under a label.
    #[must_use]
    pub fn known_blocks<'a, L>(&self, library: &'a L) -> Vec<(BlockId, &'a str)>
    where
        L: BlockLibrary + ?Sized,
    {
        self.blocks
            .iter()
            .filter_map(|block| {
                library
                    .find_labeled(&block.content)
                    .map(|label| (block.id.clone(), label))
            })
            .collect()
    }

    /// Hand the final blocks to the library. The session is spent afterwards.
    pub fn commit<L>(mut self, library: &mut L) -> Result<CommitReceipt>
    where
        L: BlockLibrary + ?Sized,
    {
        let entries = self.commit_entries();
        let ids = library.commit(&entries)?;
        if ids.len() != entries.len() {
            return Err(DissectError::Commit(format!(
                "library returned {} ids for {} entries",
                ids.len(),
                entries.len()
            )));
        }
        self.set_stage(Stage::Complete);
        info!(target: "session", entries = entries.len(), "session committed");
        Ok(CommitReceipt::new(entries, ids))
    }

    /// Take the blocks, discarding the session.
    #[must_use]
    pub fn into_blocks(self) -> Vec<DissectedBlock> {
        self.blocks
    }
}

//! Batch edit scripts.
//!
//! A script is a JSON array of operations addressed by block index in the
//! list as it stands when each operation runs:
//!
//! ```json
//! [
//!   {"op": "split", "index": 0, "position": 12},
//!   {"op": "retype", "index": 1, "type": "Constraints"},
//!   {"op": "merge", "indices": [2, 3]},
//!   {"op": "undo"}
//! ]
//! ```
//!
//! Operations are applied one after another. A rejected operation is
//! reported and skipped; later operations still run.

use serde::{Deserialize, Serialize};

use super::{BlockPatch, EditRejection, Session};
use crate::error::{DissectError, Result};
use crate::import::{BlockId, BlockType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Update {
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        block_type: Option<BlockType>,
    },
    Split {
        index: usize,
        position: usize,
    },
    Merge {
        indices: Vec<usize>,
    },
    Delete {
        index: usize,
    },
    Add {
        content: String,
        #[serde(rename = "type")]
        block_type: BlockType,
    },
    Retype {
        index: usize,
        #[serde(rename = "type")]
        block_type: BlockType,
    },
    Undo,
    Redo,
}

impl EditOp {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Update { .. } => "update",
            Self::Split { .. } => "split",
            Self::Merge { .. } => "merge",
            Self::Delete { .. } => "delete",
            Self::Add { .. } => "add",
            Self::Retype { .. } => "retype",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// Result of one scripted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptOutcome {
    pub op_index: usize,
    pub op: &'static str,
    pub applied: bool,
    /// Rejection reason when `applied` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Ids of blocks the operation created.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<BlockId>,
}

/// Parse a JSON edit script.
pub fn parse_script(json: &str) -> Result<Vec<EditOp>> {
    serde_json::from_str(json).map_err(|err| DissectError::InvalidScript(err.to_string()))
}

/// Apply every operation in order, collecting one outcome per operation.
pub fn apply_script(session: &mut Session, ops: &[EditOp]) -> Vec<ScriptOutcome> {
    ops.iter()
        .enumerate()
        .map(|(op_index, op)| {
            let (applied, detail, created) = match apply_op(session, op) {
                Ok(created) => (true, None, created),
                Err(rejection) => (false, Some(rejection.to_string()), Vec::new()),
            };
            ScriptOutcome {
                op_index,
                op: op.name(),
                applied,
                detail,
                created,
            }
        })
        .collect()
}

fn block_id(session: &Session, index: usize) -> std::result::Result<BlockId, EditRejection> {
    session
        .blocks()
        .get(index)
        .map(|block| block.id.clone())
        .ok_or_else(|| EditRejection::UnknownBlock(BlockId::from(format!("#{index}").as_str())))
}

fn apply_op(session: &mut Session, op: &EditOp) -> std::result::Result<Vec<BlockId>, EditRejection> {
    match op {
        EditOp::Update {
            index,
            content,
            label,
            block_type,
        } => {
            let id = block_id(session, *index)?;
            let patch = BlockPatch {
                content: content.clone(),
                label: label.clone(),
                suggested_type: block_type.clone(),
            };
            session.update(&id, patch)?;
            Ok(Vec::new())
        }
        EditOp::Split { index, position } => {
            let id = block_id(session, *index)?;
            let (first, second) = session.split(&id, *position)?;
            Ok(vec![first, second])
        }
        EditOp::Merge { indices } => {
            let ids = indices
                .iter()
                .map(|&index| block_id(session, index))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            session.merge(&ids).map(|merged| vec![merged])
        }
        EditOp::Delete { index } => {
            let id = block_id(session, *index)?;
            session.delete(&id)?;
            Ok(Vec::new())
        }
        EditOp::Add {
            content,
            block_type,
        } => session
            .add(content.clone(), block_type.clone())
            .map(|id| vec![id]),
        EditOp::Retype { index, block_type } => {
            let id = block_id(session, *index)?;
            session.retype(&id, block_type.clone())?;
            Ok(Vec::new())
        }
        EditOp::Undo => session.undo().map(|()| Vec::new()),
        EditOp::Redo => session.redo().map(|()| Vec::new()),
    }
}

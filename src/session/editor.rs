//! Structural edit operations on a session.
//!
//! Each operation validates everything up front, then applies in full and
//! records exactly one history snapshot. A rejected operation leaves the
//! blocks and the history untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EditRejection, EditResult, Session};
use crate::import::{BlockId, BlockType, DissectedBlock};

/// Fields to merge into a block. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default)]
    pub content: Option<String>,

    /// A blank label clears the label.
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub suggested_type: Option<BlockType>,
}

impl BlockPatch {
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn suggested_type(block_type: BlockType) -> Self {
        Self {
            suggested_type: Some(block_type),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none() && self.label.is_none() && self.suggested_type.is_none()
    }
}

impl Session {
    fn index_of(&self, id: &BlockId) -> EditResult<usize> {
        self.position(id)
            .ok_or_else(|| EditRejection::UnknownBlock(id.clone()))
    }

    fn record(&mut self) {
        self.history.record(&self.blocks);
    }

    /// Merge `patch` into the block. Choosing a type marks the block manual;
    /// content and label edits do not.
    pub fn update(&mut self, id: &BlockId, patch: BlockPatch) -> EditResult<()> {
        if patch.is_empty() {
            return Err(EditRejection::EmptyPatch);
        }
        let index = self.index_of(id)?;
        if patch
            .content
            .as_deref()
            .is_some_and(|content| content.trim().is_empty())
        {
            return Err(EditRejection::EmptyContent);
        }

        let block = &mut self.blocks[index];
        if let Some(content) = patch.content {
            block.content = content;
        }
        if let Some(label) = patch.label {
            block.label = if label.trim().is_empty() {
                None
            } else {
                Some(label)
            };
        }
        if let Some(block_type) = patch.suggested_type {
            block.suggested_type = block_type;
            block.mark_manual();
        }

        debug!(target: "session", op = "update", block = %id, index);
        self.record();
        Ok(())
    }

    /// Split a block at a char position into two fresh blocks.
    ///
    /// The first half keeps the label; both keep the type and confidence
    /// and become manual. Returns the ids of the two halves.
    pub fn split(&mut self, id: &BlockId, position: usize) -> EditResult<(BlockId, BlockId)> {
        let index = self.index_of(id)?;
        let original = &self.blocks[index];
        let len = original.content.chars().count();
        if position == 0 || position >= len {
            return Err(EditRejection::SplitOutOfRange { position, len });
        }

        let byte = original
            .content
            .char_indices()
            .nth(position)
            .map_or(original.content.len(), |(byte, _)| byte);
        let head = original.content[..byte].trim();
        let tail = original.content[byte..].trim();
        if head.is_empty() || tail.is_empty() {
            return Err(EditRejection::EmptyContent);
        }

        let mut first = original.clone();
        first.id = BlockId::generate();
        first.content = head.to_string();
        first.end_position = original.start_position.map(|start| start + position);
        first.mark_manual();

        let mut second = original.clone();
        second.id = BlockId::generate();
        second.content = tail.to_string();
        second.label = None;
        second.start_position = original.start_position.map(|start| start + position);
        second.mark_manual();

        let ids = (first.id.clone(), second.id.clone());
        self.blocks.splice(index..=index, [first, second]);

        debug!(target: "session", op = "split", block = %id, position, first = %ids.0, second = %ids.1);
        self.record();
        Ok(ids)
    }

    /// Merge blocks into one, placed where the earliest of them sits.
    ///
    /// Content is joined with a blank line in list order, not argument
    /// order. Type, confidence and label come from the earliest block.
    pub fn merge(&mut self, ids: &[BlockId]) -> EditResult<BlockId> {
        if ids.len() < 2 {
            return Err(EditRejection::TooFewBlocks(ids.len()));
        }
        let mut positions = ids
            .iter()
            .map(|id| self.index_of(id))
            .collect::<EditResult<Vec<_>>>()?;
        positions.sort_unstable();
        positions.dedup();
        if positions.len() < 2 {
            return Err(EditRejection::TooFewBlocks(positions.len()));
        }

        let content = positions
            .iter()
            .map(|&index| self.blocks[index].content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let earliest = positions[0];
        let last = positions[positions.len() - 1];

        let mut merged = self.blocks[earliest].clone();
        merged.id = BlockId::generate();
        merged.content = content;
        merged.end_position = self.blocks[last].end_position;
        merged.mark_manual();
        let merged_id = merged.id.clone();

        let mut merged = Some(merged);
        let blocks = std::mem::take(&mut self.blocks);
        self.blocks = blocks
            .into_iter()
            .enumerate()
            .filter_map(|(index, block)| {
                if index == earliest {
                    merged.take()
                } else if positions.binary_search(&index).is_ok() {
                    None
                } else {
                    Some(block)
                }
            })
            .collect();

        debug!(target: "session", op = "merge", sources = positions.len(), merged = %merged_id);
        self.record();
        Ok(merged_id)
    }

    pub fn delete(&mut self, id: &BlockId) -> EditResult<()> {
        let index = self.index_of(id)?;
        self.blocks.remove(index);
        debug!(target: "session", op = "delete", block = %id, index);
        self.record();
        Ok(())
    }

    /// Append a hand-written block (confidence 100, manual).
    pub fn add(&mut self, content: impl Into<String>, block_type: BlockType) -> EditResult<BlockId> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(EditRejection::EmptyContent);
        }
        let block = DissectedBlock::manual(content, block_type);
        let id = block.id.clone();
        self.blocks.push(block);
        debug!(target: "session", op = "add", block = %id);
        self.record();
        Ok(id)
    }

    /// Set the type by hand. A manual choice is fully confident.
    pub fn retype(&mut self, id: &BlockId, block_type: BlockType) -> EditResult<()> {
        let index = self.index_of(id)?;
        let block = &mut self.blocks[index];
        block.suggested_type = block_type;
        block.confidence = 100;
        block.mark_manual();
        debug!(target: "session", op = "retype", block = %id, to = %block.suggested_type);
        self.record();
        Ok(())
    }

    pub fn undo(&mut self) -> EditResult<()> {
        let restored = self.history.undo().ok_or(EditRejection::NothingToUndo)?;
        self.blocks = restored.to_vec();
        debug!(target: "session", op = "undo", index = self.history.index());
        Ok(())
    }

    pub fn redo(&mut self) -> EditResult<()> {
        let restored = self.history.redo().ok_or(EditRejection::NothingToRedo)?;
        self.blocks = restored.to_vec();
        debug!(target: "session", op = "redo", index = self.history.index());
        Ok(())
    }
}

//! Boundary to the block library that receives committed sessions.
//!
//! Labeled entries become reusable library items; unlabeled ones are
//! embedded inline in the composed prompt. The library itself lives
//! outside this crate; [`MemoryLibrary`] backs tests and dry runs.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::import::{BlockType, DissectedBlock};

/// One block as handed to the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitEntry {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub content: String,
}

impl CommitEntry {
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.label
            .as_deref()
            .is_some_and(|label| !label.trim().is_empty())
    }
}

impl From<&DissectedBlock> for CommitEntry {
    fn from(block: &DissectedBlock) -> Self {
        Self {
            block_type: block.suggested_type.clone(),
            label: block
                .label
                .clone()
                .filter(|label| !label.trim().is_empty()),
            content: block.content.clone(),
        }
    }
}

/// Persistent store of reusable blocks.
pub trait BlockLibrary {
    /// Store the entries in order. Returns one slot per entry: the new item
    /// id for labeled entries, `None` for inline ones.
    fn commit(&mut self, entries: &[CommitEntry]) -> Result<Vec<Option<String>>>;

    /// Label of an existing item with exactly this content.
    fn find_labeled(&self, content: &str) -> Option<&str>;
}

/// What a commit produced.
#[derive(Debug, Clone, Serialize)]
pub struct CommitReceipt {
    pub entries: Vec<CommitEntry>,
    /// Ids of the library items created for labeled entries.
    pub library_ids: Vec<String>,
}

impl CommitReceipt {
    #[must_use]
    pub fn new(entries: Vec<CommitEntry>, ids: Vec<Option<String>>) -> Self {
        Self {
            entries,
            library_ids: ids.into_iter().flatten().collect(),
        }
    }

    #[must_use]
    pub fn inline_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.is_named()).count()
    }
}

/// A stored library item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryItem {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: String,
}

/// In-memory library.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    items: Vec<LibraryItem>,
    inline: Vec<CommitEntry>,
}

impl MemoryLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[LibraryItem] {
        &self.items
    }

    /// Unlabeled entries from every commit so far.
    #[must_use]
    pub fn inline_entries(&self) -> &[CommitEntry] {
        &self.inline
    }
}

impl BlockLibrary for MemoryLibrary {
    fn commit(&mut self, entries: &[CommitEntry]) -> Result<Vec<Option<String>>> {
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.label.as_deref().filter(|_| entry.is_named()) {
                Some(label) => {
                    let id = format!("item_{:04}", self.items.len() + 1);
                    self.items.push(LibraryItem {
                        id: id.clone(),
                        label: label.to_string(),
                        block_type: entry.block_type.clone(),
                        content: entry.content.clone(),
                    });
                    ids.push(Some(id));
                }
                None => {
                    self.inline.push(entry.clone());
                    ids.push(None);
                }
            }
        }
        debug!(target: "dissect", items = self.items.len(), inline = self.inline.len(), "library commit");
        Ok(ids)
    }

    fn find_labeled(&self, content: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.content == content)
            .map(|item| item.label.as_str())
    }
}

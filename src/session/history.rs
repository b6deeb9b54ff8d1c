//! Linear undo/redo over full block-list snapshots.

use crate::import::DissectedBlock;

/// Snapshot stack for one session.
///
/// The snapshot at `index` is the state on screen. Recording a new state
/// discards every snapshot after `index` (no redo branches).
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<DissectedBlock>>,
    index: usize,
    limit: Option<usize>,
}

impl History {
    /// Start a history whose only snapshot is `initial`.
    #[must_use]
    pub fn new(initial: Vec<DissectedBlock>) -> Self {
        Self::with_limit(initial, None)
    }

    /// Like [`History::new`], keeping at most `limit` snapshots (minimum 1).
    /// The oldest snapshots are dropped first.
    #[must_use]
    pub fn with_limit(initial: Vec<DissectedBlock>, limit: Option<usize>) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            limit: limit.map(|limit| limit.max(1)),
        }
    }

    /// Throw away all snapshots and start over from `initial`.
    pub fn reset(&mut self, initial: Vec<DissectedBlock>) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.index = 0;
    }

    pub fn record(&mut self, state: &[DissectedBlock]) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(state.to_vec());
        self.index = self.snapshots.len() - 1;

        if let Some(limit) = self.limit {
            let excess = self.snapshots.len().saturating_sub(limit);
            if excess > 0 {
                self.snapshots.drain(..excess);
                self.index -= excess;
            }
        }
    }

    /// Step back one snapshot, returning the state to restore.
    pub fn undo(&mut self) -> Option<&[DissectedBlock]> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one snapshot, returning the state to restore.
    pub fn redo(&mut self) -> Option<&[DissectedBlock]> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false: a history holds at least its initial snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn current(&self) -> &[DissectedBlock] {
        &self.snapshots[self.index]
    }
}

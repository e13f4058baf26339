//! Undo/Redo history as a bounded list of whole-document snapshots.
//!
//! `stack[index]` is always the state currently shown. A commit pushes the
//! state *after* the mutation; undo steps back one snapshot and hands out a
//! clone of it. Pushing while undone discards the redo branch.

use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History<S> {
    stack: VecDeque<S>,
    index: usize,
    max_entries: usize,
}

impl<S: Clone> History<S> {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: S, max_entries: usize) -> Self {
        let mut stack = VecDeque::with_capacity(max_entries.min(64));
        stack.push_back(initial);
        Self {
            stack,
            index: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Forget everything and start over from `initial` (document load).
    pub fn reset(&mut self, initial: S) {
        self.stack.clear();
        self.stack.push_back(initial);
        self.index = 0;
    }

    /// Record a committed state.
    pub fn push(&mut self, current: S) {
        self.stack.truncate(self.index + 1);
        self.stack.push_back(current);

        // Limit history size
        while self.stack.len() > self.max_entries {
            self.stack.pop_front();
        }
        self.index = self.stack.len() - 1;
    }

    pub fn undo(&mut self) -> Option<S> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.stack.get(self.index).cloned()
    }

    pub fn redo(&mut self) -> Option<S> {
        if self.index + 1 >= self.stack.len() {
            return None;
        }
        self.index += 1;
        self.stack.get(self.index).cloned()
    }

    /// Snapshot at the current position.
    pub fn current(&self) -> Option<&S> {
        self.stack.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.stack.len()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

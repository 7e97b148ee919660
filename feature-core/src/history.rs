//! Snapshot based undo/redo
//!
//! The history holds full copies of the feature list rather than individual
//! operations. Lists are small and this keeps every mutation undoable without
//! each one knowing how to invert itself.

use crate::models::Feature;

/// A deep copy of the feature list at one point in time
pub type Snapshot = Vec<Feature>;

/// Two stacks of snapshots over a single feature list
#[derive(Debug, Clone, Default)]
pub struct UndoManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Records `current` before a mutation; any redo history is dropped
    pub fn save_state(&mut self, current: &[Feature]) {
        self.undo_stack.push(current.to_vec());
        self.redo_stack.clear();
    }

    /// Returns the previous state, or `current` unchanged when there is none
    pub fn undo(&mut self, current: &[Feature]) -> Snapshot {
        match self.undo_stack.pop() {
            Some(previous) => {
                self.redo_stack.push(current.to_vec());
                previous
            }
            None => current.to_vec(),
        }
    }

    /// Returns the next state, or `current` unchanged when there is none
    pub fn redo(&mut self, current: &[Feature]) -> Snapshot {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push(current.to_vec());
                next
            }
            None => current.to_vec(),
        }
    }

    /// Forgets all history, e.g. when another file becomes active
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

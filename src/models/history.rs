// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo/redo history of painting arrangements.

/// Bounded undo/redo stacks of snapshots.
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    /// Undo stack (past states)
    undo_stack: Vec<T>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<T>,
    /// Maximum history size
    max_size: usize,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(50)
    }
}

impl<T: Clone> History<T> {
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Save current state before making a change
    pub fn push(&mut self, state: T) {
        self.undo_stack.push(state);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // A new change invalidates everything that was undone
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Redo: restore next state
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::History;

    #[test]
    fn test_undo_redo_flow() {
        let mut history = History::new(50);
        history.push(vec![1]);
        history.push(vec![1, 2]);

        assert_eq!(history.undo(vec![1, 2, 3]), Some(vec![1, 2]));
        assert_eq!(history.undo(vec![1, 2]), Some(vec![1]));
        assert_eq!(history.undo(vec![1]), None);

        assert_eq!(history.redo(vec![1]), Some(vec![1, 2]));
        history.push(vec![9]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::new(2);
        history.push(1);
        history.push(2);
        history.push(3);

        assert_eq!(history.undo(4), Some(3));
        assert_eq!(history.undo(3), Some(2));
        assert_eq!(history.undo(2), None);
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.push("a");
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}

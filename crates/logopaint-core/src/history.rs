//! Snapshot-based undo/redo.

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 100;

/// Undo/redo over full snapshots of a state value.
///
/// `stack[..=cursor]` holds undo states, oldest first. The entry right after
/// the cursor, when present, is the state the next redo restores.
#[derive(Debug, Clone)]
pub struct History<T> {
    stack: Vec<T>,
    cursor: isize,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::with_limit(MAX_UNDO_HISTORY)
    }
}

impl<T: Clone> History<T> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `state` as the state to return to on the next undo.
    ///
    /// Call before making changes. Any redo states are discarded.
    pub fn snapshot(&mut self, state: &T) {
        self.stack.truncate(self.undo_len());
        self.stack.push(state.clone());
        self.cursor += 1;

        if self.stack.len() > self.limit {
            self.stack.remove(0);
            self.cursor -= 1;
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, current: &mut T) -> bool {
        if self.cursor < 0 {
            log::debug!("undo: nothing to undo");
            return false;
        }
        let idx = self.cursor as usize;

        // Keep the pre-undo state reachable by redo.
        let slot = idx + 1;
        if slot < self.stack.len() {
            self.stack[slot] = current.clone();
        } else {
            self.stack.push(current.clone());
        }

        *current = self.stack[idx].clone();
        self.cursor -= 1;
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, current: &mut T) -> bool {
        let next = self.undo_len() + 1;
        if next >= self.stack.len() {
            log::debug!("redo: nothing to redo");
            return false;
        }
        *current = self.stack[next].clone();
        self.cursor += 1;
        true
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.undo_len() + 1 < self.stack.len()
    }

    /// Number of undo steps available.
    pub fn undo_len(&self) -> usize {
        (self.cursor + 1) as usize
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.cursor = -1;
    }
}

impl<T> History<T> {
    /// Create an empty history keeping at most `limit` undo states.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            stack: Vec::new(),
            cursor: -1,
            limit: limit.max(1),
        }
    }
}

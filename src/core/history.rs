/// Linear undo/redo stack.
///
/// Pushing after an undo discards the redo branch.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    /// Number of entries currently applied
    cursor: usize,
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        self.cursor = self.entries.len();
    }

    /// Steps back, returning the entry that should be reverted
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Steps forward, returning the entry that should be reapplied
    pub fn redo(&mut self) -> Option<&T> {
        let entry = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::new();
        history.push("pan");
        history.push("zoom");

        assert_eq!(history.undo(), Some(&"zoom"));
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(&"zoom"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_past_start_is_none() {
        let mut history = History::new();
        history.push(1);
        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), None);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_push_discards_redo_branch() {
        let mut history = History::new();
        history.push(1);
        history.push(2);
        history.undo();
        history.push(3);

        assert_eq!(history.len(), 2);
        assert_eq!(history.redo(), None);
        assert_eq!(history.undo(), Some(&3));
        assert_eq!(history.undo(), Some(&1));
    }
}

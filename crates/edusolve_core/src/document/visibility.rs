use std::collections::BTreeMap;

/// Per-question expanded/collapsed flags for explanation blocks.
/// Indices never set are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    expanded: BTreeMap<usize, bool>,
}

impl Visibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.get(&index).copied().unwrap_or(false)
    }

    pub fn set(&mut self, index: usize, expanded: bool) {
        self.expanded.insert(index, expanded);
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, index: usize) -> bool {
        let next = !self.is_expanded(index);
        self.expanded.insert(index, next);
        next
    }

    pub fn expand_all(&mut self, indices: impl IntoIterator<Item = usize>) {
        for index in indices {
            self.expanded.insert(index, true);
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Replace every flag with a previously taken copy.
    pub fn restore(&mut self, snapshot: Visibility) {
        *self = snapshot;
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.values().filter(|v| **v).count()
    }
}

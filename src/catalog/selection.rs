//! Transient selection state, independent of the catalog itself.

use crate::catalog::model::HillId;

/// Tracks which hill ids are currently highlighted in the UI.
///
/// Every selection event is a full replace; there is no toggle or accumulate
/// semantic. Clearing is always available and always succeeds. Mutations are
/// driven purely by external events; a multi-threaded host must serialize
/// access (the server keeps one instance behind a mutex).
#[derive(Debug, Default)]
pub struct SelectionController {
    selected: Vec<HillId>,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection with the given ids.
    pub fn select(&mut self, ids: Vec<HillId>) {
        self.selected = ids;
    }

    /// Focus a single hill, e.g. after a marker click or a search hit.
    pub fn select_one(&mut self, id: HillId) {
        self.selected = vec![id];
    }

    /// Drop the selection entirely.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub fn selection(&self) -> &[HillId] {
        &self.selected
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_replaces_not_accumulates() {
        let mut controller = SelectionController::new();
        controller.select(vec![5]);
        controller.select(vec![7]);
        assert_eq!(controller.selection(), &[7]);
    }

    #[test]
    fn test_cluster_selection_replaces_single() {
        let mut controller = SelectionController::new();
        controller.select_one(3);
        controller.select(vec![1, 2, 4]);
        assert_eq!(controller.selection(), &[1, 2, 4]);
    }

    #[test]
    fn test_clear_always_succeeds() {
        let mut controller = SelectionController::new();
        controller.clear();
        assert!(controller.is_empty());

        controller.select(vec![9]);
        controller.clear();
        assert!(controller.selection().is_empty());
    }
}

use std::collections::BTreeSet;

/// Set of selected entity ids, independent of filtering and paging.
///
/// Visible pages are passed in as `Option<Id>` because entities that have not
/// been created yet carry no id and can never be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTracker<Id: Ord> {
    selected: BTreeSet<Id>,
}

impl<Id: Ord> Default for SelectionTracker<Id> {
    fn default() -> Self {
        SelectionTracker {
            selected: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> SelectionTracker<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    /// True iff the page is non-empty and every visible entity has an id that
    /// is selected.
    pub fn is_all_selected(&self, visible: &[Option<Id>]) -> bool {
        !visible.is_empty()
            && visible
                .iter()
                .all(|id| id.as_ref().is_some_and(|id| self.selected.contains(id)))
    }

    /// Clear everything when the visible page is already fully selected,
    /// otherwise add the visible ids to the selection.
    pub fn select_all_visible(&mut self, visible: &[Option<Id>]) {
        if self.is_all_selected(visible) {
            self.selected.clear();
        } else {
            self.selected.extend(visible.iter().flatten().cloned());
        }
    }

    /// Forget `id`; used when the entity is deleted.
    pub fn remove(&mut self, id: &Id) -> bool {
        self.selected.remove(id)
    }

    /// Keep only ids for which `keep` holds.
    pub fn retain(&mut self, keep: impl FnMut(&Id) -> bool) {
        self.selected.retain(keep);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<Id> {
        self.selected.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut s = SelectionTracker::new();
        assert!(s.toggle(3));
        assert!(s.is_selected(&3));
        assert!(!s.toggle(3));
        assert!(s.is_empty());
    }

    #[test]
    fn test_select_all_twice_clears() {
        let mut s = SelectionTracker::new();
        let page = vec![Some(1), Some(2), Some(3)];
        s.select_all_visible(&page);
        assert!(s.is_all_selected(&page));
        assert_eq!(s.len(), 3);
        s.select_all_visible(&page);
        assert!(s.is_empty());
    }

    #[test]
    fn test_select_all_is_union() {
        let mut s = SelectionTracker::new();
        s.toggle(42);
        s.toggle(1);
        s.select_all_visible(&[Some(1), Some(2)]);
        assert_eq!(s.ids(), vec![1, 2, 42]);
    }

    #[test]
    fn test_all_selected_requires_ids_and_entries() {
        let mut s: SelectionTracker<i64> = SelectionTracker::new();
        assert!(!s.is_all_selected(&[]));
        s.toggle(1);
        assert!(!s.is_all_selected(&[Some(1), None]));
        s.select_all_visible(&[Some(1), None]);
        assert_eq!(s.ids(), vec![1]);
    }

    #[test]
    fn test_remove_deleted_id() {
        let mut s = SelectionTracker::new();
        s.select_all_visible(&[Some("a".to_string()), Some("b".to_string())]);
        assert!(s.remove(&"a".to_string()));
        assert_eq!(s.ids(), vec!["b".to_string()]);
    }
}

//! Collection views: the in-memory store of one entity plus the derived
//! filtered, sorted, paginated and selectable projection of it.

pub mod debounce;
pub mod filter;
pub mod paginator;
pub mod selection;
pub mod sequence;
pub mod sort;

pub use debounce::{Debounce, SearchTrigger};
pub use filter::{Constraint, FilterCriteria};
pub use paginator::{Paginator, ShrinkPolicy};
pub use selection::SelectionTracker;
pub use sequence::{RequestSequencer, RequestTicket};
pub use sort::{SortDirection, SortState};

use crate::error::Result;
use crate::models::Entity;

/// Store, filter, sort, paginator and selection for one entity type.
///
/// `visible` holds store indices in filtered-then-sorted order and is rebuilt
/// from scratch on every change, so sorting always starts from filter order.
#[derive(Debug, Clone)]
pub struct CollectionView<E: Entity> {
    items: Vec<E>,
    criteria: FilterCriteria,
    sort: SortState,
    paginator: Paginator,
    selection: SelectionTracker<E::Id>,
    visible: Vec<usize>,
}

/// Why the derived view is being rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    /// Filter or search changed: back to page 1.
    Criteria,
    /// The store changed: apply the shrink policy.
    Data,
    /// Only the ordering changed: page untouched.
    Order,
}

impl<E: Entity> Default for CollectionView<E> {
    fn default() -> Self {
        CollectionView::new(10, ShrinkPolicy::default())
    }
}

impl<E: Entity> CollectionView<E> {
    pub fn new(page_size: usize, policy: ShrinkPolicy) -> Self {
        CollectionView {
            items: Vec::new(),
            criteria: FilterCriteria::new(),
            sort: SortState::default(),
            paginator: Paginator::new(page_size, policy),
            selection: SelectionTracker::new(),
            visible: Vec::new(),
        }
    }

    fn rebuild(&mut self, change: Change) {
        let mut visible = self.criteria.apply(&self.items);
        self.sort.apply(&self.items, &mut visible);
        self.visible = visible;
        match change {
            Change::Criteria => self.paginator.reset(self.visible.len()),
            Change::Data => self.paginator.resize(self.visible.len()),
            Change::Order => {}
        }
    }

    // Store

    /// Replace the whole store with a fresh fetch.
    ///
    /// Selected ids that no longer exist are dropped.
    pub fn replace_all(&mut self, items: Vec<E>) {
        self.items = items;
        let present: std::collections::BTreeSet<E::Id> =
            self.items.iter().filter_map(Entity::id).collect();
        self.selection.retain(|id| present.contains(id));
        self.rebuild(Change::Data);
    }

    /// Insert a created entity or replace an updated one (matched by id).
    pub fn upsert(&mut self, item: E) {
        let existing = item
            .id()
            .and_then(|id| self.items.iter().position(|e| e.id().as_ref() == Some(&id)));
        match existing {
            Some(pos) => self.items[pos] = item,
            None => self.items.push(item),
        }
        self.rebuild(Change::Data);
    }

    /// Remove a deleted entity and its selection.
    pub fn remove(&mut self, id: &E::Id) -> Option<E> {
        self.selection.remove(id);
        let pos = self.items.iter().position(|e| e.id().as_ref() == Some(id))?;
        let removed = self.items.remove(pos);
        self.rebuild(Change::Data);
        Some(removed)
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.items.iter().find(|e| e.id().as_ref() == Some(id))
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }

    // Filter

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_filter(&mut self, field: impl Into<String>, constraint: Constraint) {
        self.criteria.set(field, constraint);
        self.rebuild(Change::Criteria);
    }

    pub fn remove_filter(&mut self, field: &str) {
        self.criteria.remove(field);
        self.rebuild(Change::Criteria);
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.criteria.set_search(term);
        self.rebuild(Change::Criteria);
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.rebuild(Change::Criteria);
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.rebuild(Change::Criteria);
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// All filtered entities in sorted order, across pages.
    pub fn filtered(&self) -> impl Iterator<Item = &E> {
        self.visible.iter().map(|&i| &self.items[i])
    }

    // Sort

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Sort by `field`, flipping direction if it is already the active key.
    pub fn sort_by(&mut self, field: &str) -> Result<()> {
        SortState::validate::<E>(field)?;
        self.sort.toggle(field);
        self.rebuild(Change::Order);
        Ok(())
    }

    pub fn set_sort(&mut self, field: &str, direction: SortDirection) -> Result<()> {
        SortState::validate::<E>(field)?;
        self.sort = SortState::new(field, direction);
        self.rebuild(Change::Order);
        Ok(())
    }

    // Pagination

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages()
    }

    pub fn set_page(&mut self, n: usize) -> bool {
        self.paginator.set_page(n)
    }

    pub fn next_page(&mut self) -> bool {
        self.paginator.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.paginator.previous()
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.paginator.set_page_size(size);
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        self.paginator.page_numbers()
    }

    /// Entities on the current page.
    pub fn page(&self) -> Vec<&E> {
        self.visible[self.paginator.range()]
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    fn page_ids(&self) -> Vec<Option<E::Id>> {
        self.page().into_iter().map(Entity::id).collect()
    }

    // Selection

    pub fn toggle_selection(&mut self, id: E::Id) -> bool {
        self.selection.toggle(id)
    }

    pub fn is_selected(&self, id: &E::Id) -> bool {
        self.selection.is_selected(id)
    }

    pub fn select_all_visible(&mut self) {
        let ids = self.page_ids();
        self.selection.select_all_visible(&ids);
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.page_ids())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_ids(&self) -> Vec<E::Id> {
        self.selection.ids()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }
}

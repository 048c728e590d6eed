use std::cmp::Ordering;

use crate::enum_display_fromstr;
use crate::error::{ConsoleError, Result};
use crate::models::{Entity, FieldValue, compare_fields};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

enum_display_fromstr!(SortDirection, "sort direction", {
    Asc => "asc",
    Desc => "desc",
});

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Active sort key and direction. No field means collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    field: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        SortState {
            field: Some(field.into()),
            direction,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Re-selecting the active field flips the direction; a new field starts
    /// ascending.
    pub fn toggle(&mut self, field: &str) {
        if self.field.as_deref() == Some(field) {
            self.direction = self.direction.flip();
        } else {
            self.field = Some(field.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        self.field = None;
        self.direction = SortDirection::Asc;
    }

    /// Check `field` against the entity's sortable fields.
    pub fn validate<E: Entity>(field: &str) -> Result<()> {
        if E::SORT_FIELDS.contains(&field) {
            Ok(())
        } else {
            Err(ConsoleError::InvalidSortField {
                entity: E::LABEL,
                field: field.to_string(),
                expected: E::SORT_FIELDS.join(", "),
            })
        }
    }

    /// Sort `indices` (into `items`) in place.
    ///
    /// The sort is stable, so entities with equal keys keep the order they
    /// had coming out of the filter in both directions.
    pub fn apply<E: Entity>(&self, items: &[E], indices: &mut Vec<usize>) {
        let Some(field) = self.field.as_deref() else {
            return;
        };
        let mut keyed: Vec<(Option<FieldValue>, usize)> = indices
            .iter()
            .map(|&i| (items[i].field(field), i))
            .collect();
        keyed.sort_by(|a, b| {
            self.direction
                .apply(compare_fields(a.0.as_ref(), b.0.as_ref()))
        });
        *indices = keyed.into_iter().map(|(_, i)| i).collect();
    }
}

//! Filter criteria over entity collections.
//!
//! A criterion with an empty value is the same as no criterion at all. The
//! free-text term is matched against the entity's search fields (any may
//! match); every named constraint must hold.

use std::collections::BTreeMap;

use jiff::Timestamp;

use crate::error::{ConsoleError, Result};
use crate::models::{Entity, FieldValue, parse_instant};

/// A constraint on a single projected field.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Exact match after normalising the field to a string.
    Equals(String),
    /// Case-insensitive substring.
    Contains(String),
    /// Inclusive instant bounds; either side may be open.
    DateRange {
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    },
    /// Inclusive numeric bounds; either side may be open.
    NumberRange { min: Option<f64>, max: Option<f64> },
}

impl Constraint {
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Constraint::Equals(v) | Constraint::Contains(v) => v.is_empty(),
            Constraint::DateRange { from, to } => from.is_none() && to.is_none(),
            Constraint::NumberRange { min, max } => min.is_none() && max.is_none(),
        }
    }

    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        match self {
            Constraint::Equals(expected) => value.as_key() == *expected,
            Constraint::Contains(needle) => value
                .as_key()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Constraint::DateRange { from, to } => match value {
                FieldValue::Date(ts) => {
                    from.is_none_or(|from| *ts >= from) && to.is_none_or(|to| *ts <= to)
                }
                _ => false,
            },
            Constraint::NumberRange { min, max } => match value {
                FieldValue::Number(n) => {
                    min.is_none_or(|min| *n >= min) && max.is_none_or(|max| *n <= max)
                }
                _ => false,
            },
        }
    }

    /// Parse a `from..to` range; bounds that look numeric give a number range,
    /// anything else is read as dates. Either bound may be omitted.
    pub fn parse_range(raw: &str) -> Result<Self> {
        let Some((lo, hi)) = raw.split_once("..") else {
            return Err(ConsoleError::InvalidInput(format!(
                "range '{raw}' must look like FROM..TO"
            )));
        };
        let (lo, hi) = (lo.trim(), hi.trim());
        let numeric = [lo, hi]
            .iter()
            .all(|b| b.is_empty() || b.parse::<f64>().is_ok());

        if numeric {
            return Ok(Constraint::NumberRange {
                min: lo.parse().ok(),
                max: hi.parse().ok(),
            });
        }

        let bound = |b: &str| -> Result<Option<Timestamp>> {
            if b.is_empty() {
                return Ok(None);
            }
            parse_instant(b)
                .map(Some)
                .ok_or_else(|| ConsoleError::InvalidInput(format!("invalid date '{b}'")))
        };
        Ok(Constraint::DateRange {
            from: bound(lo)?,
            to: bound(hi)?,
        })
    }
}

/// Named constraints plus one free-text term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    constraints: BTreeMap<String, Constraint>,
    search: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the constraint on `field`. An unconstrained value
    /// removes the key.
    pub fn set(&mut self, field: impl Into<String>, constraint: Constraint) {
        let field = field.into();
        if constraint.is_unconstrained() {
            self.constraints.remove(&field);
        } else {
            self.constraints.insert(field, constraint);
        }
    }

    pub fn with(mut self, field: impl Into<String>, constraint: Constraint) -> Self {
        self.set(field, constraint);
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<Constraint> {
        self.constraints.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&Constraint> {
        self.constraints.get(field)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
        self.search.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.search.trim().is_empty()
    }

    pub fn constraints(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        let term = self.search.trim().to_lowercase();
        if !term.is_empty() {
            let hit = E::SEARCH_FIELDS.iter().any(|name| {
                entity
                    .field(name)
                    .is_some_and(|v| v.as_key().to_lowercase().contains(&term))
            });
            if !hit {
                return false;
            }
        }

        self.constraints
            .iter()
            .all(|(name, constraint)| constraint.matches(entity.field(name).as_ref()))
    }

    /// Indices of matching entities, in collection order.
    pub fn apply<E: Entity>(&self, items: &[E]) -> Vec<usize> {
        if self.is_empty() {
            return (0..items.len()).collect();
        }
        items
            .iter()
            .enumerate()
            .filter(|(_, e)| self.matches(*e))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, AssetStatus};

    fn asset(id: i64, nom: &str, etat: AssetStatus) -> Asset {
        Asset {
            id: Some(id),
            nom: nom.to_string(),
            etat: Some(etat),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_collection_stays_empty() {
        let items: Vec<Asset> = Vec::new();
        let criteria = FilterCriteria::new()
            .with("status", Constraint::Equals("EN_PANNE".into()))
            .with("nom", Constraint::Contains("x".into()));
        assert!(criteria.apply(&items).is_empty());
        assert!(FilterCriteria::new().apply(&items).is_empty());
    }

    #[test]
    fn test_no_criteria_is_identity() {
        let items = vec![
            asset(3, "c", AssetStatus::EnService),
            asset(1, "a", AssetStatus::EnPanne),
        ];
        assert_eq!(FilterCriteria::new().apply(&items), vec![0, 1]);
    }

    #[test]
    fn test_status_equality() {
        let items = vec![
            asset(1, "Scanner", AssetStatus::EnService),
            asset(2, "GPS", AssetStatus::EnPanne),
        ];
        let criteria = FilterCriteria::new().with("status", Constraint::Equals("EN_PANNE".into()));
        let hits: Vec<i64> = criteria
            .apply(&items)
            .into_iter()
            .filter_map(|i| items[i].id)
            .collect();
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn test_search_is_or_over_fields_and_case_insensitive() {
        let mut a = asset(1, "Station totale", AssetStatus::EnService);
        a.numero_serie = Some("SN-778".into());
        let b = asset(2, "Imprimante", AssetStatus::EnService);
        let items = vec![a, b];

        let mut criteria = FilterCriteria::new();
        criteria.set_search("sn-7");
        assert_eq!(criteria.apply(&items), vec![0]);

        criteria.set_search("IMPRI");
        assert_eq!(criteria.apply(&items), vec![1]);
    }

    #[test]
    fn test_search_and_constraint_combine() {
        let items = vec![
            asset(1, "Laptop Dell", AssetStatus::EnService),
            asset(2, "Laptop HP", AssetStatus::EnPanne),
        ];
        let mut criteria =
            FilterCriteria::new().with("etat", Constraint::Equals("EN_PANNE".into()));
        criteria.set_search("laptop");
        assert_eq!(criteria.apply(&items), vec![1]);
    }

    #[test]
    fn test_empty_value_removes_constraint() {
        let mut criteria = FilterCriteria::new().with("etat", Constraint::Equals("EN_PANNE".into()));
        criteria.set("etat", Constraint::Equals(String::new()));
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_missing_field_does_not_match() {
        let items = vec![Asset {
            id: Some(1),
            nom: "Sans état".into(),
            ..Default::default()
        }];
        let criteria = FilterCriteria::new().with("etat", Constraint::Equals("EN_SERVICE".into()));
        assert!(criteria.apply(&items).is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let mut early = asset(1, "a", AssetStatus::EnService);
        early.date_acquisition = Some("2023-01-01".into());
        let mut late = asset(2, "b", AssetStatus::EnService);
        late.date_acquisition = Some("2024-06-30".into());
        let items = vec![early, late];

        let range = Constraint::parse_range("2023-01-01..2024-01-01").unwrap();
        let criteria = FilterCriteria::new().with("dateAcquisition", range);
        assert_eq!(criteria.apply(&items), vec![0]);

        let open = Constraint::parse_range("2024-06-30..").unwrap();
        let criteria = FilterCriteria::new().with("dateAcquisition", open);
        assert_eq!(criteria.apply(&items), vec![1]);
    }

    #[test]
    fn test_number_range() {
        let mut cheap = asset(1, "a", AssetStatus::EnService);
        cheap.valeur = Some(100.0);
        let mut dear = asset(2, "b", AssetStatus::EnService);
        dear.valeur = Some(5000.0);
        let items = vec![cheap, dear];

        let range = Constraint::parse_range("..1000").unwrap();
        assert_eq!(
            range,
            Constraint::NumberRange {
                min: None,
                max: Some(1000.0)
            }
        );
        let criteria = FilterCriteria::new().with("valeur", range);
        assert_eq!(criteria.apply(&items), vec![0]);
    }

    #[test]
    fn test_parse_range_rejects_bad_input() {
        assert!(Constraint::parse_range("2024-01-01").is_err());
        assert!(Constraint::parse_range("soon..later").is_err());
    }
}

//! Domain records exchanged with the backend.
//!
//! Every record implements [`Entity`], which gives the view engine a uniform
//! way to read identifiers and project named fields for filtering and sorting.

mod asset;
mod category;
mod date;
mod historique;
mod intervention;
mod notification;
mod reclamation;
mod service;
mod technicien;
mod user;

use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use jiff::Timestamp;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use asset::{Asset, AssetCategory, AssetInput, AssetStats, AssetStatus};
pub use category::{Category, CategoryInput, CategoryStats};
pub use date::parse_instant;
pub use historique::{ActionType, ActorRole, HistoriqueEntry, HistoriqueStats};
pub use intervention::{
    Intervention, InterventionInput, InterventionStats, InterventionStatus, InterventionType,
};
pub use notification::{
    Notification, NotificationInput, NotificationPriority, NotificationStats, NotificationStatus,
    NotificationType,
};
pub use reclamation::{
    AuthorKind, Commentaire, Reclamation, ReclamationInput, ReclamationStats, ReclamationStatus,
    ReclamationType,
};
pub use service::{ServiceDirection, ServiceInput};
pub use technicien::Technicien;
pub use user::{User, UserInput, UserPermissions, UserRole, UserStats};

use crate::enum_display_fromstr;

/// A record held in a collection view.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Ord + Display + Debug + Send + Sync + 'static;

    /// Human label used in messages ("asset", "category", ...).
    const LABEL: &'static str;

    /// Fields the free-text search term is matched against (OR).
    const SEARCH_FIELDS: &'static [&'static str];

    /// Fields accepted as sort keys.
    const SORT_FIELDS: &'static [&'static str];

    /// Identifier, absent until the backend has created the record.
    fn id(&self) -> Option<Self::Id>;

    /// Project a named field. `None` when the record has no value for it.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// A projected field value, comparable across records of the same entity.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(Timestamp),
    /// Ordinal enums (priorities): numeric rank plus the wire label.
    Rank(u8, &'static str),
    Flag(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Optional text, dropping empty strings.
    pub fn opt_text(value: Option<&str>) -> Option<Self> {
        value.filter(|v| !v.is_empty()).map(FieldValue::text)
    }

    /// Optional ISO date string, dropping values that do not parse.
    pub fn opt_date(value: Option<&str>) -> Option<Self> {
        value.and_then(parse_instant).map(FieldValue::Date)
    }

    /// String form used for equality and substring matching.
    pub fn as_key(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Date(ts) => ts.to_string(),
            FieldValue::Rank(_, label) => (*label).to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }

    /// Three-way comparison used by the sort engine.
    ///
    /// Text compares lower-cased, numbers numerically, dates as instants and
    /// ranks by rank. Mismatched kinds fall back to their string forms.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            (FieldValue::Rank(a, _), FieldValue::Rank(b, _)) => a.cmp(b),
            (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(b),
            (a, b) => a.as_key().to_lowercase().cmp(&b.as_key().to_lowercase()),
        }
    }
}

/// Compare optional projections; a missing value sorts before any present one.
pub fn compare_fields(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.compare(b),
    }
}

/// Priority shared by interventions and reclamations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Critique,
    Haute,
    Moyenne,
    Basse,
}

enum_display_fromstr!(Priority, "priority", {
    Critique => "CRITIQUE",
    Haute => "HAUTE",
    Moyenne => "MOYENNE",
    Basse => "BASSE",
});

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critique => 4,
            Priority::Haute => 3,
            Priority::Moyenne => 2,
            Priority::Basse => 1,
        }
    }

    pub fn field(&self) -> FieldValue {
        FieldValue::Rank(self.rank(), self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_key_drops_integral_fraction() {
        assert_eq!(FieldValue::Number(3.0).as_key(), "3");
        assert_eq!(FieldValue::Number(2.5).as_key(), "2.5");
    }

    #[test]
    fn test_text_compare_ignores_case() {
        let a = FieldValue::text("alpha");
        let b = FieldValue::text("Beta");
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(
            FieldValue::text("SAME").compare(&FieldValue::text("same")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_missing_sorts_first() {
        let present = FieldValue::Number(1.0);
        assert_eq!(compare_fields(None, Some(&present)), Ordering::Less);
        assert_eq!(compare_fields(Some(&present), None), Ordering::Greater);
        assert_eq!(compare_fields(None, None), Ordering::Equal);
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::Critique.rank() > Priority::Haute.rank());
        assert!(Priority::Haute.rank() > Priority::Moyenne.rank());
        assert!(Priority::Moyenne.rank() > Priority::Basse.rank());
        assert_eq!(
            Priority::Basse.field().compare(&Priority::Critique.field()),
            Ordering::Less
        );
        assert_eq!(Priority::Haute.field().as_key(), "HAUTE");
    }
}

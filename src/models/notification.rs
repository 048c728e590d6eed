use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Entity, FieldValue};
use crate::enum_display_fromstr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NotificationType {
    #[default]
    Info,
    Succes,
    Avertissement,
    Erreur,
    NouvelleReclamation,
    Assignation,
    ChangementStatut,
    Commentaire,
    Echeance,
    Rappel,
    Systeme,
}

enum_display_fromstr!(NotificationType, "notification type", {
    Info => "INFO",
    Succes => "SUCCES",
    Avertissement => "AVERTISSEMENT",
    Erreur => "ERREUR",
    NouvelleReclamation => "NOUVELLE_RECLAMATION",
    Assignation => "ASSIGNATION",
    ChangementStatut => "CHANGEMENT_STATUT",
    Commentaire => "COMMENTAIRE",
    Echeance => "ECHEANCE",
    Rappel => "RAPPEL",
    Systeme => "SYSTEME",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NotificationPriority {
    Basse,
    #[default]
    Normale,
    Haute,
    Critique,
}

enum_display_fromstr!(NotificationPriority, "notification priority", {
    Basse => "BASSE",
    Normale => "NORMALE",
    Haute => "HAUTE",
    Critique => "CRITIQUE",
});

impl NotificationPriority {
    pub fn rank(&self) -> u8 {
        match self {
            NotificationPriority::Basse => 1,
            NotificationPriority::Normale => 2,
            NotificationPriority::Haute => 3,
            NotificationPriority::Critique => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationStatus {
    NonLue,
    Lue,
    Archivee,
}

enum_display_fromstr!(NotificationStatus, "notification status", {
    NonLue => "NON_LUE",
    Lue => "LUE",
    Archivee => "ARCHIVEE",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NotificationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorite: Option<NotificationPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<NotificationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilisateur_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilisateur_nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamation_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamation_numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_lue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_expiration: Option<String>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.statut == Some(NotificationStatus::NonLue)
    }
}

impl Entity for Notification {
    type Id = i64;

    const LABEL: &'static str = "notification";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["titre", "message", "utilisateurNom", "reclamationNumero"];
    const SORT_FIELDS: &'static [&'static str] =
        &["id", "titre", "type", "priorite", "statut", "dateCreation"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "titre" => FieldValue::opt_text(Some(&self.titre)),
            "message" => FieldValue::opt_text(Some(&self.message)),
            "utilisateurNom" => FieldValue::opt_text(self.utilisateur_nom.as_deref()),
            "reclamationNumero" => FieldValue::opt_text(self.reclamation_numero.as_deref()),
            "type" => self.kind.map(|k| FieldValue::text(k.as_str())),
            "priorite" | "priority" => self
                .priorite
                .map(|p| FieldValue::Rank(p.rank(), p.as_str())),
            "statut" | "status" => self.statut.map(|s| FieldValue::text(s.as_str())),
            "utilisateurId" => self.utilisateur_id.map(|id| FieldValue::Number(id as f64)),
            "reclamationId" => self.reclamation_id.map(|id| FieldValue::Number(id as f64)),
            "dateCreation" => FieldValue::opt_date(self.date_creation.as_deref()),
            _ => None,
        }
    }
}

/// Body of `POST /notifications`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInput {
    pub titre: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub priorite: NotificationPriority,
    pub utilisateur_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclamation_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationStats {
    pub total: u64,
    pub non_lues: u64,
    pub par_type: BTreeMap<String, u64>,
    pub par_priorite: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_renamed() {
        let n: Notification = serde_json::from_str(
            r#"{"id": 1, "titre": "t", "message": "m", "type": "ECHEANCE",
                "priorite": "HAUTE", "statut": "NON_LUE"}"#,
        )
        .unwrap();
        assert_eq!(n.kind, Some(NotificationType::Echeance));
        assert!(n.is_unread());
        assert_eq!(n.field("priorite"), Some(FieldValue::Rank(3, "HAUTE")));
        let back = serde_json::to_value(&n).unwrap();
        assert_eq!(back["type"], "ECHEANCE");
    }
}

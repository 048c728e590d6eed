use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Asset, Entity, FieldValue, Priority, ServiceDirection, Technicien, parse_instant};
use crate::enum_display_fromstr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReclamationType {
    Technique,
    Fonctionnel,
    Performance,
    Securite,
    Acces,
    Formation,
    Autre,
}

enum_display_fromstr!(ReclamationType, "reclamation type", {
    Technique => "TECHNIQUE",
    Fonctionnel => "FONCTIONNEL",
    Performance => "PERFORMANCE",
    Securite => "SECURITE",
    Acces => "ACCES",
    Formation => "FORMATION",
    Autre => "AUTRE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReclamationStatus {
    Nouvelle,
    EnAttente,
    EnCours,
    EnAttenteClient,
    Resolue,
    Fermee,
    Annulee,
}

enum_display_fromstr!(ReclamationStatus, "reclamation status", {
    Nouvelle => "NOUVELLE",
    EnAttente => "EN_ATTENTE",
    EnCours => "EN_COURS",
    EnAttenteClient => "EN_ATTENTE_CLIENT",
    Resolue => "RESOLUE",
    Fermee => "FERMEE",
    Annulee => "ANNULEE",
});

impl ReclamationStatus {
    /// Resolved or closed; such a claim is never late.
    pub fn is_settled(&self) -> bool {
        matches!(self, ReclamationStatus::Resolue | ReclamationStatus::Fermee)
    }
}

/// Who wrote a comment on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorKind {
    Reclamant,
    Technicien,
    Admin,
}

enum_display_fromstr!(AuthorKind, "author type", {
    Reclamant => "RECLAMANT",
    Technicien => "TECHNICIEN",
    Admin => "ADMIN",
});

/// A comment in a claim's discussion thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commentaire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub contenu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auteur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_auteur: Option<AuthorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
}

/// A complaint filed against a service or an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reclamation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    #[serde(default)]
    pub objet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_reclamation: Option<ReclamationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorite: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<ReclamationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_echeance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamant_nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamant_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamant_telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_direction: Option<ServiceDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Box<Asset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technicien_assigne: Option<Technicien>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_client: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temps_resolution: Option<f64>,
}

impl Reclamation {
    /// Past its due date at `now` without being resolved or closed.
    pub fn is_overdue_at(&self, now: Timestamp) -> bool {
        if self.statut.is_some_and(|s| s.is_settled()) {
            return false;
        }
        self.date_echeance
            .as_deref()
            .and_then(parse_instant)
            .is_some_and(|due| now > due)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Timestamp::now())
    }
}

impl Entity for Reclamation {
    type Id = i64;

    const LABEL: &'static str = "reclamation";
    const SEARCH_FIELDS: &'static [&'static str] = &[
        "objet",
        "description",
        "reclamantNom",
        "reclamantEmail",
        "numero",
    ];
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "numero",
        "objet",
        "typeReclamation",
        "priorite",
        "statut",
        "dateCreation",
        "dateEcheance",
        "reclamantNom",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "numero" => FieldValue::opt_text(self.numero.as_deref()),
            "objet" => FieldValue::opt_text(Some(&self.objet)),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "reclamantNom" => FieldValue::opt_text(self.reclamant_nom.as_deref()),
            "reclamantEmail" => FieldValue::opt_text(self.reclamant_email.as_deref()),
            "typeReclamation" | "type" => {
                self.type_reclamation.map(|t| FieldValue::text(t.as_str()))
            }
            "priorite" | "priority" => self.priorite.map(|p| p.field()),
            "statut" | "status" => self.statut.map(|s| FieldValue::text(s.as_str())),
            "technicienId" => self
                .technicien_assigne
                .as_ref()
                .and_then(|t| t.id)
                .map(|id| FieldValue::Number(id as f64)),
            "serviceId" => self
                .service_direction
                .as_ref()
                .and_then(|s| s.id)
                .map(|id| FieldValue::Number(id as f64)),
            "dateCreation" => FieldValue::opt_date(self.date_creation.as_deref()),
            "dateEcheance" => FieldValue::opt_date(self.date_echeance.as_deref()),
            "dateResolution" => FieldValue::opt_date(self.date_resolution.as_deref()),
            "satisfactionClient" => self.satisfaction_client.map(|s| FieldValue::Number(s as f64)),
            "enRetard" | "overdue" => Some(FieldValue::Flag(self.is_overdue())),
            _ => None,
        }
    }
}

/// Body of `POST /reclamations` and `PUT /reclamations/{id}`.
///
/// Attachments are not sent; the backend accepts the JSON form without them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclamationInput {
    pub objet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_reclamation: Option<ReclamationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorite: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<ReclamationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_echeance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclamant_nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclamant_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclamant_telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<i64>,
}

impl From<&Reclamation> for ReclamationInput {
    fn from(reclamation: &Reclamation) -> Self {
        ReclamationInput {
            objet: reclamation.objet.clone(),
            description: reclamation.description.clone(),
            type_reclamation: reclamation.type_reclamation,
            priorite: reclamation.priorite,
            statut: reclamation.statut,
            date_echeance: reclamation.date_echeance.clone(),
            reclamant_nom: reclamation.reclamant_nom.clone(),
            reclamant_email: reclamation.reclamant_email.clone(),
            reclamant_telephone: reclamation.reclamant_telephone.clone(),
            service_id: reclamation.service_direction.as_ref().and_then(|s| s.id),
            asset_id: reclamation.asset.as_ref().and_then(|a| a.id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReclamationStats {
    pub total: u64,
    pub nouvelles: u64,
    pub en_cours: u64,
    pub en_attente: u64,
    pub resolues: u64,
    pub fermees: u64,
    pub en_retard: u64,
    pub temps_moyen_resolution: f64,
    pub taux_satisfaction: f64,
}

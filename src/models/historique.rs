use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Entity, FieldValue};
use crate::enum_display_fromstr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    Creation,
    Modification,
    ChangementStatut,
    Assignation,
    Commentaire,
    PieceJointe,
    Resolution,
    Fermeture,
    Suppression,
    Export,
    Consultation,
}

enum_display_fromstr!(ActionType, "history action", {
    Creation => "CREATION",
    Modification => "MODIFICATION",
    ChangementStatut => "CHANGEMENT_STATUT",
    Assignation => "ASSIGNATION",
    Commentaire => "COMMENTAIRE",
    PieceJointe => "PIECE_JOINTE",
    Resolution => "RESOLUTION",
    Fermeture => "FERMETURE",
    Suppression => "SUPPRESSION",
    Export => "EXPORT",
    Consultation => "CONSULTATION",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Admin,
    Technicien,
    Reclamant,
    Superviseur,
    System,
}

enum_display_fromstr!(ActorRole, "actor role", {
    Admin => "ADMIN",
    Technicien => "TECHNICIEN",
    Reclamant => "RECLAMANT",
    Superviseur => "SUPERVISEUR",
    System => "SYSTEM",
});

/// One audit-trail entry attached to a reclamation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoriqueEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamation_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reclamation_numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionType>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancienne_valeur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nouvelle_valeur: Option<String>,
    #[serde(default)]
    pub utilisateur: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_utilisateur: Option<ActorRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_action: Option<String>,
    #[serde(rename = "adresseIP", default, skip_serializing_if = "Option::is_none")]
    pub adresse_ip: Option<String>,
}

impl Entity for HistoriqueEntry {
    type Id = i64;

    const LABEL: &'static str = "history entry";
    const SEARCH_FIELDS: &'static [&'static str] = &[
        "description",
        "utilisateur",
        "reclamationNumero",
        "ancienneValeur",
        "nouvelleValeur",
    ];
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "dateAction",
        "action",
        "utilisateur",
        "roleUtilisateur",
        "reclamationNumero",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "description" => FieldValue::opt_text(Some(&self.description)),
            "utilisateur" => FieldValue::opt_text(Some(&self.utilisateur)),
            "reclamationNumero" => FieldValue::opt_text(self.reclamation_numero.as_deref()),
            "ancienneValeur" => FieldValue::opt_text(self.ancienne_valeur.as_deref()),
            "nouvelleValeur" => FieldValue::opt_text(self.nouvelle_valeur.as_deref()),
            "reclamationId" => self.reclamation_id.map(|id| FieldValue::Number(id as f64)),
            "action" => self.action.map(|a| FieldValue::text(a.as_str())),
            "roleUtilisateur" | "role" => {
                self.role_utilisateur.map(|r| FieldValue::text(r.as_str()))
            }
            "dateAction" | "date" => FieldValue::opt_date(self.date_action.as_deref()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoriqueStats {
    pub total_actions: u64,
    pub actions_par_type: BTreeMap<String, u64>,
    pub actions_par_utilisateur: BTreeMap<String, u64>,
    pub utilisateurs_actifs: u64,
}

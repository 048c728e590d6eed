use serde::{Deserialize, Serialize};

use super::{Asset, Entity, FieldValue, Priority, ServiceDirection, Technicien};
use crate::enum_display_fromstr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterventionType {
    MaintenancePreventive,
    MaintenanceCorrective,
    Reparation,
    Installation,
    Configuration,
    MiseAJour,
    Diagnostic,
    Autre,
}

enum_display_fromstr!(InterventionType, "intervention type", {
    MaintenancePreventive => "MAINTENANCE_PREVENTIVE",
    MaintenanceCorrective => "MAINTENANCE_CORRECTIVE",
    Reparation => "REPARATION",
    Installation => "INSTALLATION",
    Configuration => "CONFIGURATION",
    MiseAJour => "MISE_A_JOUR",
    Diagnostic => "DIAGNOSTIC",
    Autre => "AUTRE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterventionStatus {
    Planifiee,
    EnAttente,
    EnCours,
    Suspendue,
    Terminee,
    Annulee,
    Validee,
}

enum_display_fromstr!(InterventionStatus, "intervention status", {
    Planifiee => "PLANIFIEE",
    EnAttente => "EN_ATTENTE",
    EnCours => "EN_COURS",
    Suspendue => "SUSPENDUE",
    Terminee => "TERMINEE",
    Annulee => "ANNULEE",
    Validee => "VALIDEE",
});

impl InterventionStatus {
    /// Whether work on the intervention is over, one way or another.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            InterventionStatus::Terminee | InterventionStatus::Annulee | InterventionStatus::Validee
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub titre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_intervention: Option<InterventionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priorite: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<InterventionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_echeance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duree_estimee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duree_reelle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Box<Asset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technicien_assigne: Option<Technicien>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_direction: Option<ServiceDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cree_par: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validateur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_validation: Option<String>,
}

impl Entity for Intervention {
    type Id = i64;

    const LABEL: &'static str = "intervention";
    const SEARCH_FIELDS: &'static [&'static str] = &["titre", "description", "creePar"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "titre",
        "typeIntervention",
        "priorite",
        "statut",
        "dateCreation",
        "dateDebut",
        "dateEcheance",
        "cout",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "titre" => FieldValue::opt_text(Some(&self.titre)),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "creePar" => FieldValue::opt_text(self.cree_par.as_deref()),
            "typeIntervention" | "type" => {
                self.type_intervention.map(|t| FieldValue::text(t.as_str()))
            }
            "priorite" | "priority" => self.priorite.map(|p| p.field()),
            "statut" | "status" => self.statut.map(|s| FieldValue::text(s.as_str())),
            "technicienId" => self
                .technicien_assigne
                .as_ref()
                .and_then(|t| t.id)
                .map(|id| FieldValue::Number(id as f64)),
            "technicien" => self
                .technicien_assigne
                .as_ref()
                .map(|t| FieldValue::text(t.full_name())),
            "serviceId" => self
                .service_direction
                .as_ref()
                .and_then(|s| s.id)
                .map(|id| FieldValue::Number(id as f64)),
            "assetId" => self
                .asset
                .as_ref()
                .and_then(|a| a.id)
                .map(|id| FieldValue::Number(id as f64)),
            "dateCreation" => FieldValue::opt_date(self.date_creation.as_deref()),
            "dateDebut" => FieldValue::opt_date(self.date_debut.as_deref()),
            "dateFin" => FieldValue::opt_date(self.date_fin.as_deref()),
            "dateEcheance" => FieldValue::opt_date(self.date_echeance.as_deref()),
            "cout" => self.cout.map(FieldValue::Number),
            _ => None,
        }
    }
}

/// Body of `POST /interventions` and `PUT /interventions/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionInput {
    pub titre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_intervention: Option<InterventionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priorite: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<InterventionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_echeance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duree_estimee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technicien_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
}

impl From<&Intervention> for InterventionInput {
    fn from(intervention: &Intervention) -> Self {
        InterventionInput {
            titre: intervention.titre.clone(),
            description: intervention.description.clone(),
            type_intervention: intervention.type_intervention,
            priorite: intervention.priorite,
            statut: intervention.statut,
            date_echeance: intervention.date_echeance.clone(),
            duree_estimee: intervention.duree_estimee,
            cout: intervention.cout,
            asset_id: intervention.asset.as_ref().and_then(|a| a.id),
            technicien_id: intervention.technicien_assigne.as_ref().and_then(|t| t.id),
            service_id: intervention.service_direction.as_ref().and_then(|s| s.id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterventionStats {
    pub total: u64,
    pub planifiees: u64,
    pub en_cours: u64,
    pub terminees: u64,
    pub en_retard: u64,
    pub critiques: u64,
    pub cout_total: f64,
    #[serde(alias = "dureeMovenne")]
    pub duree_moyenne: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_projects_rank() {
        let json = r#"{"id": 4, "titre": "Vidange", "priorite": "CRITIQUE",
            "statut": "EN_COURS", "technicienAssigne": {"id": 12, "nom": "Diallo", "prenom": "Awa"}}"#;
        let intervention: Intervention = serde_json::from_str(json).unwrap();
        assert_eq!(
            intervention.field("priorite"),
            Some(FieldValue::Rank(4, "CRITIQUE"))
        );
        assert_eq!(intervention.field("technicienId").unwrap().as_key(), "12");
        assert_eq!(intervention.field("technicien").unwrap().as_key(), "Awa Diallo");
        assert!(!intervention.statut.unwrap().is_closed());
    }

    #[test]
    fn test_stats_accepts_backend_typo() {
        let stats: InterventionStats =
            serde_json::from_str(r#"{"total": 3, "dureeMovenne": 2.5}"#).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.duree_moyenne, 2.5);
    }
}

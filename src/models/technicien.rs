use serde::{Deserialize, Serialize};

use super::{Entity, FieldValue, ServiceDirection};

/// A field technician, assignable to interventions and reclamations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technicien {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub prenom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actif: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
}

impl Technicien {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

impl Entity for Technicien {
    type Id = i64;

    const LABEL: &'static str = "technician";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["nom", "prenom", "email", "specialite", "telephone"];
    const SORT_FIELDS: &'static [&'static str] =
        &["id", "nom", "prenom", "email", "specialite", "actif", "dateCreation"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "nom" => FieldValue::opt_text(Some(&self.nom)),
            "prenom" => FieldValue::opt_text(Some(&self.prenom)),
            "name" => FieldValue::opt_text(Some(&self.full_name())),
            "email" => FieldValue::opt_text(self.email.as_deref()),
            "telephone" => FieldValue::opt_text(self.telephone.as_deref()),
            "specialite" => FieldValue::opt_text(self.specialite.as_deref()),
            "serviceId" => self
                .service
                .as_ref()
                .and_then(|s| s.id)
                .map(|id| FieldValue::Number(id as f64)),
            "actif" | "active" => self.actif.map(FieldValue::Flag),
            "dateCreation" => FieldValue::opt_date(self.date_creation.as_deref()),
            _ => None,
        }
    }
}

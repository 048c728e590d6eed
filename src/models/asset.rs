use serde::{Deserialize, Serialize};

use super::{Entity, FieldValue, ServiceDirection};
use crate::enum_display_fromstr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetStatus {
    EnService,
    EnPanne,
    EnMaintenance,
    HorsUsage,
}

enum_display_fromstr!(AssetStatus, "asset status", {
    EnService => "EN_SERVICE",
    EnPanne => "EN_PANNE",
    EnMaintenance => "EN_MAINTENANCE",
    HorsUsage => "HORS_USAGE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    Topographique,
    Informatique,
    Vehicule,
    Mobilier,
    Autre,
}

enum_display_fromstr!(AssetCategory, "asset category", {
    Topographique => "TOPOGRAPHIQUE",
    Informatique => "INFORMATIQUE",
    Vehicule => "VEHICULE",
    Mobilier => "MOBILIER",
    Autre => "AUTRE",
});

/// An asset ("actif") owned by a service direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorie: Option<AssetCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etat: Option<AssetStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_acquisition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valeur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_serie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localisation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
}

impl Asset {
    /// Owning service id, from the flat field or the embedded service.
    pub fn owning_service_id(&self) -> Option<i64> {
        self.service_id
            .or_else(|| self.service.as_ref().and_then(|s| s.id))
    }
}

impl Entity for Asset {
    type Id = i64;

    const LABEL: &'static str = "asset";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["nom", "reference", "description", "numeroSerie"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "id",
        "nom",
        "reference",
        "categorie",
        "etat",
        "service",
        "dateAcquisition",
        "valeur",
        "localisation",
        "dateCreation",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "nom" | "name" => FieldValue::opt_text(Some(&self.nom)),
            "reference" => FieldValue::opt_text(self.reference.as_deref()),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "numeroSerie" => FieldValue::opt_text(self.numero_serie.as_deref()),
            "localisation" => FieldValue::opt_text(self.localisation.as_deref()),
            "etat" | "status" => self.etat.map(|s| FieldValue::text(s.as_str())),
            "categorie" | "category" => self.categorie.map(|c| FieldValue::text(c.as_str())),
            "serviceId" => self
                .owning_service_id()
                .map(|id| FieldValue::Number(id as f64)),
            "service" | "serviceName" => self
                .service
                .as_ref()
                .and_then(|s| FieldValue::opt_text(s.service_name.as_deref())),
            "dateAcquisition" => FieldValue::opt_date(self.date_acquisition.as_deref()),
            "dateCreation" => FieldValue::opt_date(self.date_creation.as_deref()),
            "valeur" | "value" => self.valeur.map(FieldValue::Number),
            _ => None,
        }
    }
}

/// Body of `POST /assets` and `PUT /assets/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie: Option<AssetCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etat: Option<AssetStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_acquisition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valeur: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_serie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localisation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
}

impl From<&Asset> for AssetInput {
    fn from(asset: &Asset) -> Self {
        AssetInput {
            nom: asset.nom.clone(),
            reference: asset.reference.clone(),
            description: asset.description.clone(),
            categorie: asset.categorie,
            etat: asset.etat,
            date_acquisition: asset.date_acquisition.clone(),
            valeur: asset.valeur,
            numero_serie: asset.numero_serie.clone(),
            localisation: asset.localisation.clone(),
            service_id: asset.owning_service_id(),
        }
    }
}

/// Aggregates returned by `GET /assets/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetStats {
    pub total_assets: u64,
    pub active_assets: u64,
    pub maintenance_assets: u64,
    pub broken_assets: u64,
    pub out_of_service_assets: u64,
    pub total_value: f64,
    pub average_age: f64,
}

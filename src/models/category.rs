use serde::{Deserialize, Serialize};

use super::{Entity, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couleur: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icone: Option<String>,
    #[serde(default = "default_actif")]
    pub actif: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre_actifs: Option<u64>,
}

fn default_actif() -> bool {
    true
}

impl Entity for Category {
    type Id = i64;

    const LABEL: &'static str = "category";
    const SEARCH_FIELDS: &'static [&'static str] = &["nom", "code", "description"];
    const SORT_FIELDS: &'static [&'static str] =
        &["id", "nom", "code", "actif", "nombreActifs", "dateCreation"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "nom" | "name" => FieldValue::opt_text(Some(&self.nom)),
            "code" => FieldValue::opt_text(Some(&self.code)),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "couleur" => FieldValue::opt_text(self.couleur.as_deref()),
            "actif" | "active" => Some(FieldValue::Flag(self.actif)),
            "nombreActifs" => self.nombre_actifs.map(|n| FieldValue::Number(n as f64)),
            "dateCreation" => FieldValue::opt_date(self.date_creation.as_deref()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub nom: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub couleur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icone: Option<String>,
    pub actif: bool,
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        CategoryInput {
            nom: category.nom.clone(),
            code: category.code.clone(),
            description: category.description.clone(),
            couleur: category.couleur.clone(),
            icone: category.icone.clone(),
            actif: category.actif,
        }
    }
}

/// Aggregates returned by `GET /categories/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub with_assets: u64,
    pub without_assets: u64,
}

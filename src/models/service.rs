use serde::{Deserialize, Serialize};

use super::{Entity, FieldValue};

/// An organisational unit ("service / direction") owning assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDirection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actif: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_creation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modification: Option<String>,
}

impl Entity for ServiceDirection {
    type Id = i64;

    const LABEL: &'static str = "service";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["serviceName", "code", "responsable", "description"];
    const SORT_FIELDS: &'static [&'static str] =
        &["id", "serviceName", "code", "responsable", "actif", "dateCreation"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|id| FieldValue::Number(id as f64)),
            "serviceName" | "nom" | "name" => FieldValue::opt_text(self.service_name.as_deref()),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "code" => FieldValue::opt_text(self.code.as_deref()),
            "responsable" => FieldValue::opt_text(self.responsable.as_deref()),
            "email" => FieldValue::opt_text(self.email.as_deref()),
            "telephone" => FieldValue::opt_text(self.telephone.as_deref()),
            "actif" | "active" => self.actif.map(FieldValue::Flag),
            "dateCreation" => FieldValue::opt_date(self.date_creation.as_deref()),
            _ => None,
        }
    }
}

/// Body of `POST /services` and `PUT /services/{id}`; the backend names the
/// service `nom` on input and `serviceName` on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actif: Option<bool>,
}

impl From<&ServiceDirection> for ServiceInput {
    fn from(service: &ServiceDirection) -> Self {
        ServiceInput {
            nom: service.service_name.clone().unwrap_or_default(),
            description: service.description.clone(),
            code: service.code.clone(),
            responsable: service.responsable.clone(),
            email: service.email.clone(),
            telephone: service.telephone.clone(),
            actif: service.actif,
        }
    }
}

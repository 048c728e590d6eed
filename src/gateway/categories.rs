use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::models::{Category, CategoryStats};

use super::client::Query;
use super::envelope::ResponseShape;
use super::resource::{Resource, RestResource};

impl RestResource for Category {
    const PATH: &'static str = "categories";
    const SHAPE: ResponseShape = ResponseShape::Detect;
}

#[derive(Debug, Deserialize)]
struct CodeCheck {
    #[serde(default)]
    exists: bool,
}

/// Server-side filters of `GET /categories/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryFilter {
    pub nom: Option<String>,
    pub actif: Option<bool>,
    pub date_creation_debut: Option<String>,
    pub date_creation_fin: Option<String>,
}

impl CategoryFilter {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("nom", self.nom.as_deref())
            .with_opt("actif", self.actif)
            .with_opt("dateCreationDebut", self.date_creation_debut.as_deref())
            .with_opt("dateCreationFin", self.date_creation_fin.as_deref())
    }
}

impl Resource<'_, Category> {
    pub async fn active(&self) -> Result<Vec<Category>> {
        self.fetch_list(self.call(Method::GET, "/active")).await
    }

    pub async fn toggle_status(&self, id: i64) -> Result<Category> {
        self.trigger(&id, "toggle-status").await
    }

    /// Whether `code` is already taken, ignoring the category `exclude_id`.
    pub async fn code_exists(&self, code: &str, exclude_id: Option<i64>) -> Result<bool> {
        let query = Query::new()
            .with("code", code)
            .with_opt("excludeId", exclude_id);
        let check: CodeCheck = self
            .fetch(self.call(Method::GET, "/check-code").query(query))
            .await?;
        Ok(check.exists)
    }

    pub async fn statistics(&self) -> Result<CategoryStats> {
        self.fetch(self.call(Method::GET, "/statistics")).await
    }

    pub async fn export(&self, ids: &[i64]) -> Result<Vec<u8>> {
        let body = json!({ "categoryIds": ids });
        self.download(self.call(Method::POST, "/export").json(&body)?)
            .await
    }
}

use reqwest::Method;
use serde_json::json;

use crate::error::{ConsoleError, Result};
use crate::models::{
    Commentaire, Priority, Reclamation, ReclamationStats, ReclamationStatus, ReclamationType,
};

use super::client::Query;
use super::envelope::{PageRequest, PageResponse, ResponseShape};
use super::interventions::ExportFormat;
use super::resource::{Resource, RestResource};

impl RestResource for Reclamation {
    const PATH: &'static str = "reclamations";
    const SHAPE: ResponseShape = ResponseShape::Raw;
    const LIST_PAGED: bool = true;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReclamationFilter {
    pub objet: Option<String>,
    pub statut: Option<ReclamationStatus>,
    pub priorite: Option<Priority>,
    pub type_reclamation: Option<ReclamationType>,
    pub reclamant_email: Option<String>,
    pub technicien_id: Option<i64>,
    pub service_id: Option<i64>,
    pub date_creation_debut: Option<String>,
    pub date_creation_fin: Option<String>,
}

impl ReclamationFilter {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("objet", self.objet.as_deref())
            .with_opt("statut", self.statut)
            .with_opt("priorite", self.priorite)
            .with_opt("typeReclamation", self.type_reclamation)
            .with_opt("reclamantEmail", self.reclamant_email.as_deref())
            .with_opt("technicienId", self.technicien_id)
            .with_opt("serviceId", self.service_id)
            .with_opt("dateCreationDebut", self.date_creation_debut.as_deref())
            .with_opt("dateCreationFin", self.date_creation_fin.as_deref())
    }
}

/// Client satisfaction is a 1 to 5 score.
pub fn check_satisfaction(score: u8) -> Result<u8> {
    if (1..=5).contains(&score) {
        Ok(score)
    } else {
        Err(ConsoleError::InvalidValue {
            field: "satisfaction",
            value: score.to_string(),
            expected: "1, 2, 3, 4, 5".to_string(),
        })
    }
}

impl Resource<'_, Reclamation> {
    pub async fn search_page(
        &self,
        filter: &ReclamationFilter,
        request: &PageRequest,
    ) -> Result<PageResponse<Reclamation>> {
        self.page_at("/search", request, &filter.to_query()).await
    }

    pub async fn search_all(&self, filter: &ReclamationFilter) -> Result<Vec<Reclamation>> {
        self.walk("/search", &filter.to_query()).await
    }

    pub async fn set_status(&self, id: i64, status: ReclamationStatus) -> Result<Reclamation> {
        self.transition(&id, "statut", json!({ "statut": status }))
            .await
    }

    pub async fn assign(&self, id: i64, technicien_id: i64) -> Result<Reclamation> {
        self.transition(&id, "assignation", json!({ "technicienId": technicien_id }))
            .await
    }

    pub async fn resolve(
        &self,
        id: i64,
        resolution: &str,
        cost: Option<f64>,
    ) -> Result<Reclamation> {
        let mut body = json!({ "resolution": resolution });
        if let Some(cost) = cost {
            body["cout"] = json!(cost);
        }
        self.transition(&id, "resolution", body).await
    }

    pub async fn close(&self, id: i64, satisfaction: u8) -> Result<Reclamation> {
        let satisfaction = check_satisfaction(satisfaction)?;
        self.transition(&id, "fermeture", json!({ "satisfactionClient": satisfaction }))
            .await
    }

    /// Discussion thread of a claim, oldest first as the backend sends it.
    pub async fn comments(&self, id: i64) -> Result<Vec<Commentaire>> {
        self.fetch(self.call(Method::GET, &format!("/{id}/commentaires")))
            .await
    }

    pub async fn add_comment(&self, id: i64, text: &str) -> Result<Commentaire> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConsoleError::InvalidInput(
                "comment cannot be empty".to_string(),
            ));
        }
        self.fetch(
            self.call(Method::POST, &format!("/{id}/commentaires"))
                .json(&json!({ "contenu": text }))?,
        )
        .await
    }

    pub async fn stats(&self) -> Result<ReclamationStats> {
        self.fetch(self.call(Method::GET, "/stats")).await
    }

    pub async fn overdue(&self) -> Result<Vec<Reclamation>> {
        self.fetch_list(self.call(Method::GET, "/en-retard")).await
    }

    pub async fn export(
        &self,
        format: ExportFormat,
        filter: &ReclamationFilter,
    ) -> Result<Vec<u8>> {
        let query = Query::new().with("format", format).merge(&filter.to_query());
        self.download(self.call(Method::GET, "/export").query(query))
            .await
    }
}

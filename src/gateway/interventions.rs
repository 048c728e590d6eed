use reqwest::Method;
use serde_json::json;

use crate::enum_display_fromstr;
use crate::error::Result;
use crate::models::{
    Intervention, InterventionStats, InterventionStatus, InterventionType, Priority,
};

use super::client::Query;
use super::envelope::{PageRequest, PageResponse, ResponseShape};
use super::resource::{Resource, RestResource};

impl RestResource for Intervention {
    const PATH: &'static str = "interventions";
    const SHAPE: ResponseShape = ResponseShape::Raw;
    const PAGE_SUFFIX: &'static str = "";
    const LIST_PAGED: bool = true;
}

/// Server-side filters of the intervention search and exports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterventionFilter {
    pub titre: Option<String>,
    pub type_intervention: Option<InterventionType>,
    pub priorite: Option<Priority>,
    pub statut: Option<InterventionStatus>,
    pub technicien_id: Option<i64>,
    pub service_id: Option<i64>,
    pub asset_id: Option<i64>,
    pub date_debut_min: Option<String>,
    pub date_debut_max: Option<String>,
    pub date_echeance_min: Option<String>,
    pub date_echeance_max: Option<String>,
}

impl InterventionFilter {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("titre", self.titre.as_deref())
            .with_opt("typeIntervention", self.type_intervention)
            .with_opt("priorite", self.priorite)
            .with_opt("statut", self.statut)
            .with_opt("technicienId", self.technicien_id)
            .with_opt("serviceId", self.service_id)
            .with_opt("assetId", self.asset_id)
            .with_opt("dateDebutMin", self.date_debut_min.as_deref())
            .with_opt("dateDebutMax", self.date_debut_max.as_deref())
            .with_opt("dateEcheanceMin", self.date_echeance_min.as_deref())
            .with_opt("dateEcheanceMax", self.date_echeance_max.as_deref())
    }
}

/// Export formats offered by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Excel,
    Pdf,
}

enum_display_fromstr!(ExportFormat, "export format", {
    Excel => "excel",
    Pdf => "pdf",
});

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Record an intervention listing can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterventionOwner {
    Technician,
    Asset,
    Service,
}

enum_display_fromstr!(InterventionOwner, "intervention owner", {
    Technician => "technician",
    Asset => "asset",
    Service => "service",
});

/// What a bulk intervention update applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkInterventionUpdate {
    Status(InterventionStatus),
    Assign(i64),
}

impl Resource<'_, Intervention> {
    pub async fn search_page(
        &self,
        filter: &InterventionFilter,
        request: &PageRequest,
    ) -> Result<PageResponse<Intervention>> {
        self.page_at("/search", request, &filter.to_query()).await
    }

    /// Every intervention matching `filter`, across all pages.
    pub async fn search_all(&self, filter: &InterventionFilter) -> Result<Vec<Intervention>> {
        self.walk("/search", &filter.to_query()).await
    }

    pub async fn stats(&self) -> Result<InterventionStats> {
        self.fetch(self.call(Method::GET, "/stats")).await
    }

    pub async fn stats_for_period(&self, start: &str, end: &str) -> Result<InterventionStats> {
        let query = Query::new().with("startDate", start).with("endDate", end);
        self.fetch(self.call(Method::GET, "/stats/period").query(query))
            .await
    }

    pub async fn set_status(&self, id: i64, status: InterventionStatus) -> Result<Intervention> {
        self.transition(&id, "status", json!({ "statut": status }))
            .await
    }

    pub async fn start(&self, id: i64) -> Result<Intervention> {
        self.trigger(&id, "start").await
    }

    pub async fn complete(&self, id: i64, actual_duration: Option<f64>) -> Result<Intervention> {
        let body = match actual_duration {
            Some(duree) => json!({ "dureeReelle": duree }),
            None => json!({}),
        };
        self.transition(&id, "complete", body).await
    }

    pub async fn validate(&self, id: i64) -> Result<Intervention> {
        self.trigger(&id, "validate").await
    }

    pub async fn suspend(&self, id: i64, reason: Option<&str>) -> Result<Intervention> {
        self.transition(&id, "suspend", reason_body(reason)).await
    }

    pub async fn cancel(&self, id: i64, reason: Option<&str>) -> Result<Intervention> {
        self.transition(&id, "cancel", reason_body(reason)).await
    }

    pub async fn assign(&self, id: i64, technicien_id: i64) -> Result<Intervention> {
        self.transition(&id, "assign", json!({ "technicienId": technicien_id }))
            .await
    }

    pub async fn unassign(&self, id: i64) -> Result<Intervention> {
        self.trigger(&id, "unassign").await
    }

    pub async fn overdue(&self) -> Result<Vec<Intervention>> {
        self.fetch_list(self.call(Method::GET, "/overdue")).await
    }

    pub async fn critical(&self) -> Result<Vec<Intervention>> {
        self.fetch_list(self.call(Method::GET, "/critical")).await
    }

    pub async fn upcoming(&self, days: u32) -> Result<Vec<Intervention>> {
        self.fetch_list(
            self.call(Method::GET, "/upcoming")
                .query(Query::new().with("days", days)),
        )
        .await
    }

    /// Interventions of one technician, asset or service, across all pages.
    pub async fn owned_by(&self, owner: InterventionOwner, id: i64) -> Result<Vec<Intervention>> {
        self.walk(&format!("/{owner}/{id}"), &Query::new()).await
    }

    pub async fn export(
        &self,
        format: ExportFormat,
        filter: &InterventionFilter,
    ) -> Result<Vec<u8>> {
        let call = self
            .call(Method::GET, &format!("/export/{}", format.as_str()))
            .query(filter.to_query());
        self.download(call).await
    }

    pub async fn bulk_update(&self, ids: &[i64], update: BulkInterventionUpdate) -> Result<()> {
        let (suffix, body) = match update {
            BulkInterventionUpdate::Status(status) => (
                "/bulk/status",
                json!({ "interventionIds": ids, "statut": status }),
            ),
            BulkInterventionUpdate::Assign(technicien_id) => (
                "/bulk/assign",
                json!({ "interventionIds": ids, "technicienId": technicien_id }),
            ),
        };
        self.acknowledge(self.call(Method::PATCH, suffix).json(&body)?)
            .await
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<()> {
        let body = json!({ "interventionIds": ids });
        self.acknowledge(self.call(Method::DELETE, "/bulk").json(&body)?)
            .await
    }
}

fn reason_body(reason: Option<&str>) -> serde_json::Value {
    match reason {
        Some(reason) => json!({ "reason": reason }),
        None => json!({}),
    }
}

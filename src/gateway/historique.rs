use reqwest::Method;

use crate::error::Result;
use crate::models::{ActionType, ActorRole, HistoriqueEntry, HistoriqueStats};

use super::client::Query;
use super::envelope::ResponseShape;
use super::resource::{Resource, RestResource};

impl RestResource for HistoriqueEntry {
    const PATH: &'static str = "historique";
    const SHAPE: ResponseShape = ResponseShape::Raw;
}

/// Default page size of the history listing.
pub const HISTORY_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoriqueFilter {
    pub reclamation_id: Option<i64>,
    pub utilisateur: Option<String>,
    pub action: Option<ActionType>,
    pub role_utilisateur: Option<ActorRole>,
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
}

impl HistoriqueFilter {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("reclamationId", self.reclamation_id)
            .with_opt("utilisateur", self.utilisateur.as_deref())
            .with_opt("action", self.action)
            .with_opt("roleUtilisateur", self.role_utilisateur)
            .with_opt("dateDebut", self.date_debut.as_deref())
            .with_opt("dateFin", self.date_fin.as_deref())
    }
}

impl Resource<'_, HistoriqueEntry> {
    /// One page of history entries matching `filter` (`page` is zero-based).
    pub async fn filtered(
        &self,
        filter: &HistoriqueFilter,
        page: u32,
        size: u32,
    ) -> Result<Vec<HistoriqueEntry>> {
        let query = filter
            .to_query()
            .with("page", page)
            .with("size", size);
        self.list(&query).await
    }

    pub async fn for_reclamation(&self, reclamation_id: i64) -> Result<Vec<HistoriqueEntry>> {
        self.fetch_list(self.call(Method::GET, &format!("/reclamation/{reclamation_id}")))
            .await
    }

    pub async fn stats(&self, from: Option<&str>, to: Option<&str>) -> Result<HistoriqueStats> {
        let query = Query::new()
            .with_opt("dateDebut", from)
            .with_opt("dateFin", to);
        self.fetch(self.call(Method::GET, "/stats").query(query))
            .await
    }

    pub async fn export(&self, filter: &HistoriqueFilter) -> Result<Vec<u8>> {
        self.download(self.call(Method::GET, "/export").query(filter.to_query()))
            .await
    }
}

use reqwest::Method;
use serde_json::{Value, json};

use crate::error::Result;
use crate::models::{Asset, AssetCategory, AssetStats, AssetStatus};

use super::client::Query;
use super::envelope::ResponseShape;
use super::resource::{Resource, RestResource};

impl RestResource for Asset {
    const PATH: &'static str = "assets";
    const SHAPE: ResponseShape = ResponseShape::Enveloped;
}

/// Server-side filters of the asset listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetFilter {
    pub service_id: Option<i64>,
    pub status: Option<AssetStatus>,
    pub category: Option<AssetCategory>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
}

impl AssetFilter {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("serviceId", self.service_id)
            .with_opt("status", self.status)
            .with_opt("category", self.category)
            .with_opt("search", self.search.as_deref())
            .with_opt("dateFrom", self.date_from.as_deref())
            .with_opt("dateTo", self.date_to.as_deref())
            .with_opt("valueMin", self.value_min)
            .with_opt("valueMax", self.value_max)
    }
}

impl Resource<'_, Asset> {
    pub async fn stats(&self) -> Result<AssetStats> {
        self.fetch(self.call(Method::GET, "/stats")).await
    }

    /// Spreadsheet of the given assets, or of all of them.
    pub async fn export(&self, assets: Option<&[Asset]>) -> Result<Vec<u8>> {
        let body = match assets {
            Some(assets) => json!({ "assets": assets }),
            None => json!({}),
        };
        self.download(self.call(Method::POST, "/export").json(&body)?)
            .await
    }

    pub async fn bulk_status(&self, ids: &[i64], status: AssetStatus) -> Result<Vec<Asset>> {
        let body = json!({ "assetIds": ids, "status": status });
        self.fetch(self.call(Method::PATCH, "/bulk/status").json(&body)?)
            .await
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<()> {
        let body = json!({ "assetIds": ids });
        self.acknowledge(self.call(Method::DELETE, "").json(&body)?)
            .await
    }

    /// Free-text search (`?q=`).
    pub async fn search_text(&self, text: &str) -> Result<Vec<Asset>> {
        self.search(&Query::new().with("q", text)).await
    }

    pub async fn by_service(&self, service_id: i64) -> Result<Vec<Asset>> {
        self.fetch_list(self.call(Method::GET, &format!("/service/{service_id}")))
            .await
    }

    /// Audit trail of one asset. Entries are returned as the backend sends them.
    pub async fn history(&self, id: i64) -> Result<Vec<Value>> {
        self.fetch(self.call(Method::GET, &format!("/{id}/history")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_uses_backend_names() {
        let filter = AssetFilter {
            service_id: Some(3),
            status: Some(AssetStatus::EnPanne),
            value_min: Some(100.0),
            ..Default::default()
        };
        let query = filter.to_query();
        assert_eq!(query.get("serviceId"), Some("3"));
        assert_eq!(query.get("status"), Some("EN_PANNE"));
        assert_eq!(query.get("valueMin"), Some("100"));
        assert!(query.get("category").is_none());
    }
}

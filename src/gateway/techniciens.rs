use reqwest::Method;

use crate::error::Result;
use crate::models::Technicien;

use super::client::Query;
use super::envelope::ResponseShape;
use super::resource::{Resource, RestResource};

impl RestResource for Technicien {
    const PATH: &'static str = "techniciens";
    const SHAPE: ResponseShape = ResponseShape::Raw;
    const PAGE_SUFFIX: &'static str = "";
}

impl Resource<'_, Technicien> {
    /// Technicians currently taking assignments.
    pub async fn active(&self) -> Result<Vec<Technicien>> {
        self.fetch_list(self.call(Method::GET, "/actifs")).await
    }

    pub async fn search_text(&self, text: &str) -> Result<Vec<Technicien>> {
        self.search(&Query::new().with("query", text)).await
    }
}

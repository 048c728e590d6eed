use reqwest::Method;
use serde_json::json;

use crate::error::{ConsoleError, Result};
use crate::models::{Notification, NotificationInput, NotificationStats, NotificationStatus};

use super::client::Query;
use super::envelope::ResponseShape;
use super::resource::{Resource, RestResource};

impl RestResource for Notification {
    const PATH: &'static str = "notifications";
    const SHAPE: ResponseShape = ResponseShape::Raw;
}

impl Resource<'_, Notification> {
    /// One page of the caller's notifications (`page` is zero-based).
    pub async fn list_page(&self, page: u32, size: u32) -> Result<Vec<Notification>> {
        self.list(&Query::new().with("page", page).with("size", size))
            .await
    }

    pub async fn for_user(
        &self,
        user_id: i64,
        status: Option<NotificationStatus>,
    ) -> Result<Vec<Notification>> {
        let call = self
            .call(Method::GET, &format!("/user/{user_id}"))
            .query(Query::new().with_opt("statut", status));
        self.fetch_list(call).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<()> {
        self.patch_empty(&format!("/{id}/lue")).await
    }

    pub async fn mark_all_read(&self, user_id: i64) -> Result<()> {
        self.patch_empty(&format!("/user/{user_id}/toutes-lues"))
            .await
    }

    pub async fn archive(&self, id: i64) -> Result<()> {
        self.patch_empty(&format!("/{id}/archiver")).await
    }

    pub async fn stats(&self, user_id: Option<i64>) -> Result<NotificationStats> {
        let call = self
            .call(Method::GET, "/stats")
            .query(Query::new().with_opt("utilisateurId", user_id));
        self.fetch(call).await
    }

    pub async fn send(&self, notification: &NotificationInput) -> Result<Notification> {
        self.create(notification).await
    }

    /// Push delivery of new notifications. The backend offers no stream yet.
    pub async fn realtime(&self) -> Result<Vec<Notification>> {
        Err(ConsoleError::NotImplemented("real-time notifications"))
    }

    async fn patch_empty(&self, suffix: &str) -> Result<()> {
        self.acknowledge(self.call(Method::PATCH, suffix).json(&json!({}))?)
            .await
    }
}

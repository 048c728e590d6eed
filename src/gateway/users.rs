use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::models::{User, UserRole, UserStats};

use super::client::Query;
use super::envelope::ResponseShape;
use super::resource::{Resource, RestResource};

impl RestResource for User {
    const PATH: &'static str = "users";
    const SHAPE: ResponseShape = ResponseShape::Raw;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemporaryPassword {
    temporary_password: String,
}

impl Resource<'_, User> {
    pub async fn activate(&self, id: &str) -> Result<User> {
        self.trigger(&id.to_string(), "activate").await
    }

    pub async fn deactivate(&self, id: &str) -> Result<User> {
        self.trigger(&id.to_string(), "deactivate").await
    }

    pub async fn change_password(
        &self,
        id: &str,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<()> {
        let body = json!({
            "currentPassword": current.expose_secret(),
            "newPassword": new.expose_secret(),
        });
        self.acknowledge(
            self.call(Method::PATCH, &format!("/{id}/change-password"))
                .json(&body)?,
        )
        .await
    }

    /// Have the backend generate a temporary password for the user.
    pub async fn reset_password(&self, id: &str) -> Result<SecretString> {
        let reset: TemporaryPassword = self
            .fetch(
                self.call(Method::PATCH, &format!("/{id}/reset-password"))
                    .json(&json!({}))?,
            )
            .await?;
        Ok(SecretString::from(reset.temporary_password))
    }

    pub async fn search_text(&self, text: &str) -> Result<Vec<User>> {
        self.search(&Query::new().with("q", text)).await
    }

    pub async fn by_role(&self, role: UserRole) -> Result<Vec<User>> {
        self.fetch_list(self.call(Method::GET, &format!("/by-role/{role}")))
            .await
    }

    pub async fn active(&self) -> Result<Vec<User>> {
        self.fetch_list(self.call(Method::GET, "/active")).await
    }

    pub async fn stats(&self) -> Result<UserStats> {
        self.fetch(self.call(Method::GET, "/stats")).await
    }
}

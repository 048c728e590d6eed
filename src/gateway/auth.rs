//! Authentication endpoints and session installation.
//!
//! Tokens are never refreshed behind the operator's back: `refresh` is an
//! explicit command.

use std::fmt;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::error::{ConsoleError, Result};
use crate::models::UserRole;
use crate::session::SessionUser;

use super::client::{Call, Gateway};
use super::envelope::ResponseShape;

const LABEL: &str = "account";

/// Body of `POST authenticate`, `register` and `refresh-token`.
#[derive(Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default, rename = "access_token", alias = "accessToken")]
    access_token: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub role: Option<String>,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("role", &self.role)
            .finish()
    }
}

impl AuthResponse {
    pub fn has_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

fn expose<S: serde::Serializer>(
    secret: &SecretString,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[derive(Debug, Default, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ValidityResponse {
    #[serde(default)]
    valid: bool,
}

/// Calls under the authentication base URL.
#[derive(Clone, Copy)]
pub struct AuthApi<'g> {
    gateway: &'g Gateway,
}

impl<'g> AuthApi<'g> {
    pub(crate) fn new(gateway: &'g Gateway) -> Self {
        AuthApi { gateway }
    }

    fn call(&self, method: Method, endpoint: &str) -> Call {
        Call::new(method, self.gateway.auth_endpoint(endpoint), LABEL)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, call: Call) -> Result<T> {
        self.gateway.fetch(call, ResponseShape::Raw).await
    }

    /// Exchange credentials for a token and install it in the session.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse> {
        let body = json!({ "email": email, "password": password.expose_secret() });
        let response: AuthResponse = self
            .fetch(self.call(Method::POST, "authenticate").json(&body)?)
            .await
            .map_err(|e| match e {
                ConsoleError::Unauthenticated => ConsoleError::Api {
                    status: 401,
                    message: "invalid email or password".to_string(),
                },
                other => other,
            })?;
        self.install(&response)?;
        info!(email, "logged in");
        Ok(response)
    }

    /// Create an account. A token in the answer logs the new user in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .fetch(self.call(Method::POST, "register").json(request)?)
            .await?;
        if response.has_token() {
            self.install(&response)?;
            info!(email = %request.email, "registered and logged in");
        }
        Ok(response)
    }

    /// Tell the backend, then drop the local session whatever it answered.
    pub async fn logout(&self) -> Result<()> {
        if self.gateway.session().has_token() {
            let call = self.call(Method::POST, "logout").json(&json!({}))?;
            if let Err(e) = self.gateway.acknowledge(call, ResponseShape::Raw).await {
                warn!("backend logout failed: {e}");
            }
        }
        self.gateway.session().clear();
        info!("logged out");
        Ok(())
    }

    pub async fn refresh(&self) -> Result<AuthResponse> {
        let response: AuthResponse = self
            .fetch(self.call(Method::POST, "refresh-token").json(&json!({}))?)
            .await?;
        self.install(&response)?;
        info!("session token refreshed");
        Ok(response)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        let response: MessageResponse = self
            .fetch(
                self.call(Method::POST, "forgot-password")
                    .json(&json!({ "email": email }))?,
            )
            .await?;
        Ok(response.message)
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &SecretString,
    ) -> Result<Option<String>> {
        let body = json!({ "token": token, "newPassword": new_password.expose_secret() });
        let response: MessageResponse = self
            .fetch(self.call(Method::POST, "reset-password").json(&body)?)
            .await?;
        Ok(response.message)
    }

    pub async fn change_password(
        &self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<Option<String>> {
        let body = json!({
            "currentPassword": current.expose_secret(),
            "newPassword": new.expose_secret(),
        });
        let response: MessageResponse = self
            .fetch(self.call(Method::PATCH, "change-password").json(&body)?)
            .await?;
        Ok(response.message)
    }

    pub async fn validate_reset_token(&self, token: &str) -> Result<bool> {
        let response: ValidityResponse = self
            .fetch(
                self.call(Method::POST, "validate-reset-token")
                    .json(&json!({ "token": token }))?,
            )
            .await?;
        Ok(response.valid)
    }

    fn install(&self, response: &AuthResponse) -> Result<()> {
        let token = response
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ConsoleError::ResponseShape("authentication response carried no token".to_string())
            })?;
        let user = response.user.clone().map(|mut user| {
            if user.role.is_none() {
                user.role = response.role.clone();
            }
            user
        });
        self.gateway
            .session()
            .establish(token, response.role.clone(), user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn auth_response(token: &str, role: Option<&str>) -> Value {
        json!({ "access_token": token, "role": role })
    }

    #[test]
    fn test_token_field_aliases() {
        let snake: AuthResponse =
            serde_json::from_value(auth_response("a.b.c", Some("ADMIN"))).unwrap();
        assert!(snake.has_token());
        assert_eq!(snake.role.as_deref(), Some("ADMIN"));

        let camel: AuthResponse =
            serde_json::from_value(json!({"accessToken": "x.y.z"})).unwrap();
        assert!(camel.has_token());

        let none: AuthResponse = serde_json::from_value(json!({"user": null})).unwrap();
        assert!(!none.has_token());
    }

    #[test]
    fn test_debug_redacts_token() {
        let response: AuthResponse =
            serde_json::from_value(auth_response("secret.token.value", None)).unwrap();
        let debug = format!("{response:?}");
        assert!(!debug.contains("secret.token.value"));
    }

    #[test]
    fn test_register_request_serialises_password() {
        let request = RegisterRequest {
            first_name: "Awa".to_string(),
            last_name: "Ndiaye".to_string(),
            email: "awa@gactifs.sn".to_string(),
            password: SecretString::from("hunter22".to_string()),
            role: Some(UserRole::Technicien),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["firstName"], "Awa");
        assert_eq!(value["password"], "hunter22");
        assert_eq!(value["role"], "TECHNICIEN");
    }
}

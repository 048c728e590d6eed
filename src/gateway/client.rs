use std::fmt::Display;
use std::time::Duration;

use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::session::SessionContext;

use super::envelope::ResponseShape;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("gactifs/", env!("CARGO_PKG_VERSION"));

/// Ordered query-string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.push(key, value);
        self
    }

    pub fn with_opt<V: Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Set `key`, replacing any earlier value.
    pub fn push(&mut self, key: &str, value: impl Display) {
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Append all of `other`'s parameters.
    pub fn merge(mut self, other: &Query) -> Self {
        for (key, value) in &other.pairs {
            self.push(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// One request to send.
#[derive(Debug)]
pub(crate) struct Call {
    method: Method,
    url: String,
    query: Query,
    body: Option<Value>,
    /// Resource label used in error messages.
    entity: &'static str,
}

impl Call {
    pub(crate) fn new(method: Method, url: String, entity: &'static str) -> Self {
        Call {
            method,
            url,
            query: Query::new(),
            body: None,
            entity,
        }
    }

    pub(crate) fn query(mut self, query: Query) -> Self {
        self.query = self.query.merge(&query);
        self
    }

    pub(crate) fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// HTTP access to the asset-management backend.
///
/// Every request carries the session's bearer token when one is present.
/// There is no retry and no caching: one call, one response.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: Client,
    base_url: String,
    auth_url: String,
    session: SessionContext,
}

impl Gateway {
    pub fn new(config: &Config, session: SessionContext) -> Result<Self> {
        let base_url = checked_url("api.base_url", config.base_url())?;
        let auth_url = checked_url("api.auth_url", config.auth_url())?;

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout()))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Gateway {
            http,
            base_url,
            auth_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        join(&self.base_url, path)
    }

    pub(crate) fn auth_endpoint(&self, endpoint: &str) -> String {
        join(&self.auth_url, endpoint)
    }

    /// Send a call and turn any non-success status into a [`ConsoleError`].
    pub(crate) async fn send(&self, call: Call) -> Result<Response> {
        debug!(method = %call.method, url = %call.url, "request");

        let mut builder = self.http.request(call.method.clone(), &call.url);
        if !call.query.is_empty() {
            builder = builder.query(call.query.pairs());
        }
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }
        let builder = self.session.with_bearer(move |token| match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        });

        let response = builder.send().await.inspect_err(|e| {
            warn!(method = %call.method, url = %call.url, "request failed: {e}");
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ConsoleError::from_status(
            call.entity,
            status.as_u16(),
            server_message(&body).as_deref(),
        );
        warn!(
            method = %call.method,
            url = %call.url,
            status = status.as_u16(),
            "backend returned an error: {error}"
        );
        Err(error)
    }

    /// Send and decode the payload, unwrapping the envelope per `shape`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        call: Call,
        shape: ResponseShape,
    ) -> Result<T> {
        let entity = call.entity;
        let body = read_json(self.send(call).await?, entity).await?;
        shape.extract(body)
    }

    /// Send and ignore the payload, failing only on a rejected envelope.
    pub(crate) async fn acknowledge(&self, call: Call, shape: ResponseShape) -> Result<()> {
        let entity = call.entity;
        let body = read_json(self.send(call).await?, entity).await?;
        shape.acknowledge(body)
    }

    /// Send and return the raw response bytes (exports).
    pub(crate) async fn download(&self, call: Call) -> Result<Vec<u8>> {
        let response = self.send(call).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

async fn read_json(response: Response, entity: &str) -> Result<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text)
        .map_err(|e| ConsoleError::ResponseShape(format!("{entity} response is not JSON: {e}")))
}

/// The human-readable part of an error body: `message`, then `error`, then
/// the body itself when it is short plain text.
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => ["message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Err(_) if body.len() <= 200 && !body.starts_with('<') => Some(body.to_string()),
        Err(_) => None,
    }
}

fn checked_url(key: &str, url: String) -> Result<String> {
    Url::parse(&url).map_err(|e| ConsoleError::Config(format!("invalid {key} '{url}': {e}")))?;
    Ok(url)
}

fn join(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_query_replaces_duplicate_keys() {
        let query = Query::new()
            .with("page", 0)
            .with("size", 10)
            .with("page", 3)
            .with_opt::<&str>("statut", None);
        assert_eq!(query.get("page"), Some("3"));
        assert_eq!(query.pairs().len(), 2);
        assert!(query.get("statut").is_none());
    }

    #[test]
    fn test_server_message_extraction() {
        assert_eq!(
            server_message(r#"{"message": "Le code existe déjà"}"#).as_deref(),
            Some("Le code existe déjà")
        );
        assert_eq!(
            server_message(r#"{"error": "Bad Request", "status": 400}"#).as_deref(),
            Some("Bad Request")
        );
        assert_eq!(server_message("nom obligatoire").as_deref(), Some("nom obligatoire"));
        assert_eq!(server_message("<html>oops</html>"), None);
        assert_eq!(server_message("  "), None);
        assert_eq!(server_message(r#"{"status": 500}"#), None);
    }

    #[test]
    fn test_join() {
        assert_eq!(join("http://h/api", "assets"), "http://h/api/assets");
        assert_eq!(join("http://h/api", "/assets/3"), "http://h/api/assets/3");
        assert_eq!(join("http://h/api", ""), "http://h/api");
    }

    #[test]
    #[serial]
    fn test_gateway_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        config.api.auth_url = Some("http://localhost/auth".to_string());
        let err = Gateway::new(&config, SessionContext::new()).unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));
    }
}

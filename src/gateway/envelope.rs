//! Response bodies as the backend sends them, and their normalisation.
//!
//! Some endpoints wrap their payload in `{ success, data, message, errors,
//! timestamp }`, others return the payload directly. Both are turned into an
//! [`ApiEnvelope`] at the gateway boundary so callers only ever see `T`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConsoleError, Result};
use crate::view::SortDirection;

use super::client::Query;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Wrap a raw body as a successful envelope.
    pub fn wrap(data: T) -> Self {
        ApiEnvelope {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            timestamp: None,
        }
    }

    pub fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(ConsoleError::Rejected(rejection_message(
                self.message,
                self.errors,
            )));
        }
        self.data
            .ok_or_else(|| ConsoleError::ResponseShape("response carried no data".to_string()))
    }
}

fn rejection_message(message: Option<String>, errors: Option<Value>) -> String {
    let message = message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "no reason given".to_string());
    match errors {
        Some(Value::Array(items)) if !items.is_empty() => {
            let details: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            format!("{message} ({})", details.join("; "))
        }
        _ => message,
    }
}

/// How an endpoint shapes its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Always `{ success, data, ... }`.
    Enveloped,
    /// The payload itself.
    Raw,
    /// Decided per response: an object carrying `success` is an envelope.
    Detect,
}

impl ResponseShape {
    pub fn is_enveloped(self, body: &Value) -> bool {
        match self {
            ResponseShape::Enveloped => true,
            ResponseShape::Raw => false,
            ResponseShape::Detect => body
                .as_object()
                .is_some_and(|map| map.contains_key("success")),
        }
    }

    pub fn normalise<T: DeserializeOwned>(self, body: Value) -> Result<ApiEnvelope<T>> {
        if self.is_enveloped(&body) {
            serde_json::from_value(body)
                .map_err(|e| ConsoleError::ResponseShape(format!("malformed envelope: {e}")))
        } else {
            let data = serde_json::from_value(body)
                .map_err(|e| ConsoleError::ResponseShape(format!("unexpected body: {e}")))?;
            Ok(ApiEnvelope::wrap(data))
        }
    }

    /// Normalise and unwrap in one step.
    pub fn extract<T: DeserializeOwned>(self, body: Value) -> Result<T> {
        self.normalise(body)?.into_data()
    }

    /// For calls whose payload is ignored: only a rejected envelope fails.
    pub fn acknowledge(self, body: Value) -> Result<()> {
        if body.is_null() || !self.is_enveloped(&body) {
            return Ok(());
        }
        let envelope: ApiEnvelope<Value> = self.normalise(body)?;
        if envelope.success {
            Ok(())
        } else {
            Err(ConsoleError::Rejected(rejection_message(
                envelope.message,
                envelope.errors,
            )))
        }
    }
}

/// One page of a server-side paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

impl<T> PageResponse<T> {
    /// No page follows this one.
    pub fn is_final(&self) -> bool {
        self.last || self.empty || self.content.is_empty() || self.number + 1 >= self.total_pages
    }
}

/// A listing body that may be a plain array or a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Items(Vec<T>),
    Page(PageResponse<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Listing::Items(items) => items,
            Listing::Page(page) => page.content,
        }
    }
}

/// Query parameters of a paginated request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Zero-based.
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest {
            page,
            size,
            sort: None,
            direction: SortDirection::Asc,
        }
    }

    pub fn sorted(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(field.into());
        self.direction = direction;
        self
    }

    pub fn to_query(&self) -> Query {
        let query = Query::new()
            .with("page", self.page)
            .with("size", self.size);
        match &self.sort {
            Some(field) => query
                .with("sort", field)
                .with("direction", self.direction),
            None => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enveloped_body_unwraps() {
        let body = json!({"success": true, "data": [1, 2, 3], "message": "ok"});
        let data: Vec<i32> = ResponseShape::Enveloped.extract(body).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_raw_body_is_wrapped() {
        let envelope: ApiEnvelope<Vec<i32>> =
            ResponseShape::Raw.normalise(json!([4, 5])).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(vec![4, 5]));
    }

    #[test]
    fn test_detect_picks_per_response() {
        let wrapped: Vec<String> = ResponseShape::Detect
            .extract(json!({"success": true, "data": ["a"]}))
            .unwrap();
        assert_eq!(wrapped, vec!["a"]);

        let raw: Vec<String> = ResponseShape::Detect.extract(json!(["b"])).unwrap();
        assert_eq!(raw, vec!["b"]);

        // An object without `success` is a raw record.
        let record: Value = ResponseShape::Detect
            .extract(json!({"id": 1, "nom": "Mobilier"}))
            .unwrap();
        assert_eq!(record["nom"], "Mobilier");
    }

    #[test]
    fn test_unsuccessful_envelope_is_rejected() {
        let body = json!({"success": false, "message": "code déjà utilisé", "errors": ["code"]});
        let err = ResponseShape::Enveloped.extract::<Value>(body).unwrap_err();
        assert!(matches!(err, ConsoleError::Rejected(_)));
        assert_eq!(
            err.to_string(),
            "backend rejected the request: code déjà utilisé (code)"
        );
    }

    #[test]
    fn test_envelope_without_data_is_a_shape_error() {
        let err = ResponseShape::Enveloped
            .extract::<Value>(json!({"success": true}))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::ResponseShape(_)));
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Badge {
        code: String,
    }

    fn extract_generic<T: DeserializeOwned>(shape: ResponseShape, body: Value) -> Result<T> {
        shape.extract(body)
    }

    #[test]
    fn test_envelope_of_type_without_default() {
        let badge: Badge = extract_generic(
            ResponseShape::Enveloped,
            json!({"success": true, "data": {"code": "INFO"}}),
        )
        .unwrap();
        assert_eq!(badge.code, "INFO");

        let envelope: ApiEnvelope<Badge> =
            serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(envelope.data, None);

        let err = extract_generic::<Badge>(ResponseShape::Enveloped, json!({"success": true}))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::ResponseShape(_)));
    }

    #[test]
    fn test_acknowledge() {
        assert!(ResponseShape::Enveloped.acknowledge(Value::Null).is_ok());
        assert!(
            ResponseShape::Enveloped
                .acknowledge(json!({"success": true}))
                .is_ok()
        );
        assert!(
            ResponseShape::Enveloped
                .acknowledge(json!({"success": false, "message": "no"}))
                .is_err()
        );
        assert!(ResponseShape::Raw.acknowledge(json!({"anything": 1})).is_ok());
    }

    #[test]
    fn test_page_response_defaults_and_finality() {
        let page: PageResponse<i32> = serde_json::from_value(json!({
            "content": [1, 2],
            "totalElements": 5,
            "totalPages": 3,
            "number": 0
        }))
        .unwrap();
        assert!(!page.is_final());
        assert_eq!(page.total_elements, 5);

        let last: PageResponse<i32> =
            serde_json::from_value(json!({"content": [5], "totalPages": 3, "number": 2})).unwrap();
        assert!(last.is_final());
    }

    #[test]
    fn test_listing_accepts_array_or_page() {
        let items: Listing<i32> = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(items.into_items(), vec![1, 2]);
        let page: Listing<i32> = serde_json::from_value(json!({"content": [3]})).unwrap();
        assert_eq!(page.into_items(), vec![3]);
    }

    #[test]
    fn test_page_request_query() {
        let plain = PageRequest::new(2, 20).to_query();
        assert_eq!(
            plain.pairs(),
            &[("page".to_string(), "2".to_string()), ("size".to_string(), "20".to_string())]
        );
        let sorted = PageRequest::new(0, 10)
            .sorted("dateCreation", SortDirection::Desc)
            .to_query();
        assert_eq!(sorted.get("sort"), Some("dateCreation"));
        assert_eq!(sorted.get("direction"), Some("desc"));
    }
}

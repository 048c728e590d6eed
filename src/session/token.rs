//! Client-side reading of bearer token claims.
//!
//! The payload segment is base64url-decoded and parsed as JSON. The signature
//! is never checked; the backend remains the authority on validity.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jiff::Timestamp;
use serde_json::Value;

use crate::error::{ConsoleError, Result};

/// Claims the console cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: Option<String>,
    pub expires_at: Option<i64>,
    pub role: Option<String>,
}

impl TokenClaims {
    pub fn expiry(&self) -> Option<Timestamp> {
        self.expires_at
            .and_then(|secs| Timestamp::from_second(secs).ok())
    }

    /// A token without `exp` is treated as expired.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiry().is_none_or(|exp| exp <= now)
    }
}

pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ConsoleError::InvalidToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ConsoleError::InvalidToken(format!("payload is not base64url: {e}")))?;
    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ConsoleError::InvalidToken(format!("payload is not JSON: {e}")))?;

    Ok(TokenClaims {
        subject: claims.get("sub").and_then(Value::as_str).map(str::to_string),
        expires_at: claims.get("exp").and_then(|v| {
            v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
        }),
        role: ["role", "roles", "authorities"]
            .iter()
            .find_map(|key| claims.get(*key).and_then(role_from)),
    })
}

/// Pull a role name out of a string, an array of strings, or an array of
/// `{ "authority": ... }` objects. A `ROLE_` prefix is dropped.
fn role_from(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("authority").and_then(Value::as_str),
            _ => None,
        }),
        _ => None,
    }?;
    let role = raw.strip_prefix("ROLE_").unwrap_or(raw);
    (!role.is_empty()).then(|| role.to_string())
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_role_and_expiry() {
        let token = encode_test_token(&json!({"sub": "admin@gactifs.sn", "role": "ADMIN", "exp": 1_900_000_000}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("admin@gactifs.sn"));
        assert_eq!(claims.role.as_deref(), Some("ADMIN"));
        assert_eq!(claims.expires_at, Some(1_900_000_000));
        assert!(!claims.is_expired(Timestamp::from_second(1_800_000_000).unwrap()));
        assert!(claims.is_expired(Timestamp::from_second(1_900_000_000).unwrap()));
    }

    #[test]
    fn test_role_from_authorities() {
        let token = encode_test_token(&json!({
            "authorities": [{"authority": "ROLE_TECHNICIEN"}],
            "exp": 10
        }));
        assert_eq!(decode_claims(&token).unwrap().role.as_deref(), Some("TECHNICIEN"));

        let token = encode_test_token(&json!({"roles": ["ROLE_RESPONSABLE"]}));
        assert_eq!(decode_claims(&token).unwrap().role.as_deref(), Some("RESPONSABLE"));
    }

    #[test]
    fn test_missing_exp_counts_as_expired() {
        let token = encode_test_token(&json!({"sub": "x"}));
        let claims = decode_claims(&token).unwrap();
        assert!(claims.is_expired(Timestamp::UNIX_EPOCH));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(decode_claims("not-a-token").is_err());
        assert!(decode_claims("a.b.c.d").is_err());
        assert!(decode_claims("a.%%%.c").is_err());
        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("plain"));
        assert!(decode_claims(&not_json).is_err());
    }
}

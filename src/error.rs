use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid {field} '{value}', expected one of: {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("cannot sort {entity} by '{field}', expected one of: {expected}")]
    InvalidSortField {
        entity: &'static str,
        field: String,
        expected: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("session expired or invalid, run `gactifs login`")]
    Unauthenticated,

    #[error("malformed session token: {0}")]
    InvalidToken(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl ConsoleError {
    /// Map a non-success HTTP status to the message shown to the operator.
    ///
    /// `entity` is the resource label used in not-found / conflict messages and
    /// `server_message` is whatever human-readable text the backend returned.
    pub fn from_status(entity: &str, status: u16, server_message: Option<&str>) -> Self {
        let server_message = server_message.map(str::trim).filter(|m| !m.is_empty());
        let message = match status {
            401 => return ConsoleError::Unauthenticated,
            400 => server_message.unwrap_or("invalid data").to_string(),
            403 => "access denied".to_string(),
            404 => format!("{entity} not found"),
            409 => format!("{entity} already exists"),
            422 => format!("{entity} is still referenced by other records"),
            500 => "internal server error".to_string(),
            other => format!(
                "error {other}: {}",
                server_message.unwrap_or("unknown error")
            ),
        };
        ConsoleError::Api { status, message }
    }

    /// HTTP status carried by this error, when it came from a backend response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::Api { status, .. } => Some(*status),
            ConsoleError::Unauthenticated => Some(401),
            ConsoleError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

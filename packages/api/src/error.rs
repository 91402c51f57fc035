//! Errors returned by the identity service and its row store.

use serde::Deserialize;

/// PostgREST: a single-object request matched zero rows.
pub const NO_ROWS: &str = "PGRST116";
/// PostgreSQL `undefined_table`.
pub const UNDEFINED_TABLE: &str = "42P01";
/// PostgREST: the table is missing from its schema cache.
pub const SCHEMA_CACHE_MISS: &str = "PGRST205";

/// Failure talking to the identity service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdentityError {
    /// The service answered with an error body.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("identity service unreachable: {0}")]
    Transport(String),
    #[error("unexpected response from identity service: {0}")]
    Decode(String),
    #[error("no active session")]
    NoSession,
}

impl IdentityError {
    pub fn api(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// The service-specific error code, when the service sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an error answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service refused the request itself (4xx), as opposed to failing.
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// The lookup matched no row.
    pub fn is_no_rows(&self) -> bool {
        self.code() == Some(NO_ROWS)
    }

    /// The backing table has not been provisioned.
    pub fn is_undefined_table(&self) -> bool {
        matches!(self.code(), Some(UNDEFINED_TABLE) | Some(SCHEMA_CACHE_MISS))
    }

    /// Build an error from a non-success response body.
    ///
    /// Understands both GoTrue (`error_code`, `msg`, `error_description`) and
    /// PostgREST (`code`, `message`) bodies; anything else keeps the status only.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let code = parsed
            .error_code
            .or_else(|| match parsed.code {
                Some(serde_json::Value::String(code)) => Some(code),
                _ => None,
            })
            .or(parsed.error);

        let message = parsed
            .msg
            .or(parsed.message)
            .or(parsed.error_description)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));

        Self::Api {
            status,
            code,
            message,
        }
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    // GoTrue sends the HTTP status here as a number, PostgREST a string code.
    code: Option<serde_json::Value>,
    error_code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

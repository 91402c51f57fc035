//! Session issued by the identity service.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated session as returned by the token and signup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds, as reported at issue time.
    #[serde(default)]
    pub expires_in: i64,
    /// Absolute expiry as a unix timestamp.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the service left it out.
    pub fn stamped(mut self, now: i64) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now + self.expires_in);
        }
        self
    }

    /// Whether the access token expires within `margin_secs` of `now`.
    ///
    /// Sessions without a known expiry never count as expiring.
    pub fn expires_within(&self, margin_secs: i64, now: i64) -> bool {
        self.expires_at
            .map(|at| at - now <= margin_secs)
            .unwrap_or(false)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_within(0, now)
    }
}

/// The identity attached to a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl SessionUser {
    /// Name supplied at sign-up; an empty string counts as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

/// Free-form metadata stored with the identity; only `name` is read here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

//! # User model for authenticated users
//!
//! Defines the representations of a Quiet Hours user:
//!
//! ## [`Profile`]
//!
//! The row stored in the hosted `profiles` table, one per user, keyed by the
//! identity id. [`NewProfile`] is the payload used to create it lazily the first
//! time a session for that user is seen.
//!
//! ## [`User`]
//!
//! The local projection the UI renders. It comes either from a [`Profile`]
//! (`UserSource::Profile`) or, when the `profiles` table has not been provisioned,
//! from the session alone (`UserSource::Transient`). A transient user is never
//! written anywhere; its timestamps are the moment it was built.
//! The helper [`User::display_name`] returns the user's name or falls back to their
//! email address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::SessionUser;

/// Row from the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a missing profile.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl NewProfile {
    /// Build from the session identity. `None` when the identity carries no email.
    pub fn from_session(user: &SessionUser) -> Option<Self> {
        Some(Self {
            id: user.id,
            email: user.email.clone()?,
            name: user.display_name().map(str::to_string),
        })
    }
}

/// Where a [`User`] was resolved from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSource {
    #[default]
    Profile,
    /// Built from session fields because the profile table is missing.
    Transient,
}

/// The signed-in user as seen by the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub source: UserSource,
}

impl User {
    /// A user that exists only in memory, stamped with `now`.
    pub fn transient(user: &SessionUser, now: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            id: user.id,
            email: user.email.clone()?,
            name: user.display_name().map(str::to_string),
            created_at: now,
            updated_at: now,
            source: UserSource::Transient,
        })
    }

    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    pub fn is_transient(&self) -> bool {
        self.source == UserSource::Transient
    }
}

impl From<Profile> for User {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            name: profile.name.filter(|n| !n.is_empty()),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
            source: UserSource::Profile,
        }
    }
}

//! # Identity client seam
//!
//! Everything the rest of the workspace needs from the hosted identity service,
//! expressed as two async traits so the session synchronizer can be driven by the
//! real [`SupabaseClient`](crate::SupabaseClient) or by a scripted double in tests.
//!
//! - [`IdentityClient`]: sessions and the four account actions, plus a
//!   notification stream of [`AuthChange`]s.
//! - [`ProfileStore`]: lookup and insert against the `profiles` table.
//!
//! Futures returned by these traits are not required to be `Send`; the whole
//! front-end runs on the single-threaded browser event loop.

mod listeners;

pub use listeners::{AuthListeners, Subscription};

use uuid::Uuid;

use crate::error::IdentityError;
use crate::models::{NewProfile, Profile, Session};

/// Why the session changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

/// A session-change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

impl AuthChange {
    pub fn new(event: AuthEvent, session: Option<Session>) -> Self {
        Self { event, session }
    }
}

/// Authentication surface of the identity service.
pub trait IdentityClient {
    /// The current session, refreshed first if it has already expired.
    async fn get_session(&self) -> Result<Option<Session>, IdentityError>;

    /// Register for session-change notifications until the returned
    /// [`Subscription`] is dropped.
    fn on_auth_state_change(&self) -> Subscription;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError>;

    /// Create an account. Returns `None` when the service requires email
    /// confirmation before issuing a session.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Option<Session>, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;

    async fn reset_password_for_email(&self, email: &str) -> Result<(), IdentityError>;
}

/// Row-store surface for the `profiles` table.
pub trait ProfileStore {
    /// Fetch exactly one profile. Zero rows is an error carrying
    /// [`NO_ROWS`](crate::error::NO_ROWS).
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Profile, IdentityError>;

    /// Insert a profile, returning the stored row when the service sends it back.
    async fn insert_profile(&self, profile: &NewProfile) -> Result<Option<Profile>, IdentityError>;
}

//! # Session synchronizer
//!
//! Keeps an [`AuthState`] in step with the identity service. [`SessionSynchronizer::run`]
//! subscribes to session-change notifications, publishes the state for the current
//! session, then re-publishes after every notification until the future is dropped.
//!
//! ## Reconciliation
//!
//! Each session is mapped to a [`User`] through the `profiles` table:
//!
//! 1. fetch the profile by user id;
//! 2. on "no row" insert one built from the session and use the stored row;
//! 3. on "table does not exist" (lookup or insert) build a transient user from the
//!    session, if the [`SchemaPolicy`] allows it;
//! 4. anything else, including a missing representation after insert, signs out.
//!
//! Reconciliation never fails outward: every error ends in a published state.
//!
//! ## Ordering
//!
//! Notifications are handled one at a time and a backlog is collapsed to its newest
//! entry, so an older session can never overwrite a newer one. Dropping the `run`
//! future drops the subscription along with any reconciliation in flight, so
//! nothing is published after teardown.

use chrono::Utc;

use crate::config::SchemaPolicy;
use crate::error::IdentityError;
use crate::identity::{IdentityClient, ProfileStore};
use crate::models::{NewProfile, Session, User};

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Settled view of an [`AuthState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthStatus<'a> {
    Loading,
    Authenticated(&'a User),
    Unauthenticated,
}

impl AuthState {
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn status(&self) -> AuthStatus<'_> {
        match (&self.user, self.loading) {
            (_, true) => AuthStatus::Loading,
            (Some(user), false) => AuthStatus::Authenticated(user),
            (None, false) => AuthStatus::Unauthenticated,
        }
    }
}

/// Drives [`AuthState`] from an identity client.
#[derive(Debug, Clone)]
pub struct SessionSynchronizer<C> {
    client: C,
    policy: SchemaPolicy,
}

impl<C> SessionSynchronizer<C>
where
    C: IdentityClient + ProfileStore,
{
    pub fn new(client: C) -> Self {
        Self {
            client,
            policy: SchemaPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SchemaPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Publish the state for the current session, then for every session change,
    /// until the returned future is dropped or the client goes away.
    pub async fn run(&self, mut publish: impl FnMut(AuthState)) {
        // Subscribe first so a change racing the initial fetch is not lost.
        let mut subscription = self.client.on_auth_state_change();

        let session = match self.client.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "Error getting session");
                None
            }
        };
        publish(self.reconcile(session.as_ref()).await);

        while let Some(change) = subscription.recv_latest().await {
            tracing::debug!(event = ?change.event, "auth state change");
            publish(self.reconcile(change.session.as_ref()).await);
        }
    }

    /// Map a session to the state the UI should show. Never fails.
    pub async fn reconcile(&self, session: Option<&Session>) -> AuthState {
        let Some(session) = session else {
            return AuthState::signed_out();
        };

        match self.resolve_user(session).await {
            Ok(Some(user)) => AuthState::signed_in(user),
            Ok(None) => AuthState::signed_out(),
            Err(e) => {
                tracing::error!(
                    user_id = %session.user.id,
                    code = e.code().unwrap_or("-"),
                    error = %e,
                    "Error updating user state"
                );
                AuthState::signed_out()
            }
        }
    }

    async fn resolve_user(&self, session: &Session) -> Result<Option<User>, IdentityError> {
        let identity = &session.user;

        let profile = match self.client.fetch_profile(identity.id).await {
            Ok(profile) => Some(profile),
            Err(e) if e.is_no_rows() => {
                let Some(new_profile) = NewProfile::from_session(identity) else {
                    tracing::warn!(user_id = %identity.id, "session has no email; cannot create profile");
                    return Ok(None);
                };
                match self.client.insert_profile(&new_profile).await {
                    Ok(profile) => {
                        tracing::info!(user_id = %identity.id, "created profile");
                        profile
                    }
                    Err(e) if e.is_undefined_table() => return self.transient_user(session, e),
                    Err(e) => return Err(e),
                }
            }
            Err(e) if e.is_undefined_table() => return self.transient_user(session, e),
            Err(e) => return Err(e),
        };

        Ok(profile.map(User::from))
    }

    fn transient_user(
        &self,
        session: &Session,
        cause: IdentityError,
    ) -> Result<Option<User>, IdentityError> {
        if !self.policy.allows_transient() {
            return Err(cause);
        }
        tracing::warn!(
            user_id = %session.user.id,
            error = %cause,
            "profiles table missing; using a transient user"
        );
        Ok(User::transient(&session.user, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NO_ROWS, UNDEFINED_TABLE};
    use crate::identity::{AuthChange, AuthEvent};
    use crate::mock::{profile_for, session_for, MockIdentity};
    use futures::FutureExt;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn missing_row() -> IdentityError {
        IdentityError::api(406, Some(NO_ROWS), "JSON object requested, multiple (or no) rows returned")
    }

    fn missing_table() -> IdentityError {
        IdentityError::api(404, Some(UNDEFINED_TABLE), "relation \"public.profiles\" does not exist")
    }

    #[tokio::test]
    async fn test_no_session_is_signed_out() {
        let sync = SessionSynchronizer::new(MockIdentity::new());
        assert_eq!(sync.reconcile(None).await, AuthState::signed_out());
    }

    #[tokio::test]
    async fn test_existing_profile() {
        let session = session_for("ada@example.com", Some("Ada"));
        let mock = MockIdentity::new().with_profile(Ok(profile_for(&session)));
        let sync = SessionSynchronizer::new(mock.clone());

        let state = sync.reconcile(Some(&session)).await;
        let user = state.user.expect("signed in");
        assert!(!state.loading);
        assert_eq!(user.id, session.user.id);
        assert_eq!(user.email, "ada@example.com");
        assert!(!user.is_transient());
        assert!(mock.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_missing_profile_is_created() {
        let session = session_for("new@example.com", Some("Newcomer"));
        let stored = profile_for(&session);
        let mock = MockIdentity::new()
            .with_profile(Err(missing_row()))
            .with_insert(Ok(Some(stored.clone())));
        let sync = SessionSynchronizer::new(mock.clone());

        let state = sync.reconcile(Some(&session)).await;
        let user = state.user.expect("signed in");
        assert_eq!(user.created_at, stored.created_at);
        assert_eq!(user.name.as_deref(), Some("Newcomer"));

        let inserted = mock.inserted();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].id, session.user.id);
        assert_eq!(inserted[0].email, "new@example.com");
        assert_eq!(inserted[0].name.as_deref(), Some("Newcomer"));
    }

    #[tokio::test]
    async fn test_missing_table_on_lookup_gives_transient_user() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new().with_profile(Err(missing_table()));
        let sync = SessionSynchronizer::new(mock.clone());

        let before = Utc::now();
        let state = sync.reconcile(Some(&session)).await;
        let after = Utc::now();

        let user = state.user.expect("transient user");
        assert!(user.is_transient());
        assert_eq!(user.id, session.user.id);
        assert_eq!(user.email, "ada@example.com");
        assert!(user.created_at >= before && user.created_at <= after);
        assert_eq!(user.created_at, user.updated_at);
        assert!(mock.inserted().is_empty());
    }

    #[tokio::test]
    async fn test_missing_table_on_insert_gives_transient_user() {
        let session = session_for("ada@example.com", Some("Ada"));
        let mock = MockIdentity::new()
            .with_profile(Err(missing_row()))
            .with_insert(Err(missing_table()));
        let sync = SessionSynchronizer::new(mock);

        let user = sync.reconcile(Some(&session)).await.user.expect("transient user");
        assert!(user.is_transient());
        assert_eq!(user.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_fail_closed_policy_rejects_transient_user() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new().with_profile(Err(missing_table()));
        let sync = SessionSynchronizer::new(mock).with_policy(SchemaPolicy::FailClosed);

        assert_eq!(sync.reconcile(Some(&session)).await, AuthState::signed_out());
    }

    #[tokio::test]
    async fn test_other_lookup_failure_signs_out() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new()
            .with_profile(Err(IdentityError::api(401, Some("PGRST301"), "JWT expired")));
        let sync = SessionSynchronizer::new(mock);

        assert_eq!(sync.reconcile(Some(&session)).await, AuthState::signed_out());
    }

    #[tokio::test]
    async fn test_other_insert_failure_signs_out() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new()
            .with_profile(Err(missing_row()))
            .with_insert(Err(IdentityError::Transport("connection reset".to_string())));
        let sync = SessionSynchronizer::new(mock);

        assert_eq!(sync.reconcile(Some(&session)).await, AuthState::signed_out());
    }

    #[tokio::test]
    async fn test_insert_without_representation_signs_out() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new()
            .with_profile(Err(missing_row()))
            .with_insert(Ok(None));
        let sync = SessionSynchronizer::new(mock);

        assert_eq!(sync.reconcile(Some(&session)).await, AuthState::signed_out());
    }

    #[tokio::test]
    async fn test_session_without_email_signs_out() {
        let mut session = session_for("ada@example.com", None);
        session.user.email = None;
        let mock = MockIdentity::new().with_profile(Err(missing_row()));
        let sync = SessionSynchronizer::new(mock.clone());

        assert_eq!(sync.reconcile(Some(&session)).await, AuthState::signed_out());
        assert!(mock.inserted().is_empty());
    }

    #[test]
    fn test_status() {
        assert_eq!(AuthState::default().status(), AuthStatus::Loading);
        assert_eq!(AuthState::signed_out().status(), AuthStatus::Unauthenticated);
    }

    fn recorder() -> (Rc<RefCell<Vec<AuthState>>>, impl FnMut(AuthState)) {
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = states.clone();
        (states, move |state| sink.borrow_mut().push(state))
    }

    #[test]
    fn test_run_publishes_initial_then_changes() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new().with_profile(Ok(profile_for(&session)));
        let sync = SessionSynchronizer::new(mock.clone());
        let (states, publish) = recorder();

        let mut run = Box::pin(sync.run(publish));
        assert!(run.as_mut().now_or_never().is_none());
        assert_eq!(*states.borrow(), vec![AuthState::signed_out()]);
        assert_eq!(mock.listener_count(), 1);

        mock.emit(AuthChange::new(AuthEvent::SignedIn, Some(session.clone())));
        assert!(run.as_mut().now_or_never().is_none());
        let last = states.borrow().last().cloned().unwrap();
        assert_eq!(last.user.map(|u| u.id), Some(session.user.id));

        mock.emit(AuthChange::new(AuthEvent::SignedOut, None));
        assert!(run.as_mut().now_or_never().is_none());
        assert_eq!(states.borrow().last(), Some(&AuthState::signed_out()));
        assert_eq!(states.borrow().len(), 3);
    }

    #[test]
    fn test_run_restores_existing_session() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new()
            .with_session(Some(session.clone()))
            .with_profile(Ok(profile_for(&session)));
        let sync = SessionSynchronizer::new(mock);
        let (states, publish) = recorder();

        let mut run = Box::pin(sync.run(publish));
        assert!(run.as_mut().now_or_never().is_none());
        assert_eq!(states.borrow().len(), 1);
        assert!(states.borrow()[0].user.is_some());
    }

    #[test]
    fn test_run_treats_session_error_as_signed_out() {
        let mock = MockIdentity::new()
            .with_session_error(IdentityError::Transport("offline".to_string()));
        let sync = SessionSynchronizer::new(mock);
        let (states, publish) = recorder();

        let mut run = Box::pin(sync.run(publish));
        assert!(run.as_mut().now_or_never().is_none());
        assert_eq!(*states.borrow(), vec![AuthState::signed_out()]);
    }

    #[test]
    fn test_run_coalesces_backlog() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new().with_profile(Ok(profile_for(&session)));
        let sync = SessionSynchronizer::new(mock.clone());
        let (states, publish) = recorder();

        let mut run = Box::pin(sync.run(publish));
        assert!(run.as_mut().now_or_never().is_none());

        mock.emit(AuthChange::new(AuthEvent::SignedIn, Some(session.clone())));
        mock.emit(AuthChange::new(AuthEvent::TokenRefreshed, Some(session.clone())));
        mock.emit(AuthChange::new(AuthEvent::SignedOut, None));
        assert!(run.as_mut().now_or_never().is_none());

        assert_eq!(
            *states.borrow(),
            vec![AuthState::signed_out(), AuthState::signed_out()]
        );
        assert_eq!(mock.profile_lookups(), 0);
    }

    #[test]
    fn test_no_update_after_teardown() {
        let session = session_for("ada@example.com", None);
        let mock = MockIdentity::new().with_profile(Ok(profile_for(&session)));
        let sync = SessionSynchronizer::new(mock.clone());
        let (states, publish) = recorder();

        let mut run = Box::pin(sync.run(publish));
        assert!(run.as_mut().now_or_never().is_none());
        assert_eq!(states.borrow().len(), 1);

        drop(run);
        assert_eq!(mock.listener_count(), 0);

        mock.emit(AuthChange::new(AuthEvent::SignedIn, Some(session)));
        assert_eq!(states.borrow().len(), 1);
        assert_eq!(mock.profile_lookups(), 0);
    }
}

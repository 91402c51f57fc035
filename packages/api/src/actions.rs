//! Account actions exposed to the UI.
//!
//! Every action delegates to the identity client and reports either success or an
//! [`ActionError`] carrying a message fit for display. Service errors keep their
//! message; transport and decoding failures collapse to a generic one.

use crate::error::IdentityError;
use crate::identity::IdentityClient;

const UNEXPECTED: &str = "An unexpected error occurred";

/// A failed account action, already phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ActionError(pub String);

impl ActionError {
    pub fn unexpected() -> Self {
        Self(UNEXPECTED.to_string())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<IdentityError> for ActionError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Api { message, .. } => Self(message),
            IdentityError::NoSession => Self(err.to_string()),
            IdentityError::Transport(_) | IdentityError::Decode(_) => Self::unexpected(),
        }
    }
}

/// How a successful sign-up ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The service issued a session right away.
    SignedIn,
    /// The account exists but the email address must be confirmed first.
    ConfirmationRequired,
}

/// Sign-in, sign-up, sign-out and password reset over an identity client.
#[derive(Debug, Clone)]
pub struct AuthActions<C> {
    client: C,
}

impl<C: IdentityClient> AuthActions<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ActionError> {
        let email = email.trim();
        match self.client.sign_in_with_password(email, password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "signed in");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign in failed");
                Err(e.into())
            }
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<SignUpOutcome, ActionError> {
        let email = email.trim();
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        match self.client.sign_up(email, password, name).await {
            Ok(Some(session)) => {
                tracing::info!(user_id = %session.user.id, "signed up");
                Ok(SignUpOutcome::SignedIn)
            }
            Ok(None) => {
                tracing::info!("signed up; awaiting email confirmation");
                Ok(SignUpOutcome::ConfirmationRequired)
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign up failed");
                Err(e.into())
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), ActionError> {
        self.client.sign_out().await.map_err(|e| {
            tracing::error!(error = %e, "Error signing out");
            e.into()
        })
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), ActionError> {
        self.client
            .reset_password_for_email(email.trim())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "password reset failed");
                e.into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockIdentity;

    #[tokio::test]
    async fn test_sign_in_trims_email() {
        let mock = MockIdentity::new();
        let actions = AuthActions::new(mock.clone());

        assert_eq!(actions.sign_in("  ada@example.com ", "hunter22").await, Ok(()));
        assert_eq!(mock.calls(), vec!["sign_in:ada@example.com,hunter22"]);
    }

    #[tokio::test]
    async fn test_service_message_is_kept() {
        let mock = MockIdentity::new().with_action(Err(IdentityError::api(
            400,
            Some("invalid_credentials"),
            "Invalid login credentials",
        )));
        let actions = AuthActions::new(mock);

        let err = actions.sign_in("ada@example.com", "nope").await.unwrap_err();
        assert_eq!(err.message(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic() {
        let mock = MockIdentity::new()
            .with_action(Err(IdentityError::Transport("dns error".to_string())));
        let actions = AuthActions::new(mock);

        let err = actions.reset_password("ada@example.com").await.unwrap_err();
        assert_eq!(err, ActionError::unexpected());
        assert_eq!(err.to_string(), "An unexpected error occurred");
    }

    #[tokio::test]
    async fn test_sign_up_drops_blank_name() {
        let mock = MockIdentity::new();
        let actions = AuthActions::new(mock.clone());

        assert_eq!(
            actions.sign_up("new@example.com", "secret1", Some("  ")).await,
            Ok(SignUpOutcome::ConfirmationRequired)
        );
        assert_eq!(mock.calls(), vec!["sign_up:new@example.com,secret1,"]);
    }

    #[tokio::test]
    async fn test_sign_up_with_immediate_session() {
        let mock = MockIdentity::new().with_signup_session();
        let actions = AuthActions::new(mock.clone());
        assert_eq!(
            actions.sign_up("new@example.com", "secret1", Some("Newcomer")).await,
            Ok(SignUpOutcome::SignedIn)
        );
        assert_eq!(mock.calls(), vec!["sign_up:new@example.com,secret1,Newcomer"]);
    }

    #[tokio::test]
    async fn test_sign_out_reports_failure() {
        let mock = MockIdentity::new()
            .with_action(Err(IdentityError::Decode("eof".to_string())));
        let actions = AuthActions::new(mock.clone());

        assert_eq!(actions.sign_out().await, Err(ActionError::unexpected()));
        assert_eq!(mock.calls(), vec!["sign_out:"]);
    }
}

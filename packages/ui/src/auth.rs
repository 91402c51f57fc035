//! Authentication context and hooks for the UI.

use std::time::Duration;

use api::{ActionError, AuthActions, AuthState, SessionSynchronizer, SignUpOutcome, SupabaseClient, User};
use dioxus::prelude::*;

/// How often the provider checks whether the access token needs refreshing.
const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Handle to the app's authentication state and actions.
///
/// Created once by [`AuthProvider`] and shared through context; cheap to clone.
#[derive(Clone, PartialEq)]
pub struct AuthContext {
    state: Signal<AuthState>,
    client: SupabaseClient,
}

impl AuthContext {
    /// Current state. Reading it subscribes the calling component to changes.
    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn actions(&self) -> AuthActions<SupabaseClient> {
        AuthActions::new(self.client.clone())
    }

    pub async fn sign_in(&self, email: String, password: String) -> Result<(), ActionError> {
        self.actions().sign_in(&email, &password).await
    }

    pub async fn sign_up(
        &self,
        email: String,
        password: String,
        name: Option<String>,
    ) -> Result<SignUpOutcome, ActionError> {
        self.actions()
            .sign_up(&email, &password, name.as_deref())
            .await
    }

    pub async fn sign_out(&self) -> Result<(), ActionError> {
        self.actions().sign_out().await
    }

    pub async fn reset_password(&self, email: String) -> Result<(), ActionError> {
        self.actions().reset_password(&email).await
    }
}

/// Result of looking up the auth context.
#[derive(Clone, PartialEq)]
pub enum AuthHandle {
    /// No [`AuthProvider`] above this component.
    NotInitialized,
    Ready(AuthContext),
}

impl AuthHandle {
    pub fn context(&self) -> Option<&AuthContext> {
        match self {
            Self::Ready(ctx) => Some(ctx),
            Self::NotInitialized => None,
        }
    }

    /// Current state, or `None` when not initialized.
    pub fn state(&self) -> Option<AuthState> {
        self.context().map(AuthContext::state)
    }
}

/// Get the authentication handle.
/// The state inside updates when the user logs in or out.
pub fn use_auth() -> AuthHandle {
    match try_use_context::<AuthContext>() {
        Some(ctx) => AuthHandle::Ready(ctx),
        None => AuthHandle::NotInitialized,
    }
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(client: SupabaseClient, children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);

    // Keep the state in step with the session for as long as we are mounted.
    let sync_client = client.clone();
    use_future(move || {
        let synchronizer = SessionSynchronizer::new(sync_client.clone())
            .with_policy(sync_client.config().schema_policy);
        async move {
            synchronizer.run(move |state| auth_state.set(state)).await;
        }
    });

    // Refresh the access token before it lapses.
    let refresh_client = client.clone();
    use_future(move || {
        let client = refresh_client.clone();
        async move {
            loop {
                sleep(REFRESH_CHECK_INTERVAL).await;
                if let Err(e) = client.refresh_if_expiring().await {
                    tracing::warn!("Session refresh failed: {}", e);
                }
            }
        }
    });

    use_context_provider(|| AuthContext {
        state: auth_state,
        client,
    });

    rsx! {
        {children}
    }
}

async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Button to sign the current user out.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign Out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    on_done: EventHandler<Result<(), ActionError>>,
) -> Element {
    let auth = use_auth();
    let mut pending = use_signal(|| false);

    let onclick = move |_| {
        let auth = auth.clone();
        async move {
            let Some(ctx) = auth.context() else {
                return;
            };
            pending.set(true);
            let result = ctx.sign_out().await;
            pending.set(false);
            on_done.call(result);
        }
    };

    rsx! {
        button {
            class: "btn btn-outline {class}",
            disabled: pending(),
            onclick: onclick,
            if pending() {
                "Signing out..."
            } else {
                "{label}"
            }
        }
    }
}

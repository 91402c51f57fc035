//! Route guard for pages that need a signed-in user.

use api::{AuthState, AuthStatus};
use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::loading::LoadingScreen;

/// What a guarded page should do for a given auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// No auth provider is mounted.
    NotInitialized,
    Wait,
    Allow,
    Redirect,
}

pub fn guard_decision(state: Option<&AuthState>) -> GuardDecision {
    match state.map(AuthState::status) {
        None => GuardDecision::NotInitialized,
        Some(AuthStatus::Loading) => GuardDecision::Wait,
        Some(AuthStatus::Authenticated(_)) => GuardDecision::Allow,
        Some(AuthStatus::Unauthenticated) => GuardDecision::Redirect,
    }
}

/// Renders `children` only for a signed-in user; everyone else is sent to
/// `redirect_to` once the session has settled.
#[component]
pub fn ProtectedRoute(
    #[props(default = "/auth/login".to_string())] redirect_to: String,
    children: Element,
) -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let decision = guard_decision(auth.state().as_ref());

    let target = redirect_to.clone();
    use_effect(use_reactive!(|decision| {
        if decision == GuardDecision::Redirect {
            nav.replace(target.clone());
        }
    }));

    match decision {
        GuardDecision::Allow => rsx! { {children} },
        GuardDecision::Wait | GuardDecision::Redirect => rsx! { LoadingScreen {} },
        GuardDecision::NotInitialized => rsx! {
            div {
                class: "notice notice-error",
                "Authentication is not initialized."
            }
        },
    }
}

//! This crate contains all shared UI for the workspace.

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod auth;
pub use auth::{use_auth, AuthContext, AuthHandle, AuthProvider, SignOutButton};

mod guard;
pub use guard::{guard_decision, GuardDecision, ProtectedRoute};

mod loading;
pub use loading::LoadingScreen;

pub use api::{AuthState, User};

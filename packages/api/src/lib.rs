//! # API crate: identity, profiles and session state for Quiet Hours
//!
//! This crate holds everything the front-end knows about the hosted backend. It has no
//! UI dependencies, so the same code runs in the browser and under `cargo test`.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | [`IdentityConfig`] from the environment (or compile-time values on wasm) |
//! | [`error`] | [`IdentityError`] and the service error codes used as control signals |
//! | [`identity`] | [`IdentityClient`] / [`ProfileStore`] traits, session-change notifications and [`Subscription`]s |
//! | [`models`] | `Session`, `Profile`, `User` and the `QuietHour` data contract |
//! | [`supabase`] | [`SupabaseClient`], the GoTrue + PostgREST implementation of both traits |
//! | [`sync`] | [`SessionSynchronizer`], which turns sessions into an [`AuthState`] |
//! | [`actions`] | [`AuthActions`]: sign in, sign up, sign out, password reset |
//!
//! ## Flow
//!
//! The UI builds one [`SupabaseClient`], runs a [`SessionSynchronizer`] over it for as
//! long as the app is mounted, and calls [`AuthActions`] from forms. Actions change the
//! client's session; the client notifies its subscribers; the synchronizer reconciles
//! the new session against the `profiles` table and publishes the resulting state.

pub mod actions;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod supabase;
pub mod sync;

#[cfg(test)]
mod mock;

pub use actions::{ActionError, AuthActions, SignUpOutcome};
pub use config::{ConfigError, IdentityConfig, SchemaPolicy};
pub use error::IdentityError;
pub use identity::{AuthChange, AuthEvent, IdentityClient, ProfileStore, Subscription};
pub use models::{QuietHour, Session, User, UserSource};
pub use supabase::SupabaseClient;
pub use sync::{AuthState, AuthStatus, SessionSynchronizer};

//! # Supabase client
//!
//! [`SupabaseClient`] implements [`IdentityClient`] against the project's GoTrue
//! endpoints (`/auth/v1/*`) and [`ProfileStore`] against PostgREST
//! (`/rest/v1/profiles`). It owns the current [`Session`], persists it between page
//! loads, and announces every change to subscribers as an [`AuthChange`].
//!
//! Every request carries the project's anon key as `apikey`; the bearer token is
//! the user's access token when signed in and the anon key otherwise, so row-level
//! security sees the right role.

mod storage;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::IdentityConfig;
use crate::error::IdentityError;
use crate::identity::{AuthChange, AuthEvent, AuthListeners, IdentityClient, ProfileStore, Subscription};
use crate::models::{NewProfile, Profile, Session, SessionUser};
use storage::SessionStorage;

/// PostgREST media type asking for exactly one row as a bare object.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const PROFILES: &str = "profiles";

/// Shared handle to one Supabase project. Cloning is cheap.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: IdentityConfig,
    session: Mutex<Option<Session>>,
    storage: SessionStorage,
    listeners: AuthListeners,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.inner.config.url)
            .field("signed_in", &self.current_session().is_some())
            .finish()
    }
}

impl PartialEq for SupabaseClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Signup answers with a session when confirmation is off, a bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(SessionUser),
}

impl SupabaseClient {
    /// Build a client, restoring any session persisted by a previous page load.
    pub fn new(config: IdentityConfig) -> Self {
        let storage = SessionStorage::new(config.storage_key.clone());
        let session = storage.load();
        if let Some(session) = &session {
            tracing::debug!(user_id = %session.user.id, "restored session");
        }

        Self {
            inner: Arc::new(Inner {
                http: reqwest::Client::new(),
                config,
                session: Mutex::new(session),
                storage,
                listeners: AuthListeners::new(),
            }),
        }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.inner.config
    }

    /// The session currently held, without contacting the service.
    pub fn current_session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    /// Exchange the refresh token for a new session.
    ///
    /// The answer is installed only if the session it was requested for is still
    /// current; a sign-out or sign-in during the request wins. A refresh token the
    /// service rejects (4xx) ends the session locally and notifies `SignedOut`;
    /// server errors and network failures leave the session untouched.
    pub async fn refresh_session(&self) -> Result<Session, IdentityError> {
        let refresh_token = self
            .current_session()
            .map(|s| s.refresh_token)
            .ok_or(IdentityError::NoSession)?;

        let response = self
            .request(Method::POST, self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": &refresh_token }))
            .send()
            .await;

        match read_json::<Session>(response).await {
            Ok(session) => {
                let session = session.stamped(now());
                if self.replace_session(&refresh_token, Some(session.clone()), AuthEvent::TokenRefreshed) {
                    return Ok(session);
                }
                tracing::debug!("session changed during refresh; discarding the result");
                self.current_session().ok_or(IdentityError::NoSession)
            }
            Err(e) if e.is_client_error() => {
                if self.replace_session(&refresh_token, None, AuthEvent::SignedOut) {
                    tracing::warn!(error = %e, "refresh token rejected; signing out");
                }
                Err(e)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed; keeping the session");
                Err(e)
            }
        }
    }

    /// Refresh when the access token is within the configured margin of expiry.
    /// Returns whether a refresh happened.
    pub async fn refresh_if_expiring(&self) -> Result<bool, IdentityError> {
        let margin = self.inner.config.refresh_margin_secs;
        match self.current_session() {
            Some(session) if session.expires_within(margin, now()) => {
                self.refresh_session().await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn set_session(&self, session: Option<Session>, event: AuthEvent) {
        *self.lock_session() = session.clone();
        self.persist_and_notify(session, event);
    }

    /// Swap in `session` only while the held session still carries
    /// `refresh_token`. Returns whether the swap happened.
    fn replace_session(&self, refresh_token: &str, session: Option<Session>, event: AuthEvent) -> bool {
        {
            let mut current = self.lock_session();
            if current.as_ref().map(|s| s.refresh_token.as_str()) != Some(refresh_token) {
                return false;
            }
            *current = session.clone();
        }
        self.persist_and_notify(session, event);
        true
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_and_notify(&self, session: Option<Session>, event: AuthEvent) {
        match &session {
            Some(s) => self.inner.storage.save(s),
            None => self.inner.storage.clear(),
        }
        self.inner.listeners.emit(AuthChange::new(event, session));
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.config.url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.config.url)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let bearer = self
            .current_session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.inner.config.anon_key.clone());

        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.config.anon_key)
            .bearer_auth(bearer)
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

async fn read_text(response: Result<Response, reqwest::Error>) -> Result<String, IdentityError> {
    let response = response?;
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(IdentityError::from_response(status.as_u16(), &body))
    }
}

async fn read_json<T: DeserializeOwned>(
    response: Result<Response, reqwest::Error>,
) -> Result<T, IdentityError> {
    let body = read_text(response).await?;
    Ok(serde_json::from_str(&body)?)
}

impl IdentityClient for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        match self.current_session() {
            Some(session) if session.is_expired(now()) => self.refresh_session().await.map(Some),
            session => Ok(session),
        }
    }

    fn on_auth_state_change(&self) -> Subscription {
        self.inner.listeners.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let response = self
            .request(Method::POST, self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await;

        let session = read_json::<Session>(response).await?.stamped(now());
        self.set_session(Some(session.clone()), AuthEvent::SignedIn);
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Option<Session>, IdentityError> {
        let response = self
            .request(Method::POST, self.auth_url("signup"))
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name.unwrap_or("") },
            }))
            .send()
            .await;

        match read_json::<SignUpResponse>(response).await? {
            SignUpResponse::Session(session) => {
                let session = session.stamped(now());
                self.set_session(Some(session.clone()), AuthEvent::SignedIn);
                Ok(Some(session))
            }
            SignUpResponse::User(user) => {
                tracing::debug!(user_id = %user.id, "sign up pending confirmation");
                Ok(None)
            }
        }
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        if self.current_session().is_none() {
            return Ok(());
        }

        let response = self
            .request(Method::POST, self.auth_url("logout"))
            .send()
            .await;
        let result = read_text(response).await.map(|_| ());

        // The local session ends whether or not the service acknowledged it.
        self.set_session(None, AuthEvent::SignedOut);
        result
    }

    async fn reset_password_for_email(&self, email: &str) -> Result<(), IdentityError> {
        let response = self
            .request(Method::POST, self.auth_url("recover"))
            .json(&json!({ "email": email }))
            .send()
            .await;
        read_text(response).await.map(|_| ())
    }
}

impl ProfileStore for SupabaseClient {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Profile, IdentityError> {
        let response = self
            .request(Method::GET, self.rest_url(PROFILES))
            .query(&[("id", format!("eq.{user_id}")), ("select", "*".to_string())])
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await;
        read_json(response).await
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Option<Profile>, IdentityError> {
        let response = self
            .request(Method::POST, self.rest_url(PROFILES))
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(profile)
            .send()
            .await;

        let body = read_text(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }
}

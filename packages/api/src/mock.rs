//! Scripted identity service for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::error::IdentityError;
use crate::identity::{AuthChange, AuthEvent, AuthListeners, IdentityClient, ProfileStore, Subscription};
use crate::models::{NewProfile, Profile, Session, SessionUser, UserMetadata};

#[derive(Debug)]
struct Script {
    session: Result<Option<Session>, IdentityError>,
    profile: Result<Profile, IdentityError>,
    insert: Result<Option<Profile>, IdentityError>,
    action: Result<(), IdentityError>,
    signup_session: bool,
    inserted: Vec<NewProfile>,
    profile_lookups: usize,
    calls: Vec<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct MockIdentity {
    script: Rc<RefCell<Script>>,
    listeners: AuthListeners,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self {
            script: Rc::new(RefCell::new(Script {
                session: Ok(None),
                profile: Err(IdentityError::api(500, None, "no profile scripted")),
                insert: Err(IdentityError::api(500, None, "no insert scripted")),
                action: Ok(()),
                signup_session: false,
                inserted: Vec::new(),
                profile_lookups: 0,
                calls: Vec::new(),
            })),
            listeners: AuthListeners::new(),
        }
    }

    pub fn with_session(self, session: Option<Session>) -> Self {
        self.script.borrow_mut().session = Ok(session);
        self
    }

    pub fn with_session_error(self, err: IdentityError) -> Self {
        self.script.borrow_mut().session = Err(err);
        self
    }

    pub fn with_profile(self, result: Result<Profile, IdentityError>) -> Self {
        self.script.borrow_mut().profile = result;
        self
    }

    pub fn with_insert(self, result: Result<Option<Profile>, IdentityError>) -> Self {
        self.script.borrow_mut().insert = result;
        self
    }

    /// Result returned by every account action.
    pub fn with_action(self, result: Result<(), IdentityError>) -> Self {
        self.script.borrow_mut().action = result;
        self
    }

    /// Sign-up issues a session instead of waiting for email confirmation.
    pub fn with_signup_session(self) -> Self {
        self.script.borrow_mut().signup_session = true;
        self
    }

    pub fn emit(&self, change: AuthChange) {
        self.listeners.emit(change);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn inserted(&self) -> Vec<NewProfile> {
        self.script.borrow().inserted.clone()
    }

    pub fn profile_lookups(&self) -> usize {
        self.script.borrow().profile_lookups
    }

    /// Account actions received, formatted as `name:arg,arg`.
    pub fn calls(&self) -> Vec<String> {
        self.script.borrow().calls.clone()
    }

    fn record(&self, call: String) -> Result<(), IdentityError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(call);
        script.action.clone()
    }
}

impl IdentityClient for MockIdentity {
    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        self.script.borrow().session.clone()
    }

    fn on_auth_state_change(&self) -> Subscription {
        self.listeners.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        self.record(format!("sign_in:{email},{password}"))?;
        let session = session_for(email, None);
        self.emit(AuthChange::new(AuthEvent::SignedIn, Some(session.clone())));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Option<Session>, IdentityError> {
        self.record(format!("sign_up:{email},{password},{}", name.unwrap_or("")))?;
        if !self.script.borrow().signup_session {
            return Ok(None);
        }
        let session = session_for(email, name);
        self.emit(AuthChange::new(AuthEvent::SignedIn, Some(session.clone())));
        Ok(Some(session))
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let result = self.record("sign_out:".to_string());
        self.emit(AuthChange::new(AuthEvent::SignedOut, None));
        result
    }

    async fn reset_password_for_email(&self, email: &str) -> Result<(), IdentityError> {
        self.record(format!("reset_password:{email}"))
    }
}

impl ProfileStore for MockIdentity {
    async fn fetch_profile(&self, _user_id: Uuid) -> Result<Profile, IdentityError> {
        let mut script = self.script.borrow_mut();
        script.profile_lookups += 1;
        script.profile.clone()
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Option<Profile>, IdentityError> {
        let mut script = self.script.borrow_mut();
        script.inserted.push(profile.clone());
        script.insert.clone()
    }
}

pub(crate) fn session_for(email: &str, name: Option<&str>) -> Session {
    Session {
        access_token: "access-token".to_string(),
        refresh_token: "refresh-token".to_string(),
        token_type: "bearer".to_string(),
        expires_in: 3600,
        expires_at: Some(1_700_003_600),
        user: SessionUser {
            id: Uuid::from_u128(0x5f0c_4c5e_8d3b_4bb1_9a0e_2f8f_4b6f_1c11),
            email: Some(email.to_string()),
            user_metadata: UserMetadata {
                name: name.map(str::to_string),
            },
        },
    }
}

pub(crate) fn profile_for(session: &Session) -> Profile {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    Profile {
        id: session.user.id,
        email: session.user.email.clone().unwrap_or_default(),
        name: session.user.display_name().map(str::to_string),
        created_at: created,
        updated_at: created,
    }
}

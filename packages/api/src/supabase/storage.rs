//! Session persistence across page loads.
//!
//! On the web the session lives in `localStorage` under the configured key. Native
//! builds keep nothing between runs.

use crate::models::Session;

#[derive(Debug, Clone)]
pub(crate) struct SessionStorage {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    key: String,
}

impl SessionStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(target_arch = "wasm32")]
impl SessionStorage {
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn load(&self) -> Option<Session> {
        let raw = Self::local_storage()?.get_item(&self.key).ok()??;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored session");
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, session: &Session) {
        let Some(storage) = Self::local_storage() else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(raw) => {
                if storage.set_item(&self.key, &raw).is_err() {
                    tracing::warn!("could not persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not encode session"),
        }
    }

    pub fn clear(&self) {
        if let Some(storage) = Self::local_storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SessionStorage {
    pub fn load(&self) -> Option<Session> {
        None
    }

    pub fn save(&self, _session: &Session) {}

    pub fn clear(&self) {}
}

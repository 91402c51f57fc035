//! # Identity service configuration
//!
//! [`IdentityConfig`] carries everything [`SupabaseClient`](crate::SupabaseClient)
//! needs: the project URL, the public anon key, and a few behaviour switches.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `SUPABASE_URL` | yes | |
//! | `SUPABASE_ANON_KEY` | yes | |
//! | `QUIET_HOURS_TRANSIENT_PROFILES` | no | `true` |
//! | `QUIET_HOURS_SESSION_KEY` | no | `quiet-hours-auth` |
//! | `QUIET_HOURS_REFRESH_MARGIN_SECS` | no | `60` |
//!
//! Native builds read a `.env` file (via `dotenvy`) and then the process
//! environment. A browser has no environment, so wasm builds use the values
//! present when the crate was compiled.

/// What to do when the `profiles` table has not been provisioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Keep the user signed in with a profile built from the session.
    #[default]
    AllowTransient,
    /// Treat the user as signed out.
    FailClosed,
}

impl SchemaPolicy {
    pub fn allows_transient(self) -> bool {
        self == Self::AllowTransient
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentityConfig {
    /// Project base URL without a trailing slash.
    pub url: String,
    pub anon_key: String,
    pub schema_policy: SchemaPolicy,
    /// `localStorage` key under which the session is persisted.
    pub storage_key: String,
    /// Refresh the access token once it is this close to expiry.
    pub refresh_margin_secs: i64,
}

const DEFAULT_STORAGE_KEY: &str = "quiet-hours-auth";
const DEFAULT_REFRESH_MARGIN_SECS: i64 = 60;

impl IdentityConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                name: "SUPABASE_URL",
                reason: format!("expected an http(s) URL, got {url:?}"),
            });
        }

        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
        }

        Ok(Self {
            url,
            anon_key,
            schema_policy: SchemaPolicy::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS,
        })
    }

    /// Load from the environment (see module docs).
    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        dotenvy::dotenv().ok();

        Self::from_vars(|name| runtime_var(name).or_else(|| baked_var(name)))
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let anon_key = get("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        let mut config = Self::new(url, anon_key)?;

        if let Some(raw) = get("QUIET_HOURS_TRANSIENT_PROFILES") {
            config.schema_policy = if parse_flag("QUIET_HOURS_TRANSIENT_PROFILES", &raw)? {
                SchemaPolicy::AllowTransient
            } else {
                SchemaPolicy::FailClosed
            };
        }

        if let Some(key) = get("QUIET_HOURS_SESSION_KEY") {
            config.storage_key = key.trim().to_string();
        }

        if let Some(raw) = get("QUIET_HOURS_REFRESH_MARGIN_SECS") {
            config.refresh_margin_secs = raw
                .trim()
                .parse::<u32>()
                .map(i64::from)
                .map_err(|e| ConfigError::Invalid {
                    name: "QUIET_HOURS_REFRESH_MARGIN_SECS",
                    reason: e.to_string(),
                })?;
        }

        Ok(config)
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("expected a boolean, got {other:?}"),
        }),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(target_arch = "wasm32")]
fn runtime_var(_name: &str) -> Option<String> {
    None
}

fn baked_var(name: &str) -> Option<String> {
    let value = match name {
        "SUPABASE_URL" => option_env!("SUPABASE_URL"),
        "SUPABASE_ANON_KEY" => option_env!("SUPABASE_ANON_KEY"),
        "QUIET_HOURS_TRANSIENT_PROFILES" => option_env!("QUIET_HOURS_TRANSIENT_PROFILES"),
        "QUIET_HOURS_SESSION_KEY" => option_env!("QUIET_HOURS_SESSION_KEY"),
        "QUIET_HOURS_REFRESH_MARGIN_SECS" => option_env!("QUIET_HOURS_REFRESH_MARGIN_SECS"),
        _ => None,
    };
    value.map(str::to_string)
}

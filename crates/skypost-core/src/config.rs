//! Agent configuration.
//!
//! An agent needs a PDS address and a credential. The address falls back to
//! `DEFAULT_SERVER` when unset or empty.
//!
//! `from_env` reads `SKYPOST_SERVER`, `SKYPOST_HANDLE` and
//! `SKYPOST_APP_PASSWORD`. Nothing is written to disk.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::auth::Credential;

/// PDS used when no server is configured.
pub const DEFAULT_SERVER: &str = "https://bsky.social";

pub const ENV_SERVER: &str = "SKYPOST_SERVER";
pub const ENV_HANDLE: &str = "SKYPOST_HANDLE";
pub const ENV_APP_PASSWORD: &str = "SKYPOST_APP_PASSWORD";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub server: Option<String>,
    pub identifier: String,
    pub secret: String,
}

impl AgentConfig {
    pub fn new(
        server: Option<String>,
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            server,
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        Ok(Self {
            server: lookup(ENV_SERVER),
            identifier: required(ENV_HANDLE)?,
            secret: required(ENV_APP_PASSWORD)?,
        })
    }

    /// Server address, or `DEFAULT_SERVER` when unset or empty.
    pub fn server(&self) -> &str {
        match self.server.as_deref() {
            Some(server) if !server.trim().is_empty() => server,
            _ => DEFAULT_SERVER,
        }
    }

    pub fn credential(&self) -> Credential {
        Credential::new(self.identifier.clone(), self.secret.clone())
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("server", &self.server())
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

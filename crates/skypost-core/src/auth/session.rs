use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::expiration_of;

/// Identity used to open a session: a handle (or DID/email) and an app password.
#[derive(Clone)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Tokens and account identity returned by `createSession` / `refreshSession`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_jwt: String,
    pub refresh_jwt: String,
    pub handle: String,
    pub did: String,
}

impl TokenPair {
    pub fn access_expiration(&self) -> DateTime<Utc> {
        expiration_of(&self.access_jwt)
    }

    pub fn refresh_expiration(&self) -> DateTime<Utc> {
        expiration_of(&self.refresh_jwt)
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_jwt", &"<redacted>")
            .field("refresh_jwt", &"<redacted>")
            .field("handle", &self.handle)
            .field("did", &self.did)
            .finish()
    }
}

/// Where a session stands relative to a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NoSession,
    Valid,
    AccessExpiredRefreshValid,
    BothExpired,
}

/// In-memory session owned by a single agent.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    tokens: Option<TokenPair>,
    last_create: Option<DateTime<Utc>>,
    last_refresh: Option<DateTime<Utc>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> Option<&TokenPair> {
        self.tokens.as_ref()
    }

    pub fn last_create(&self) -> Option<DateTime<Utc>> {
        self.last_create
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Classify the session at `now`. A token is only valid strictly before
    /// its expiration; expiring exactly at `now` counts as expired.
    pub fn status(&self, now: DateTime<Utc>) -> SessionStatus {
        let Some(tokens) = &self.tokens else {
            return SessionStatus::NoSession;
        };

        if tokens.access_expiration() > now {
            SessionStatus::Valid
        } else if tokens.refresh_expiration() > now {
            SessionStatus::AccessExpiredRefreshValid
        } else {
            SessionStatus::BothExpired
        }
    }

    pub(crate) fn record_create(&mut self, tokens: TokenPair, now: DateTime<Utc>) {
        self.tokens = Some(tokens);
        self.last_create = Some(now);
    }

    pub(crate) fn record_refresh(&mut self, tokens: TokenPair, now: DateTime<Utc>) {
        self.tokens = Some(tokens);
        self.last_refresh = Some(now);
    }
}

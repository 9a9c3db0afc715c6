//! The agent: session decisions plus the authenticated helpers built on them.
//!
//! Every authenticated call first runs `authenticate`, which inspects the
//! held tokens and does at most one of:
//!
//! | Session                         | Action            |
//! |---------------------------------|-------------------|
//! | none                            | `createSession`   |
//! | access token valid              | nothing           |
//! | access expired, refresh valid   | `refreshSession`  |
//! | both expired                    | `createSession`   |
//!
//! A failed refresh is returned to the caller; it never falls back to
//! creating a new session in the same call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tokio::sync::Mutex;
use tracing::warn;

use crate::api::{ApiError, SessionTransport, XrpcClient};
use crate::auth::{Credential, SessionState, SessionStatus, TokenPair};
use crate::config::{AgentConfig, DEFAULT_SERVER};
use crate::error::{AuthError, Error, Result};
use crate::logging::{Logger, NoopLogger};
use crate::models::post::FEED_POST_COLLECTION;
use crate::models::{Blob, FeedPost, Image, PostBuilder, RecordRef};

/// What `authenticate` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Reused,
    Refreshed,
    Created,
}

impl AuthOutcome {
    pub fn created(&self) -> bool {
        *self == AuthOutcome::Created
    }

    pub fn refreshed(&self) -> bool {
        *self == AuthOutcome::Refreshed
    }
}

pub struct Agent<T: SessionTransport = XrpcClient> {
    transport: T,
    credential: Credential,
    logger: Arc<dyn Logger>,
    // Held across the whole check-then-act sequence of `authenticate`.
    state: Mutex<SessionState>,
}

impl Agent<XrpcClient> {
    /// Create an agent for `server`; an empty server uses `DEFAULT_SERVER`.
    pub fn new(
        server: &str,
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let server = if server.trim().is_empty() {
            DEFAULT_SERVER
        } else {
            server
        };
        let transport = XrpcClient::new(server)?;
        Ok(Self::with_transport(
            transport,
            Credential::new(identifier, secret),
        ))
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, ApiError> {
        let transport = XrpcClient::new(config.server())?;
        Ok(Self::with_transport(transport, config.credential()))
    }

    /// Fetch an image and upload it as a blob.
    pub async fn upload_image(&self, image: &Image) -> Result<Blob> {
        let tokens = self.authorized().await?;
        self.upload_with(&tokens, image).await
    }

    /// Upload several images, authenticating once. The returned blobs are in
    /// the same order as `images`.
    pub async fn upload_images(&self, images: &[Image]) -> Result<Vec<Blob>> {
        let tokens = self.authorized().await?;
        try_join_all(images.iter().map(|image| self.upload_with(&tokens, image))).await
    }

    async fn upload_with(&self, tokens: &TokenPair, image: &Image) -> Result<Blob> {
        let (bytes, mime_type) =
            self.transport
                .fetch_image(&image.uri)
                .await
                .map_err(|source| Error::ImageFetch {
                    url: image.uri.to_string(),
                    source,
                })?;

        Ok(self
            .transport
            .upload_blob(&tokens.access_jwt, bytes, &mime_type)
            .await?)
    }

    /// Create an `app.bsky.feed.post` record in the session's repo.
    pub async fn post_to_feed(&self, post: &FeedPost) -> Result<RecordRef> {
        let tokens = self.authorized().await?;
        Ok(self
            .transport
            .create_record(&tokens.access_jwt, &tokens.did, FEED_POST_COLLECTION, post)
            .await?)
    }

    /// Upload `images`, then post `text` with them embedded.
    pub async fn post_with_images(&self, text: &str, images: &[Image]) -> Result<RecordRef> {
        let blobs = self.upload_images(images).await?;
        let post = images
            .iter()
            .zip(blobs)
            .fold(PostBuilder::new(text), |builder, (image, blob)| {
                builder.image(blob, image.alt.clone())
            })
            .build();
        self.post_to_feed(&post).await
    }
}

impl<T: SessionTransport> Agent<T> {
    pub fn with_transport(transport: T, credential: Credential) -> Self {
        Self {
            transport,
            credential,
            logger: Arc::new(NoopLogger),
            state: Mutex::new(SessionState::new()),
        }
    }

    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn identifier(&self) -> &str {
        self.credential.identifier()
    }

    /// Alias for [`Agent::authenticate`].
    pub async fn connect(&self) -> Result<AuthOutcome, AuthError> {
        self.authenticate().await
    }

    /// Make sure a usable session is held, creating or refreshing as needed.
    pub async fn authenticate(&self) -> Result<AuthOutcome, AuthError> {
        self.authenticate_at(Utc::now()).await
    }

    /// Same as [`Agent::authenticate`], judged at `now`.
    pub async fn authenticate_at(&self, now: DateTime<Utc>) -> Result<AuthOutcome, AuthError> {
        self.ensure_session(now).await.map(|(outcome, _)| outcome)
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn access_jwt(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.tokens().map(|t| t.access_jwt.clone())
    }

    pub async fn did(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.tokens().map(|t| t.did.clone())
    }

    pub async fn last_create(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_create()
    }

    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_refresh()
    }

    /// Authenticate and return the tokens to use for the next request.
    async fn authorized(&self) -> Result<TokenPair, AuthError> {
        self.ensure_session(Utc::now()).await.map(|(_, tokens)| tokens)
    }

    async fn ensure_session(
        &self,
        now: DateTime<Utc>,
    ) -> Result<(AuthOutcome, TokenPair), AuthError> {
        let mut state = self.state.lock().await;

        match (state.status(now), state.tokens().cloned()) {
            (SessionStatus::Valid, Some(tokens)) => {
                self.logger.debug("Access token still valid.");
                Ok((AuthOutcome::Reused, tokens))
            }
            (SessionStatus::AccessExpiredRefreshValid, Some(current)) => {
                self.logger.debug("Access token expired. Refreshing.");
                let tokens = self
                    .transport
                    .refresh_session(&current.refresh_jwt)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Session refresh failed");
                        AuthError::SessionRefreshFailed(e)
                    })?;
                state.record_refresh(tokens.clone(), now);
                Ok((AuthOutcome::Refreshed, tokens))
            }
            (_, current) => {
                match current {
                    None => self.logger.debug("No auth. Creating new session."),
                    Some(expired) => self.logger.debug(&format!(
                        "All tokens expired. Creating new session. Access expired: {}, Refresh expired: {}",
                        expired.access_expiration(),
                        expired.refresh_expiration()
                    )),
                }
                let tokens = self
                    .transport
                    .create_session(self.credential.identifier(), self.credential.secret())
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Session creation failed");
                        AuthError::SessionCreationFailed(e)
                    })?;
                state.record_create(tokens.clone(), now);
                Ok((AuthOutcome::Created, tokens))
            }
        }
    }
}

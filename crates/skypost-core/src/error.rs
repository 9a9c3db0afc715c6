//! Errors raised by the agent.

use thiserror::Error;

use crate::api::ApiError;

/// A session could not be established.
///
/// The session held by the agent is unchanged when either variant is returned.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to create session")]
    SessionCreationFailed(#[source] ApiError),

    #[error("Failed to refresh session")]
    SessionRefreshFailed(#[source] ApiError),
}

impl AuthError {
    /// The transport error behind the failed session call.
    pub fn api_error(&self) -> &ApiError {
        match self {
            AuthError::SessionCreationFailed(e) | AuthError::SessionRefreshFailed(e) => e,
        }
    }
}

/// Errors from authenticated helpers (posting, uploading).
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to fetch image {url}")]
    ImageFetch {
        url: String,
        #[source]
        source: ApiError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

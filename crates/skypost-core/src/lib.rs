//! Core library for skypost.
//!
//! This crate provides:
//! - `auth`: token inspection and session state for an AT Protocol PDS
//! - `agent`: the `Agent` that decides when to create, refresh or reuse a session
//! - `api`: the XRPC client and the `SessionTransport` seam
//! - `models`: posts, images and blob references
//! - `config`: server address and credentials
//! - `logging`: the injectable diagnostic sink used by the agent

pub mod agent;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;

pub use agent::{Agent, AuthOutcome};
pub use api::{ApiError, SessionTransport, XrpcClient};
pub use auth::{expiration_of, Credential, SessionState, SessionStatus, TokenPair};
pub use config::{AgentConfig, ConfigError, DEFAULT_SERVER};
pub use error::{AuthError, Error};
pub use logging::{Logger, NoopLogger, StdoutLogger, TracingLogger};
pub use models::{Blob, FeedPost, Image, PostBuilder, RecordRef};
pub use reqwest::Url;

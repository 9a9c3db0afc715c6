//! XRPC client module for AT Protocol personal data servers.
//!
//! This module provides the `XrpcClient` for session calls, blob uploads
//! and record creation, and the `SessionTransport` trait the agent uses
//! to open and refresh sessions.
//!
//! Session calls send the credential or refresh JWT; every other call
//! sends the current access JWT as a bearer token.

pub mod client;
pub mod error;
pub mod transport;

pub use client::XrpcClient;
pub use error::ApiError;
pub use transport::SessionTransport;

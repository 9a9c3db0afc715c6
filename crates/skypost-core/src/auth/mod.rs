//! Authentication module for managing PDS sessions.
//!
//! This module provides:
//! - `expiration_of`: reads the `exp` claim of a JWT without verifying it
//! - `SessionState`: the current token pair plus create/refresh timestamps
//!
//! Sessions live in memory only. Every process starts without one.

pub mod session;
pub mod token;

pub use session::{Credential, SessionState, SessionStatus, TokenPair};
pub use token::{expiration_of, inspect, Claims, TokenError};

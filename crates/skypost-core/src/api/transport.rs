use std::future::Future;

use crate::auth::TokenPair;

use super::ApiError;

/// Remote session operations consumed by the agent.
///
/// Implementations make exactly one call per method and do not retry;
/// the agent treats any error as final for that `authenticate` call.
pub trait SessionTransport: Send + Sync {
    /// `com.atproto.server.createSession`
    fn create_session(
        &self,
        identifier: &str,
        secret: &str,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send;

    /// `com.atproto.server.refreshSession`, authorized by `refresh_jwt`.
    fn refresh_session(
        &self,
        refresh_jwt: &str,
    ) -> impl Future<Output = Result<TokenPair, ApiError>> + Send;
}

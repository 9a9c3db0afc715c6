//! Unverified JWT inspection.
//!
//! PDS tokens are compact JWS strings (`header.payload.signature`). The
//! client never holds the server's key, so the signature segment is not
//! checked here: the claims are advisory timing hints used only to decide
//! whether a session should be refreshed.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::debug;

/// Number of dot-separated segments in a compact JWS.
const JWS_SEGMENTS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("{0} segment is not valid base64url")]
    Encoding(&'static str),

    #[error("{0} segment is not a JSON object")]
    Json(&'static str),
}

/// Decoded (but unverified) payload of a token.
#[derive(Debug, Clone)]
pub struct Claims {
    inner: JsonValue,
}

impl Claims {
    /// Gets a claim value by key.
    pub fn get_claim(&self, key: &str) -> Option<&JsonValue> {
        self.inner.get(key)
    }

    /// The `exp` claim as an instant, if present and numeric.
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        let exp = self.inner.get("exp")?.as_f64()?;
        if !exp.is_finite() {
            return None;
        }
        DateTime::from_timestamp(exp.trunc() as i64, 0)
    }
}

fn decode_segment(segment: &str, name: &'static str) -> Result<JsonValue, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding(name))?;
    let value: JsonValue =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Json(name))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(TokenError::Json(name))
    }
}

/// Decode a token's claims without looking at its signature.
///
/// A token whose header and payload decode is readable even when the
/// signature segment is empty or garbage.
pub fn inspect(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != JWS_SEGMENTS {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    decode_segment(segments[0], "header")?;
    let inner = decode_segment(segments[1], "payload")?;

    Ok(Claims { inner })
}

/// Expiration instant of `token`.
///
/// Unreadable tokens and tokens without a usable `exp` claim report the
/// Unix epoch, so callers always treat them as expired.
pub fn expiration_of(token: &str) -> DateTime<Utc> {
    match inspect(token) {
        Ok(claims) => claims.expiration().unwrap_or_else(|| {
            debug!("Token has no usable exp claim, treating as expired");
            DateTime::<Utc>::UNIX_EPOCH
        }),
        Err(e) => {
            debug!(error = %e, "Unreadable token, treating as expired");
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

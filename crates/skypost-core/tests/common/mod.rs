//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use skypost_core::{ApiError, Logger, SessionTransport, TokenPair};

pub const TEST_DID: &str = "did:plc:testuser";
pub const TEST_HANDLE: &str = "testuser.test";

/// Build a JWT carrying only an `exp` claim, with a dummy signature.
pub fn make_jwt(exp: DateTime<Utc>) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"ES256K","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{}}}"#, exp.timestamp()));
    format!("{}.{}.ZmFrZS1zaWduYXR1cmU", header, payload)
}

pub fn make_pair(access_exp: DateTime<Utc>, refresh_exp: DateTime<Utc>) -> TokenPair {
    TokenPair {
        access_jwt: make_jwt(access_exp),
        refresh_jwt: make_jwt(refresh_exp),
        handle: TEST_HANDLE.to_string(),
        did: TEST_DID.to_string(),
    }
}

/// In-memory session endpoint. Issues tokens with the configured
/// expirations and records every call it receives.
pub struct MockTransport {
    access_exp: Mutex<DateTime<Utc>>,
    refresh_exp: Mutex<DateTime<Utc>>,
    create_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    fail_create: AtomicBool,
    fail_refresh: AtomicBool,
    delay: Mutex<Option<Duration>>,
    refresh_tokens_seen: Mutex<Vec<String>>,
    credentials_seen: Mutex<Vec<(String, String)>>,
    issued: Mutex<Vec<TokenPair>>,
}

impl MockTransport {
    pub fn new(access_exp: DateTime<Utc>, refresh_exp: DateTime<Utc>) -> Self {
        Self {
            access_exp: Mutex::new(access_exp),
            refresh_exp: Mutex::new(refresh_exp),
            create_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            fail_create: AtomicBool::new(false),
            fail_refresh: AtomicBool::new(false),
            delay: Mutex::new(None),
            refresh_tokens_seen: Mutex::new(Vec::new()),
            credentials_seen: Mutex::new(Vec::new()),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn set_expirations(&self, access_exp: DateTime<Utc>, refresh_exp: DateTime<Utc>) {
        *self.access_exp.lock().unwrap() = access_exp;
        *self.refresh_exp.lock().unwrap() = refresh_exp;
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_refresh(&self, fail: bool) {
        self.fail_refresh.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_tokens_seen(&self) -> Vec<String> {
        self.refresh_tokens_seen.lock().unwrap().clone()
    }

    pub fn credentials_seen(&self) -> Vec<(String, String)> {
        self.credentials_seen.lock().unwrap().clone()
    }

    pub fn last_issued(&self) -> Option<TokenPair> {
        self.issued.lock().unwrap().last().cloned()
    }

    fn issue(&self) -> TokenPair {
        let pair = make_pair(*self.access_exp.lock().unwrap(), *self.refresh_exp.lock().unwrap());
        self.issued.lock().unwrap().push(pair.clone());
        pair
    }

    async fn wait(&self) {
        let delay = *self.delay.lock().unwrap();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
    }
}

impl SessionTransport for MockTransport {
    async fn create_session(&self, identifier: &str, secret: &str) -> Result<TokenPair, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.credentials_seen
            .lock()
            .unwrap()
            .push((identifier.to_string(), secret.to_string()));
        self.wait().await;

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ApiError::Xrpc {
                status: 401,
                error: "AuthenticationRequired".to_string(),
                message: "Invalid identifier or password".to_string(),
            });
        }
        Ok(self.issue())
    }

    async fn refresh_session(&self, refresh_jwt: &str) -> Result<TokenPair, ApiError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_tokens_seen
            .lock()
            .unwrap()
            .push(refresh_jwt.to_string());
        self.wait().await;

        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(ApiError::Xrpc {
                status: 400,
                error: "ExpiredToken".to_string(),
                message: "Token has expired".to_string(),
            });
        }
        Ok(self.issue())
    }
}

/// Logger that keeps every message for later inspection.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, msg: &str) {
        self.messages.lock().unwrap().push(msg.to_string());
    }
}

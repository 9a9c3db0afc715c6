//! XRPC client for communicating with a PDS.
//!
//! Every call is a single request: no retries and no backoff. Callers
//! that want retry behaviour wrap the call themselves.

use std::time::Duration;

use reqwest::{header, Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::auth::TokenPair;
use crate::models::{Blob, RecordRef};

use super::{ApiError, SessionTransport};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const CREATE_SESSION: &str = "com.atproto.server.createSession";
const REFRESH_SESSION: &str = "com.atproto.server.refreshSession";
const UPLOAD_BLOB: &str = "com.atproto.repo.uploadBlob";
const CREATE_RECORD: &str = "com.atproto.repo.createRecord";

/// Used when an image response carries no Content-Type.
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
struct CreateSessionInput<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadBlobOutput {
    blob: Blob,
}

#[derive(Debug, Serialize)]
struct CreateRecordInput<'a, R> {
    repo: &'a str,
    collection: &'a str,
    record: &'a R,
}

/// XRPC client bound to one PDS host.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct XrpcClient {
    client: Client,
    host: String,
}

impl XrpcClient {
    /// Create a client for `host` (e.g. `https://bsky.social`).
    pub fn new(host: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            host: host.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn endpoint(&self, nsid: &str) -> String {
        format!("{}/xrpc/{}", self.host, nsid)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        nsid: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{} response: {}", nsid, e)))
    }

    /// POST a procedure call with an optional bearer token and optional JSON body.
    async fn procedure<T: DeserializeOwned, B: Serialize>(
        &self,
        nsid: &str,
        bearer: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        debug!(nsid = nsid, "XRPC procedure");

        let mut request = self.client.post(self.endpoint(nsid));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = Self::check_response(request.send().await?).await?;
        Self::parse_json(response, nsid).await
    }

    /// Upload raw bytes as a blob.
    pub async fn upload_blob(
        &self,
        access_jwt: &str,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<Blob, ApiError> {
        debug!(nsid = UPLOAD_BLOB, size = bytes.len(), "XRPC procedure");

        let response = self
            .client
            .post(self.endpoint(UPLOAD_BLOB))
            .bearer_auth(access_jwt)
            .header(header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let output: UploadBlobOutput = Self::parse_json(response, UPLOAD_BLOB).await?;
        Ok(output.blob)
    }

    /// Create a record in `repo` (a DID or handle).
    pub async fn create_record<R: Serialize>(
        &self,
        access_jwt: &str,
        repo: &str,
        collection: &str,
        record: &R,
    ) -> Result<RecordRef, ApiError> {
        let input = CreateRecordInput {
            repo,
            collection,
            record,
        };
        self.procedure(CREATE_RECORD, Some(access_jwt), Some(&input)).await
    }

    /// Download an image, returning its bytes and MIME type.
    pub async fn fetch_image(&self, url: &Url) -> Result<(Vec<u8>, String), ApiError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = Self::check_response(response).await?;

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());

        let bytes = response.bytes().await?;
        Ok((bytes.to_vec(), mime_type))
    }
}

impl SessionTransport for XrpcClient {
    async fn create_session(&self, identifier: &str, secret: &str) -> Result<TokenPair, ApiError> {
        let input = CreateSessionInput {
            identifier,
            password: secret,
        };
        self.procedure(CREATE_SESSION, None, Some(&input)).await
    }

    async fn refresh_session(&self, refresh_jwt: &str) -> Result<TokenPair, ApiError> {
        self.procedure::<TokenPair, ()>(REFRESH_SESSION, Some(refresh_jwt), None)
            .await
    }
}

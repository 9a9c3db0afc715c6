use reqwest::Url;
use serde::{Deserialize, Serialize};

/// An image to fetch from `uri` and upload as a blob.
#[derive(Debug, Clone)]
pub struct Image {
    pub uri: Url,
    pub alt: String,
}

impl Image {
    pub fn new(uri: Url, alt: impl Into<String>) -> Self {
        Self {
            uri,
            alt: alt.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidLink {
    #[serde(rename = "$link")]
    pub link: String,
}

/// Reference to an uploaded blob, as returned by `com.atproto.repo.uploadBlob`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type", rename = "blob")]
pub struct Blob {
    #[serde(rename = "ref")]
    pub cid: CidLink,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: u64,
}

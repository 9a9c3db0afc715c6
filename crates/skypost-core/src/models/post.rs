use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Blob;

/// Collection NSID for feed posts.
pub const FEED_POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImage {
    pub alt: String,
    pub image: Blob,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Embed {
    #[serde(rename = "app.bsky.embed.images")]
    Images { images: Vec<EmbedImage> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type", rename = "app.bsky.feed.post")]
pub struct FeedPost {
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub langs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
}

impl FeedPost {
    pub fn new(text: impl Into<String>) -> Self {
        PostBuilder::new(text).build()
    }
}

pub struct PostBuilder {
    text: String,
    created_at: Option<DateTime<Utc>>,
    langs: Vec<String>,
    images: Vec<EmbedImage>,
}

impl PostBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            created_at: None,
            langs: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.langs.push(lang.into());
        self
    }

    pub fn image(mut self, image: Blob, alt: impl Into<String>) -> Self {
        self.images.push(EmbedImage {
            alt: alt.into(),
            image,
        });
        self
    }

    pub fn build(self) -> FeedPost {
        let embed = if self.images.is_empty() {
            None
        } else {
            Some(Embed::Images {
                images: self.images,
            })
        };

        FeedPost {
            text: self.text,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            langs: self.langs,
            embed,
        }
    }
}

/// Location of a created record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub uri: String,
    pub cid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CidLink;

    #[test]
    fn test_plain_post_serialization() {
        let created_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let post = PostBuilder::new("hello world").created_at(created_at).build();

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["$type"], "app.bsky.feed.post");
        assert_eq!(value["text"], "hello world");
        assert_eq!(value["createdAt"], "2023-11-14T22:13:20Z");
        assert!(value.get("embed").is_none());
        assert!(value.get("langs").is_none());
    }

    #[test]
    fn test_post_with_images() {
        let blob = Blob {
            cid: CidLink {
                link: "bafkreitest".to_string(),
            },
            mime_type: "image/jpeg".to_string(),
            size: 12,
        };
        let post = PostBuilder::new("look")
            .lang("en")
            .image(blob.clone(), "a cat")
            .build();

        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["langs"][0], "en");
        assert_eq!(value["embed"]["$type"], "app.bsky.embed.images");
        assert_eq!(value["embed"]["images"][0]["alt"], "a cat");
        assert_eq!(value["embed"]["images"][0]["image"]["ref"]["$link"], "bafkreitest");

        let parsed: FeedPost = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, post);
    }
}

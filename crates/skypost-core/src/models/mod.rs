//! Data models for records sent to a PDS.
//!
//! - `FeedPost`, `PostBuilder`: `app.bsky.feed.post` records
//! - `Image`, `Blob`: images to upload and the blob references they become
//! - `RecordRef`: the `uri`/`cid` pair identifying a created record

pub mod blob;
pub mod post;

pub use blob::{Blob, CidLink, Image};
pub use post::{Embed, EmbedImage, FeedPost, PostBuilder, RecordRef};

//! Upstream response schema
//!
//! Every response is decoded into these types; a field the API omits becomes an
//! explicit "not present" value instead of a lookup that may fail at runtime.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Top-level wrapper around every API response
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: Option<T>,
    pub error: Option<ApiErrorBody>,
}

/// Error object returned in place of `response`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub error_msg: String,
}

/// A `{ "count": n }` counter object
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Counter {
    #[serde(default)]
    pub count: i64,
}

/// Reads an optional counter, treating absence as zero
pub fn count_of(counter: &Option<Counter>) -> i64 {
    counter.as_ref().map_or(0, |c| c.count)
}

/// Response of `wall.get`
#[derive(Debug, Deserialize)]
pub struct WallPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub items: Vec<WallPost>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WallPost {
    pub id: i64,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub comments: Option<Counter>,
    pub likes: Option<Counter>,
    pub reposts: Option<Counter>,
    pub views: Option<Counter>,
}

impl WallPost {
    pub fn comment_count(&self) -> i64 {
        count_of(&self.comments)
    }
}

/// Response of `wall.getComments` with `extended=1`
#[derive(Debug, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub items: Vec<WallComment>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WallComment {
    pub id: i64,
    #[serde(default)]
    pub from_id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub likes: Option<Counter>,
    pub thread: Option<Thread>,
}

impl WallComment {
    /// Number of replies in this comment's thread, zero when there is no thread
    pub fn thread_count(&self) -> i64 {
        self.thread.as_ref().map_or(0, |t| t.count)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Thread {
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Id to profile lookup for one comment page
///
/// Built once per page. When an id appears twice the first profile wins.
#[derive(Debug, Default)]
pub struct ProfileIndex<'a> {
    by_id: HashMap<i64, &'a Profile>,
}

impl<'a> ProfileIndex<'a> {
    pub fn new(profiles: &'a [Profile]) -> Self {
        let mut by_id = HashMap::with_capacity(profiles.len());
        for profile in profiles {
            by_id.entry(profile.id).or_insert(profile);
        }
        Self { by_id }
    }

    /// Returns `(first_name, last_name)`, both empty when the id is unknown
    pub fn names(&self, id: i64) -> (&'a str, &'a str) {
        self.by_id
            .get(&id)
            .copied()
            .map_or(("", ""), |p| (p.first_name.as_str(), p.last_name.as_str()))
    }
}

/// A wall or comment attachment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    pub video: Option<Video>,
    pub photo: Option<Photo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub image: Vec<ImageSize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub sizes: Vec<ImageSize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSize {
    #[serde(default)]
    pub url: Option<String>,
}

/// What an attachment counts as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Video,
    Photo,
}

impl Attachment {
    /// Classifies by the data present: a video object wins over a photo object
    pub fn classify(&self) -> Option<AttachmentKind> {
        if self.video.is_some() {
            Some(AttachmentKind::Video)
        } else if self.photo.is_some() {
            Some(AttachmentKind::Photo)
        } else {
            None
        }
    }

    /// URL of the last (largest) rendition of the classified media
    pub fn largest_url(&self) -> Option<&str> {
        let sizes = match self.classify()? {
            AttachmentKind::Video => &self.video.as_ref()?.image,
            AttachmentKind::Photo => &self.photo.as_ref()?.sizes,
        };
        sizes.last()?.url.as_deref()
    }
}

/// Response of `groups.getMembers`
#[derive(Debug, Deserialize)]
pub struct MemberPage {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub items: Vec<MemberItem>,
}

/// Members come back as bare ids unless profile fields were requested
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MemberItem {
    Id(i64),
    Profile(MemberProfile),
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberProfile {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

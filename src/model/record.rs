//! Flat export records and the normalization from upstream items
//!
//! Every record kind serializes with a leading `type` tag followed by its fields
//! in a fixed order, which is also the column order of the tabular exports.

use crate::model::schema::{
    count_of, Attachment, AttachmentKind, MemberItem, ProfileIndex, WallComment, WallPost,
};
use chrono::DateTime;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// The kind tag of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Post,
    Comment,
    Reply,
    Member,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exported row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Post(PostRecord),
    Comment(CommentRecord),
    Reply(ReplyRecord),
    Member(MemberRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Post(_) => RecordKind::Post,
            Self::Comment(_) => RecordKind::Comment,
            Self::Reply(_) => RecordKind::Reply,
            Self::Member(_) => RecordKind::Member,
        }
    }

    /// Id of the post this record belongs to, if any
    pub fn post_id(&self) -> Option<i64> {
        match self {
            Self::Post(p) => Some(p.post_id),
            Self::Comment(c) => Some(c.post_id),
            Self::Reply(r) => Some(r.post_id),
            Self::Member(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub date: String,
    pub user_id: i64,
    pub text: String,
    pub photo_count: u32,
    pub video_count: u32,
    pub comments_count: i64,
    pub likes_count: i64,
    pub reposts_count: i64,
    pub views_count: i64,
    pub link: String,
    pub post_id: i64,
}

impl PostRecord {
    pub fn new(post: &WallPost, domain: &str, owner_id: i64) -> Self {
        let attachments = AttachmentCounts::tally(&post.attachments);
        Self {
            date: format_timestamp(post.date),
            user_id: post.owner_id,
            text: clean_text(&post.text),
            photo_count: attachments.photos,
            video_count: attachments.videos,
            comments_count: post.comment_count(),
            likes_count: count_of(&post.likes),
            reposts_count: count_of(&post.reposts),
            views_count: count_of(&post.views),
            link: permalink(domain, owner_id, post.id),
            post_id: post.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentRecord {
    pub date: String,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub text: String,
    pub photo_count: u32,
    pub video_count: u32,
    pub likes_count: i64,
    pub post_link: String,
    pub post_id: i64,
    pub comment_id: i64,
}

impl CommentRecord {
    /// Normalizes a comment; the link points at the parent post
    pub fn new(comment: &WallComment, post_id: i64, post_link: &str, profiles: &ProfileIndex) -> Self {
        let (first_name, last_name) = profiles.names(comment.from_id);
        let attachments = AttachmentCounts::tally(&comment.attachments);
        Self {
            date: format_timestamp(comment.date),
            user_id: comment.from_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            text: clean_text(&comment.text),
            photo_count: attachments.photos,
            video_count: attachments.videos,
            likes_count: count_of(&comment.likes),
            post_link: post_link.to_string(),
            post_id,
            comment_id: comment.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyRecord {
    pub date: String,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub text: String,
    pub photo_count: u32,
    pub video_count: u32,
    pub likes_count: i64,
    pub post_link: String,
    pub post_id: i64,
    pub parent_comment_id: i64,
    pub comment_id: i64,
}

impl ReplyRecord {
    pub fn new(
        reply: &WallComment,
        post_id: i64,
        parent_comment_id: i64,
        post_link: &str,
        profiles: &ProfileIndex,
    ) -> Self {
        let comment = CommentRecord::new(reply, post_id, post_link, profiles);
        Self {
            date: comment.date,
            user_id: comment.user_id,
            first_name: comment.first_name,
            last_name: comment.last_name,
            text: comment.text,
            photo_count: comment.photo_count,
            video_count: comment.video_count,
            likes_count: comment.likes_count,
            post_link: comment.post_link,
            post_id,
            parent_comment_id,
            comment_id: comment.comment_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Any additional profile fields that were requested
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<MemberItem> for MemberRecord {
    fn from(item: MemberItem) -> Self {
        match item {
            MemberItem::Id(id) => Self {
                user_id: id,
                first_name: String::new(),
                last_name: String::new(),
                extra: Map::new(),
            },
            MemberItem::Profile(profile) => Self {
                user_id: profile.id,
                first_name: profile.first_name,
                last_name: profile.last_name,
                extra: profile.extra,
            },
        }
    }
}

/// Photo and video counts of an attachment list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentCounts {
    pub photos: u32,
    pub videos: u32,
}

impl AttachmentCounts {
    /// Counts attachments by kind, at most one increment per attachment
    pub fn tally(attachments: &[Attachment]) -> Self {
        let mut counts = Self::default();
        for attachment in attachments {
            match attachment.classify() {
                Some(AttachmentKind::Video) => counts.videos += 1,
                Some(AttachmentKind::Photo) => counts.photos += 1,
                None => {}
            }
            if let Some(url) = attachment.largest_url() {
                tracing::trace!("Attachment rendition: {}", url);
            }
        }
        counts
    }
}

/// Formats a unix timestamp as `YYYY-MM-DD HH:MM:SS` in UTC
pub fn format_timestamp(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Strips single quotes and collapses doubled newlines
pub fn clean_text(text: &str) -> String {
    text.replace('\'', "").replace("\n\n", "\n")
}

/// Link to a post on the community wall
pub fn permalink(domain: &str, owner_id: i64, post_id: i64) -> String {
    format!(
        "https://vk.com/{}?w=wall-{}_{}",
        domain,
        owner_id.unsigned_abs(),
        post_id
    )
}

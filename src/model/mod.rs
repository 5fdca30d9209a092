//! Data model for harvested wall content
//!
//! # Components
//!
//! - `schema`: typed upstream responses (wall, comment and member pages)
//! - `Record`: the flat, tagged export record (post, comment, reply, member)
//! - `ResultSet`: the append-only record sequence a crawl job produces

mod record;
pub mod schema;
mod result_set;

// Re-export main types
pub use record::{
    clean_text, format_timestamp, permalink, AttachmentCounts, CommentRecord, MemberRecord,
    PostRecord, Record, RecordKind, ReplyRecord,
};
pub use result_set::ResultSet;

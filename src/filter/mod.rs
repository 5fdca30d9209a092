//! Keyword filtering for posts, comments and replies
//!
//! Filtering is opt-in: a disabled filter, or one whose keyword file could not
//! be read, lets every text through.

mod keywords;

pub use keywords::{matches, KeywordFilter, KeywordList, KeywordLoadError};

//! Comment and reply crawlers
//!
//! Both walk `wall.getComments` with offset/count pagination. The offset runs
//! from 0 while it stays below `count + COMMENT_PAGE_SIZE`, so one trailing page
//! past the reported count is always requested; a page that fails or comes back
//! without `response` is skipped and the walk continues.

use crate::crawler::coordinator::Coordinator;
use crate::model::schema::{CommentPage, ProfileIndex, WallComment, WallPost};
use crate::model::{CommentRecord, Record, ReplyRecord, ResultSet};
use crate::HarvestError;

/// Upstream method listing comments and thread replies
pub const COMMENTS_METHOD: &str = "wall.getComments";

/// Items requested per comment or reply page
pub const COMMENT_PAGE_SIZE: i64 = 100;

/// Offsets requested for a listing that reports `count` items
pub fn page_offsets(count: i64) -> impl Iterator<Item = i64> {
    (0..count.saturating_add(COMMENT_PAGE_SIZE)).step_by(COMMENT_PAGE_SIZE as usize)
}

impl Coordinator {
    /// Crawls every comment page of a post, descending into comment threads
    pub(crate) async fn crawl_comments(
        &self,
        post: &WallPost,
        post_link: &str,
        records: &mut ResultSet,
    ) -> Result<(), HarvestError> {
        for offset in page_offsets(post.comment_count()) {
            let Some(page) = self.fetch_comment_page(post.id, None, offset).await? else {
                continue;
            };
            let profiles = ProfileIndex::new(&page.profiles);

            for comment in &page.items {
                if !self.filter.accepts(&comment.text) {
                    tracing::trace!("Comment {} on post {} filtered out", comment.id, post.id);
                    continue;
                }

                let record = CommentRecord::new(comment, post.id, post_link, &profiles);
                records.push(Record::Comment(record));

                if comment.thread_count() > 0 {
                    self.crawl_replies(post, comment, post_link, records).await?;
                }
            }
        }

        Ok(())
    }

    /// Crawls the reply thread of one comment
    ///
    /// Threads are one level deep, so replies never recurse.
    pub(crate) async fn crawl_replies(
        &self,
        post: &WallPost,
        comment: &WallComment,
        post_link: &str,
        records: &mut ResultSet,
    ) -> Result<(), HarvestError> {
        for offset in page_offsets(comment.thread_count()) {
            let Some(page) = self
                .fetch_comment_page(post.id, Some(comment.id), offset)
                .await?
            else {
                continue;
            };
            let profiles = ProfileIndex::new(&page.profiles);

            for reply in &page.items {
                if !self.filter.accepts(&reply.text) {
                    tracing::trace!("Reply {} to comment {} filtered out", reply.id, comment.id);
                    continue;
                }

                let record = ReplyRecord::new(reply, post.id, comment.id, post_link, &profiles);
                records.push(Record::Reply(record));
            }
        }

        Ok(())
    }

    /// Fetches one comment page, or one thread page when `comment_id` is set
    ///
    /// Page-local failures yield `Ok(None)`; cancellation is propagated.
    async fn fetch_comment_page(
        &self,
        post_id: i64,
        comment_id: Option<i64>,
        offset: i64,
    ) -> Result<Option<CommentPage>, HarvestError> {
        let mut params = vec![
            ("owner_id", self.config.owner_id.to_string()),
            ("post_id", post_id.to_string()),
        ];
        if let Some(comment_id) = comment_id {
            params.push(("comment_id", comment_id.to_string()));
        }
        params.push(("count", COMMENT_PAGE_SIZE.to_string()));
        params.push(("offset", offset.to_string()));
        params.push(("extended", "1".to_string()));

        match self.call::<CommentPage>(COMMENTS_METHOD, &params).await {
            Ok(page) => Ok(Some(page)),
            Err(e) if e.is_page_local() => {
                tracing::warn!(
                    "Skipping comment page of post {} (thread {:?}, offset {}): {}",
                    post_id,
                    comment_id,
                    offset,
                    e
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

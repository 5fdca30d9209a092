//! Post crawler: the first page of the wall

use crate::crawler::coordinator::Coordinator;
use crate::crawler::job::ProgressReporter;
use crate::model::schema::{WallPage, WallPost};
use crate::model::{permalink, PostRecord, Record, ResultSet};
use crate::HarvestError;

/// Upstream method listing wall posts
pub const WALL_METHOD: &str = "wall.get";

impl Coordinator {
    /// Fetches one page of `count` posts from the top of the wall
    ///
    /// Only the first page is read. Any failure here is fatal to the job.
    pub async fn fetch_posts(&self) -> Result<Vec<WallPost>, HarvestError> {
        let params = [
            ("domain", self.config.domain.clone()),
            ("count", self.config.count.to_string()),
        ];
        let page: WallPage = self.call(WALL_METHOD, &params).await?;

        tracing::info!(
            "[{}] Fetched {} posts ({} on the wall)",
            self.config.domain,
            page.items.len(),
            page.count
        );
        Ok(page.items)
    }

    /// Crawls posts and, depth-first, their comments and replies
    pub(crate) async fn crawl_wall(
        &self,
        records: &mut ResultSet,
        progress: &mut ProgressReporter,
    ) -> Result<(), HarvestError> {
        let posts = self.fetch_posts().await?;
        let total = posts.len();

        for (index, post) in posts.iter().enumerate() {
            self.crawl_post(post, records).await?;
            progress.report(index + 1, total);
        }

        progress.finish();
        Ok(())
    }

    async fn crawl_post(&self, post: &WallPost, records: &mut ResultSet) -> Result<(), HarvestError> {
        if !self.filter.accepts(&post.text) {
            tracing::trace!("Post {} filtered out", post.id);
            return Ok(());
        }

        let record = PostRecord::new(post, &self.config.domain, self.config.owner_id);
        records.push(Record::Post(record));

        if post.comment_count() > 0 {
            let link = permalink(&self.config.domain, self.config.owner_id, post.id);
            self.crawl_comments(post, &link, records).await?;
        }

        Ok(())
    }
}

//! Per-kind record counts of a finished job

use crate::model::{RecordKind, ResultSet};

/// Record counts of a finished job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub total: usize,
    pub posts: usize,
    pub comments: usize,
    pub replies: usize,
    pub members: usize,
}

pub fn summarize(records: &ResultSet) -> CrawlSummary {
    CrawlSummary {
        total: records.len(),
        posts: records.count(RecordKind::Post),
        comments: records.count(RecordKind::Comment),
        replies: records.count(RecordKind::Reply),
        members: records.count(RecordKind::Member),
    }
}

/// Prints a summary to stdout
///
/// # Arguments
///
/// * `summary` - The counts to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Records: {}", summary.total);
    for (label, count) in [
        ("Posts", summary.posts),
        ("Comments", summary.comments),
        ("Replies", summary.replies),
        ("Members", summary.members),
    ] {
        if count == 0 {
            continue;
        }
        let percentage = (count as f64 / summary.total as f64) * 100.0;
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
}

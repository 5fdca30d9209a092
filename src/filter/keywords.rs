//! Keyword list loading and containment matching

use std::path::Path;
use thiserror::Error;

/// Failure to read the keyword file
///
/// Never fatal: [`KeywordList::load`] degrades to an empty list.
#[derive(Debug, Error)]
pub enum KeywordLoadError {
    #[error("Failed to read keyword file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Ordered list of lowercase, trimmed keywords
///
/// Loaded once per job and immutable for its duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordList {
    keywords: Vec<String>,
}

impl KeywordList {
    /// Builds a list from raw lines, trimming and lowercasing each one
    ///
    /// Blank lines are dropped, since an empty keyword would match everything.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self { keywords }
    }

    /// Reads a UTF-8 keyword file, one keyword per line
    pub async fn try_load(path: &Path) -> Result<Self, KeywordLoadError> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| KeywordLoadError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
        Ok(Self::from_lines(content.lines()))
    }

    /// Reads a keyword file, falling back to an empty (inert) list on failure
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("{}; keyword filtering disabled", e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

/// Tests text against the keyword list
///
/// Pass-through when filtering is disabled or the list is empty. Otherwise true
/// iff some keyword is a substring of the lowercased text; the first hit wins.
pub fn matches(text: &str, list: &KeywordList, enabled: bool) -> bool {
    if !enabled || list.is_empty() {
        return true;
    }

    let lowered = text.to_lowercase();
    list.iter().any(|keyword| lowered.contains(keyword))
}

/// Keyword filter bound to one crawl job
#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    list: KeywordList,
    enabled: bool,
}

impl KeywordFilter {
    pub fn new(list: KeywordList, enabled: bool) -> Self {
        Self { list, enabled }
    }

    /// A filter that lets everything through
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Loads the keyword file when `enabled`, otherwise returns a pass-through filter
    pub async fn for_job(path: &Path, enabled: bool) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let list = KeywordList::load(path).await;
        if list.is_empty() {
            tracing::warn!("Keyword filtering enabled but no keywords were loaded");
        } else {
            tracing::info!("Loaded {} keywords for filtering", list.len());
        }
        Self::new(list, true)
    }

    pub fn accepts(&self, text: &str) -> bool {
        matches(text, &self.list, self.enabled)
    }

    /// True when the filter can reject anything at all
    pub fn is_active(&self) -> bool {
        self.enabled && !self.list.is_empty()
    }
}

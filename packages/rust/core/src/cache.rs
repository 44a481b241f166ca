//! On-disk cache of raw result markup, keyed by search term.
//!
//! The cache is opaque: it stores the page exactly as delivered and knows
//! nothing about its structure. Entries never expire; `--force` bypasses them.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use handelsregister_shared::{RegisterError, Result};

/// Hex digits of the term hash appended to each cache key.
const KEY_HASH_LEN: usize = 12;

/// Raw result-page cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds the cached markup for `term`.
    pub fn path_for(&self, term: &str) -> PathBuf {
        self.dir.join(format!("{}.html", cache_key(term)))
    }

    /// Cached markup for `term`, or `None` on a miss.
    pub async fn load(&self, term: &str) -> Result<Option<String>> {
        let path = self.path_for(term);
        match tokio::fs::read_to_string(&path).await {
            Ok(markup) => {
                debug!(?path, "result cache hit");
                Ok(Some(markup))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "result cache miss");
                Ok(None)
            }
            Err(e) => Err(RegisterError::io(path, e)),
        }
    }

    /// Store markup for `term`, replacing any previous entry.
    pub async fn store(&self, term: &str, markup: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| RegisterError::io(&self.dir, e))?;

        let target = self.path_for(term);
        let temp = self
            .dir
            .join(format!("{}.{}.tmp", cache_key(term), uuid::Uuid::now_v7()));

        // Per-call temp file: neither readers nor concurrent writers see a partial page
        tokio::fs::write(&temp, markup)
            .await
            .map_err(|e| RegisterError::io(&temp, e))?;
        tokio::fs::rename(&temp, &target)
            .await
            .map_err(|e| RegisterError::io(&target, e))?;

        debug!(path = ?target, bytes = markup.len(), "result page cached");
        Ok(target)
    }
}

/// Cache key for a search term: a readable slug plus a short hash of the exact term.
pub fn cache_key(term: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(term.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    format!("{}-{}", slugify(term), &hash[..KEY_HASH_LEN])
}

/// Lowercase, alphanumeric-and-dash form of a search term.
pub fn slugify(term: &str) -> String {
    let slug = term
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() { "search".to_string() } else { slug }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("hr-cache-test-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn slugify_terms() {
        assert_eq!(slugify("European EPC Competence Center"), "european-epc-competence-center");
        assert_eq!(slugify("Müller & Söhne GmbH"), "müller-söhne-gmbh");
        assert_eq!(slugify("  /// "), "search");
    }

    #[test]
    fn distinct_terms_with_same_slug_get_distinct_keys() {
        assert_ne!(cache_key("a/b"), cache_key("a b"));
        assert!(cache_key("a/b").starts_with("a-b-"));
        assert_eq!(cache_key("GASAG"), cache_key("GASAG"));
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = ResultCache::new(temp_dir());
        assert!(cache.load("gasag").await.unwrap().is_none());

        let path = cache.store("gasag", "<html>cached</html>").await.unwrap();
        assert!(path.starts_with(cache.dir()));
        assert_eq!(
            cache.load("gasag").await.unwrap().as_deref(),
            Some("<html>cached</html>")
        );

        cache.store("gasag", "<html>fresh</html>").await.unwrap();
        assert_eq!(
            cache.load("gasag").await.unwrap().as_deref(),
            Some("<html>fresh</html>")
        );

        std::fs::remove_dir_all(cache.dir()).ok();
    }

    #[tokio::test]
    async fn concurrent_stores_leave_one_whole_page() {
        let cache = ResultCache::new(temp_dir());
        let first = "a".repeat(256 * 1024);
        let second = "b".repeat(256 * 1024);

        let (a, b) = tokio::join!(cache.store("gasag", &first), cache.store("gasag", &second));
        assert_eq!(a.unwrap(), b.unwrap());

        let stored = cache.load("gasag").await.unwrap().unwrap();
        assert!(stored == first || stored == second);

        let entries: Vec<_> = std::fs::read_dir(cache.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1, "temp files must not be left behind");

        std::fs::remove_dir_all(cache.dir()).ok();
    }
}

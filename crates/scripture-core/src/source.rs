//! Corpus sources
//!
//! A [`CorpusSource`] yields the raw, line-oriented scripture text. The
//! HTTP source is the production path; [`StaticSource`] serves fixture text;
//! [`CachedSource`] keeps a copy of another source's text on local disk so
//! repeated runs skip the download.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::SourceError;

/// Provider of raw corpus text
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Fetch the complete source text
    async fn fetch(&self) -> Result<String, SourceError>;

    /// Human-readable description used in logs
    fn describe(&self) -> String;

    /// File-name-safe key identifying this source's content in a disk cache
    fn cache_key(&self) -> String {
        sanitize_key(&self.describe())
    }

    /// Fetch from the origin, skipping any locally held copy. A failed
    /// refresh leaves local copies untouched.
    async fn refresh(&self) -> Result<String, SourceError> {
        self.fetch().await
    }
}

/// Downloads the corpus over HTTP GET
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source with a bounded request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CorpusSource for HttpSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        info!("Downloading scripture corpus from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        debug!("Downloaded {} bytes", text.len());
        Ok(text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves text held in memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    text: String,
}

impl StaticSource {
    pub fn new(name: &str, text: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl CorpusSource for StaticSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        if self.text.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        format!("static:{}", self.name)
    }
}

/// Wraps another source with a plain-text copy on local disk.
///
/// A cached file is served when present; otherwise the inner source is
/// fetched and its text written to the cache. Cache I/O problems are logged
/// and never turn a successful fetch into a failure.
pub struct CachedSource {
    inner: Box<dyn CorpusSource>,
    dir: PathBuf,
}

impl CachedSource {
    pub fn new(inner: Box<dyn CorpusSource>, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    /// Location of the cached text for the wrapped source
    pub fn cache_path(&self) -> PathBuf {
        self.dir.join(format!("{}.txt", self.inner.cache_key()))
    }

    async fn read_cache(path: &Path) -> Option<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Ignoring unreadable corpus cache {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn write_cache(&self, path: &Path, text: &str) {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!("Cannot create cache directory {}: {}", self.dir.display(), e);
            return;
        }
        match tokio::fs::write(path, text).await {
            Ok(()) => debug!("Cached corpus text at {}", path.display()),
            Err(e) => warn!("Failed to write corpus cache {}: {}", path.display(), e),
        }
    }
}

#[async_trait]
impl CorpusSource for CachedSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let path = self.cache_path();
        if let Some(text) = Self::read_cache(&path).await {
            info!("Using cached scripture corpus at {}", path.display());
            return Ok(text);
        }

        let text = self.inner.fetch().await?;
        self.write_cache(&path, &text).await;
        Ok(text)
    }

    fn describe(&self) -> String {
        format!("{} (cached in {})", self.inner.describe(), self.dir.display())
    }

    fn cache_key(&self) -> String {
        self.inner.cache_key()
    }

    async fn refresh(&self) -> Result<String, SourceError> {
        let text = self.inner.refresh().await?;
        self.write_cache(&self.cache_path(), &text).await;
        Ok(text)
    }
}

fn sanitize_key(raw: &str) -> String {
    let key: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let key = key.trim_matches('_').to_string();
    if key.is_empty() {
        "corpus".to_string()
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        text: Option<String>,
    }

    #[async_trait]
    impl CorpusSource for CountingSource {
        async fn fetch(&self) -> Result<String, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.text.clone().ok_or(SourceError::Status(503))
        }

        fn describe(&self) -> String {
            "https://example.org/bible.txt".to_string()
        }
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(
            sanitize_key("https://bereanbible.com/bsb.txt"),
            "https___bereanbible_com_bsb_txt"
        );
        assert_eq!(sanitize_key("///"), "corpus");
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new("fixture", "Genesis 1:1 In the beginning.");
        assert_eq!(source.fetch().await.unwrap(), "Genesis 1:1 In the beginning.");
        assert_eq!(source.describe(), "static:fixture");

        let empty = StaticSource::new("empty", "  \n");
        assert!(matches!(empty.fetch().await, Err(SourceError::Empty)));
    }

    #[tokio::test]
    async fn test_cached_source_fetches_once() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = CountingSource {
            calls: Arc::clone(&calls),
            text: Some("John 3:16 For God so loved the world.".to_string()),
        };
        let cached = CachedSource::new(Box::new(inner), dir.path());

        let first = cached.fetch().await.unwrap();
        let second = cached.fetch().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cached.cache_path().exists());
        assert_eq!(
            cached.cache_path().file_name().unwrap().to_str().unwrap(),
            "https___example_org_bible_txt.txt"
        );
    }

    #[tokio::test]
    async fn test_cached_source_refresh_goes_to_origin() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = CountingSource {
            calls: Arc::clone(&calls),
            text: Some("John 3:16 For God so loved the world.".to_string()),
        };
        let cached = CachedSource::new(Box::new(inner), dir.path());

        cached.fetch().await.unwrap();
        cached.refresh().await.unwrap();
        cached.fetch().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_copy() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("https___example_org_bible_txt.txt"),
            "John 3:16 For God so loved the world.",
        )
        .unwrap();
        let inner = CountingSource {
            calls: Arc::new(AtomicUsize::new(0)),
            text: None,
        };
        let cached = CachedSource::new(Box::new(inner), dir.path());

        assert!(matches!(cached.refresh().await, Err(SourceError::Status(503))));
        assert!(cached.cache_path().exists());
        assert_eq!(
            cached.fetch().await.unwrap(),
            "John 3:16 For God so loved the world."
        );
    }

    #[tokio::test]
    async fn test_cached_source_propagates_inner_failure() {
        let dir = TempDir::new().unwrap();
        let inner = CountingSource {
            calls: Arc::new(AtomicUsize::new(0)),
            text: None,
        };
        let cached = CachedSource::new(Box::new(inner), dir.path().join("nested"));

        assert!(matches!(cached.fetch().await, Err(SourceError::Status(503))));
        assert!(!cached.cache_path().exists());
    }

    #[test]
    fn test_http_source_construction() {
        let source = HttpSource::new("https://bereanbible.com/bsb.txt", Duration::from_secs(30))
            .unwrap();
        assert_eq!(source.url(), "https://bereanbible.com/bsb.txt");
        assert_eq!(source.describe(), "https://bereanbible.com/bsb.txt");
    }
}

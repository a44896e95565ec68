//! Configuration for the scripture corpus
//!
//! Handles the download location, fetch timeout and optional disk cache.

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::source::{CachedSource, CorpusSource, HttpSource};

/// Berean Standard Bible plain-text edition
pub const DEFAULT_SOURCE_URL: &str = "https://bereanbible.com/bsb.txt";

/// Default bound on the corpus download
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Corpus configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptureConfig {
    /// URL of the plain-text corpus
    pub source_url: String,
    /// Timeout for the whole download
    pub timeout: Duration,
    /// Directory for the downloaded text (no caching when unset)
    pub cache_dir: Option<PathBuf>,
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_dir: None,
        }
    }
}

impl ScriptureConfig {
    /// Use a different corpus URL
    pub fn with_source_url(mut self, url: &str) -> Self {
        self.source_url = url.to_string();
        self
    }

    /// Set the download timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Cache the downloaded text in `dir`
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Load configuration from environment variables
    ///
    /// Expected variables (all optional):
    /// - SCRIPTURE_SOURCE_URL: corpus URL
    /// - SCRIPTURE_FETCH_TIMEOUT_SECS: download timeout in whole seconds
    /// - SCRIPTURE_CACHE_DIR: directory for the cached corpus text
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("SCRIPTURE_SOURCE_URL") {
            let url = url.trim();
            if url.is_empty() {
                return Err(anyhow!("SCRIPTURE_SOURCE_URL is set but empty"));
            }
            config.source_url = url.to_string();
        }

        if let Some(raw) = lookup("SCRIPTURE_FETCH_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid SCRIPTURE_FETCH_TIMEOUT_SECS: {}", raw))?;
            if secs == 0 {
                return Err(anyhow!("SCRIPTURE_FETCH_TIMEOUT_SECS must be positive"));
            }
            config.timeout = Duration::from_secs(secs);
        }

        config.cache_dir = lookup("SCRIPTURE_CACHE_DIR")
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    /// Build the corpus source described by this configuration
    pub fn build_source(&self) -> Result<Box<dyn CorpusSource>> {
        let http = HttpSource::new(&self.source_url, self.timeout)?;

        match &self.cache_dir {
            Some(dir) => Ok(Box::new(CachedSource::new(Box::new(http), dir.clone()))),
            None => Ok(Box::new(http)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ScriptureConfig::default();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_builder_helpers() {
        let config = ScriptureConfig::default()
            .with_source_url("http://localhost:8080/bible.txt")
            .with_timeout(Duration::from_secs(5))
            .with_cache_dir("/tmp/scripture");
        assert_eq!(config.source_url, "http://localhost:8080/bible.txt");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/scripture")));
    }

    #[test]
    fn test_env_overrides() {
        let config = ScriptureConfig::from_lookup(lookup_from(&[
            ("SCRIPTURE_SOURCE_URL", "http://mirror.local/bsb.txt"),
            ("SCRIPTURE_FETCH_TIMEOUT_SECS", "12"),
            ("SCRIPTURE_CACHE_DIR", "/var/cache/scripture"),
        ]))
        .unwrap();
        assert_eq!(config.source_url, "http://mirror.local/bsb.txt");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/scripture")));
    }

    #[test]
    fn test_env_defaults_when_unset() {
        let config = ScriptureConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ScriptureConfig::default());
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(ScriptureConfig::from_lookup(lookup_from(&[(
            "SCRIPTURE_FETCH_TIMEOUT_SECS",
            "soon"
        )]))
        .is_err());
        assert!(ScriptureConfig::from_lookup(lookup_from(&[(
            "SCRIPTURE_FETCH_TIMEOUT_SECS",
            "0"
        )]))
        .is_err());
    }

    #[test]
    fn test_build_source_with_cache() {
        let config = ScriptureConfig::default().with_cache_dir("/tmp/scripture-cache");
        let source = config.build_source().unwrap();
        assert!(source.describe().contains("bereanbible.com"));
        assert!(source.describe().contains("/tmp/scripture-cache"));
    }
}

//! Scripture service
//!
//! Owns the corpus source and the loaded corpus. Construct one per process and
//! share it (behind an `Arc`) with every consumer.
//!
//! Loading is single-flight: the corpus slot sits behind an async mutex, so
//! concurrent first callers wait on one fetch and one parse instead of racing.
//! A failed load leaves the slot empty and the next caller tries again; a
//! failed reload keeps whatever corpus was already loaded.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::ScriptureConfig;
use crate::corpus::Corpus;
use crate::error::ScriptureError;
use crate::parser::parse_corpus;
use crate::query::{
    self, BookList, ChapterContext, KeywordResult, Passage, SearchResponse, SemanticResult,
    Translations,
};
use crate::search::VerseHit;
use crate::source::CorpusSource;

pub struct ScriptureService {
    source: Option<Box<dyn CorpusSource>>,
    corpus: Mutex<Option<Arc<Corpus>>>,
}

impl ScriptureService {
    /// Service that loads lazily from `source`
    pub fn new(source: Box<dyn CorpusSource>) -> Self {
        Self {
            source: Some(source),
            corpus: Mutex::new(None),
        }
    }

    /// Service over the source described by `config`
    pub fn from_config(config: &ScriptureConfig) -> anyhow::Result<Self> {
        Ok(Self::new(config.build_source()?))
    }

    /// Service over an already parsed corpus. `reload` keeps this corpus.
    pub fn from_corpus(corpus: Corpus) -> Self {
        Self {
            source: None,
            corpus: Mutex::new(Some(Arc::new(corpus))),
        }
    }

    /// Load the corpus if it is not loaded yet. Returns whether a corpus is available.
    pub async fn load(&self) -> bool {
        self.ensure_loaded().await.is_some()
    }

    /// Fetch the corpus again from its origin and swap it in.
    ///
    /// The current corpus and any cached source text are replaced only after
    /// the new text has been fetched and parsed. On failure both are kept and
    /// `false` is returned.
    pub async fn reload(&self) -> bool {
        let mut slot = self.corpus.lock().await;

        let Some(source) = self.source.as_deref() else {
            warn!("No corpus source configured; keeping the current corpus");
            return slot.is_some();
        };

        match load_from(source, Fetch::Refresh).await {
            Some(corpus) => {
                *slot = Some(corpus);
                true
            }
            None => {
                if slot.is_some() {
                    warn!("Reload of {} failed; keeping the current corpus", source.describe());
                }
                false
            }
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.corpus.lock().await.is_some()
    }

    /// The loaded corpus, loading it on first use
    pub async fn corpus(&self) -> Result<Arc<Corpus>, ScriptureError> {
        self.ensure_loaded()
            .await
            .ok_or(ScriptureError::CorpusUnavailable)
    }

    async fn ensure_loaded(&self) -> Option<Arc<Corpus>> {
        let mut slot = self.corpus.lock().await;
        if let Some(corpus) = slot.as_ref() {
            return Some(Arc::clone(corpus));
        }

        let source = self.source.as_deref()?;
        *slot = load_from(source, Fetch::Cached).await;
        slot.clone()
    }

    pub async fn get_passage(
        &self,
        book: &str,
        chapter: u32,
        begin_verse: Option<u32>,
        end_verse: Option<u32>,
    ) -> Result<Passage, ScriptureError> {
        let corpus = self.corpus().await?;
        query::get_passage(&corpus, book, chapter, begin_verse, end_verse)
    }

    pub async fn get_context(&self, book: &str, chapter: u32) -> Result<ChapterContext, ScriptureError> {
        let corpus = self.corpus().await?;
        query::get_context(&corpus, book, chapter)
    }

    pub async fn list_books(&self) -> Result<BookList, ScriptureError> {
        let corpus = self.corpus().await?;
        Ok(query::list_books(&corpus))
    }

    /// Keyword search; an unavailable corpus yields no results
    pub async fn search_keyword(
        &self,
        query: &str,
        book: Option<&str>,
        n_results: usize,
    ) -> SearchResponse<KeywordResult> {
        match self.corpus().await {
            Ok(corpus) => query::search_keyword(&corpus, query, book, n_results),
            Err(_) => SearchResponse::empty(query),
        }
    }

    /// Semantic search; an unavailable corpus yields no results
    pub async fn search_semantic(
        &self,
        query: &str,
        book: Option<&str>,
        n_results: usize,
    ) -> SearchResponse<SemanticResult> {
        match self.corpus().await {
            Ok(corpus) => query::search_semantic(&corpus, query, book, n_results),
            Err(_) => SearchResponse::empty(query),
        }
    }

    /// Verse-level substring scan; an unavailable corpus yields no hits
    pub async fn search_text(&self, query: &str, max_results: usize) -> Vec<VerseHit> {
        match self.corpus().await {
            Ok(corpus) => corpus.search_text(query, max_results),
            Err(_) => Vec::new(),
        }
    }

    pub fn list_translations(&self) -> Translations {
        query::list_translations()
    }
}

/// Fetch, parse and index. Failures are logged and reported as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fetch {
    /// Local copies are acceptable
    Cached,
    /// Go to the origin
    Refresh,
}

async fn load_from(source: &dyn CorpusSource, fetch: Fetch) -> Option<Arc<Corpus>> {
    info!("Loading scripture corpus from {}", source.describe());

    let fetched = match fetch {
        Fetch::Cached => source.fetch().await,
        Fetch::Refresh => source.refresh().await,
    };
    let text = match fetched {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to fetch scripture corpus: {}", e);
            return None;
        }
    };

    let corpus = match tokio::task::spawn_blocking(move || parse_corpus(&text)).await {
        Ok(corpus) => corpus,
        Err(e) => {
            error!("Corpus parse task failed: {}", e);
            return None;
        }
    };

    if corpus.is_empty() {
        warn!(
            "No verses found in corpus ({} lines read, {} malformed)",
            corpus.report().lines_read,
            corpus.report().malformed_lines
        );
        return None;
    }

    info!(
        "Loaded {} verses in {} chapters across {} books ({} lines skipped)",
        corpus.verse_count(),
        corpus.chapter_count(),
        corpus.book_count(),
        corpus.report().skipped_lines()
    );
    Some(Arc::new(corpus))
}

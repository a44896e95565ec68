//! Scripture Core - corpus parsing, lexical and semantic search over scripture text
//!
//! This crate provides:
//! - Book-name normalization (abbreviations to canonical names)
//! - A line parser for plain-text verse sources and the resulting corpus
//! - Keyword/phrase search ranked by occurrence count
//! - TF-IDF cosine-similarity search at chapter granularity
//! - A query façade, a single-flight loading service and agent tool dispatch
//! - Configuration and corpus sources (HTTP, in-memory, disk cache)

pub mod config;
pub mod corpus;
pub mod error;
pub mod parser;
pub mod query;
pub mod reference;
pub mod search;
pub mod service;
pub mod source;
pub mod tools;

// Re-export commonly used types
pub use config::ScriptureConfig;
pub use corpus::{Book, Chapter, ChapterRef, Corpus, CorpusBuilder, Verse};
pub use error::{ScriptureError, SourceError};
pub use parser::{parse_corpus, ParseReport};
pub use query::{
    BookList, ChapterContext, KeywordResult, Passage, SearchResponse, SemanticResult, Translations,
};
pub use reference::normalize_book;
pub use search::{KeywordMatch, SemanticMatch, VerseHit};
pub use service::ScriptureService;
pub use source::{CachedSource, CorpusSource, HttpSource, StaticSource};
pub use tools::{execute_tool, tool_definitions, ToolDefinition};

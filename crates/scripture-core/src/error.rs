//! Error types for corpus loading and scripture queries

use thiserror::Error;

/// Failures while fetching the raw corpus text.
///
/// These never cross the loader boundary: the service logs them and reports
/// an unsuccessful load instead.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Corpus source returned no text")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Query-level failures, rendered directly to CLI and agent callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptureError {
    #[error("Chapter not found: {book} {chapter}")]
    ChapterNotFound { book: String, chapter: u32 },

    #[error("Verse range not found: {book} {chapter}:{start}-{end}")]
    VerseRangeNotFound {
        book: String,
        chapter: u32,
        start: u32,
        end: u32,
    },

    #[error("Scripture corpus is not available")]
    CorpusUnavailable,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let err = ScriptureError::ChapterNotFound {
            book: "John".to_string(),
            chapter: 9999,
        };
        assert_eq!(err.to_string(), "Chapter not found: John 9999");

        let err = ScriptureError::VerseRangeNotFound {
            book: "John".to_string(),
            chapter: 3,
            start: 9999,
            end: 9999,
        };
        assert_eq!(err.to_string(), "Verse range not found: John 3:9999-9999");
    }
}

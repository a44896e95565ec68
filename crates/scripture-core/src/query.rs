//! Query façade
//!
//! Uniform request/response contract shared by the CLI and the agent tools.
//! Every operation here is a pure function of a loaded [`Corpus`]; the
//! service layer decides what happens when no corpus is available.

use serde::{Deserialize, Serialize};

use crate::corpus::{Chapter, Corpus};
use crate::error::ScriptureError;
use crate::reference::normalize_book;
use crate::search::{KeywordMatch, SemanticMatch};

/// Sentences of chapter text shown in a semantic preview
const SEMANTIC_PREVIEW_PIECES: usize = 3;

/// A chapter, optionally with a highlighted verse range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub book: String,
    pub chapter: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlighted_text: Option<String>,
    /// Full chapter text, even when a range was requested
    pub text: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Text of a neighbouring chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborChapter {
    pub chapter: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<NeighborChapter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NeighborChapter>,
}

/// A chapter with the chapters around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterContext {
    pub book: String,
    pub chapter: u32,
    pub text: String,
    pub context: Neighbors,
    pub reference: String,
}

/// Search results echoed with their query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub query: String,
    pub results: Vec<T>,
    pub count: usize,
}

impl<T> SearchResponse<T> {
    pub fn new(query: &str, results: Vec<T>) -> Self {
        Self {
            query: query.to_string(),
            count: results.len(),
            results,
        }
    }

    /// Response for a query that could not be run
    pub fn empty(query: &str) -> Self {
        Self::new(query, Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordResult {
    pub book: String,
    pub chapter: u32,
    pub match_count: usize,
    pub text: String,
    pub preview: String,
    pub reference: String,
}

impl From<KeywordMatch> for KeywordResult {
    fn from(m: KeywordMatch) -> Self {
        let preview = m.preview();
        let reference = chapter_reference(&m.book, m.chapter);
        Self {
            book: m.book,
            chapter: m.chapter,
            match_count: m.match_count,
            text: m.text,
            preview,
            reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticResult {
    pub book: String,
    pub chapter: u32,
    /// Cosine similarity rounded to four decimals
    pub similarity: f64,
    pub text: String,
    pub preview: String,
    pub reference: String,
}

impl From<SemanticMatch> for SemanticResult {
    fn from(m: SemanticMatch) -> Self {
        let preview = semantic_preview(&m.text);
        let reference = chapter_reference(&m.book, m.chapter);
        Self {
            book: m.book,
            chapter: m.chapter,
            similarity: round4(m.similarity),
            text: m.text,
            preview,
            reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translations {
    pub translations: Vec<Translation>,
    pub count: usize,
    pub note: String,
}

fn chapter_reference(book: &str, chapter: u32) -> String {
    format!("{} {}", book, chapter)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// First three `.`-separated pieces of the chapter, with an ellipsis when
/// the text was cut.
fn semantic_preview(text: &str) -> String {
    let pieces: Vec<&str> = text.trim_end().split('.').take(SEMANTIC_PREVIEW_PIECES).collect();
    let mut preview = pieces.join(". ");
    if pieces.len() >= SEMANTIC_PREVIEW_PIECES {
        preview.push_str("...");
    }
    preview
}

/// Fetch a full chapter, optionally highlighting `begin..=end`.
///
/// A range given only by `end` starts at verse 1; one given only by `begin`
/// covers that single verse. Verse numbers start at 1, so a bound of 0 counts
/// as absent. Highlighted verses are listed in verse-number
/// order as `"<n>: <text>"`.
pub fn get_passage(
    corpus: &Corpus,
    book: &str,
    chapter: u32,
    begin_verse: Option<u32>,
    end_verse: Option<u32>,
) -> Result<Passage, ScriptureError> {
    let (name, found) = lookup_chapter(corpus, book, chapter)?;
    let text = found.text().to_string();
    let begin_verse = begin_verse.filter(|v| *v > 0);
    let end_verse = end_verse.filter(|v| *v > 0);

    if begin_verse.is_none() && end_verse.is_none() {
        return Ok(Passage {
            reference: chapter_reference(&name, chapter),
            book: name,
            chapter,
            verse_range: None,
            highlighted_text: None,
            text,
            note: None,
        });
    }

    let start = begin_verse.unwrap_or(1);
    let end = end_verse.unwrap_or(start);

    let mut selected: Vec<_> = found
        .verses()
        .iter()
        .filter(|v| v.number >= start && v.number <= end)
        .collect();
    if selected.is_empty() {
        return Err(ScriptureError::VerseRangeNotFound {
            book: name,
            chapter,
            start,
            end,
        });
    }
    selected.sort_by_key(|v| v.number);

    let highlighted = selected
        .iter()
        .map(|v| format!("{}: {}", v.number, v.text))
        .collect::<Vec<_>>()
        .join(" ");
    let range = format!("{}-{}", start, end);

    Ok(Passage {
        reference: format!("{} {}:{}", name, chapter, range),
        note: Some(format!("Highlighted verses {}", range)),
        book: name,
        chapter,
        verse_range: Some(range),
        highlighted_text: Some(highlighted),
        text,
    })
}

/// A chapter plus the previous and next chapters of the same book, when they exist
pub fn get_context(corpus: &Corpus, book: &str, chapter: u32) -> Result<ChapterContext, ScriptureError> {
    let (name, found) = lookup_chapter(corpus, book, chapter)?;

    let neighbor = |number: Option<u32>| {
        let number = number.filter(|n| *n >= 1)?;
        corpus.get_chapter(&name, number).map(|c| NeighborChapter {
            chapter: number,
            text: c.text().to_string(),
        })
    };

    Ok(ChapterContext {
        text: found.text().to_string(),
        context: Neighbors {
            previous: neighbor(chapter.checked_sub(1)),
            next: neighbor(chapter.checked_add(1)),
        },
        reference: chapter_reference(&name, chapter),
        book: name,
        chapter,
    })
}

fn lookup_chapter<'a>(
    corpus: &'a Corpus,
    book: &str,
    chapter: u32,
) -> Result<(String, &'a Chapter), ScriptureError> {
    let name = normalize_book(book);
    match corpus.get_chapter(&name, chapter) {
        Some(found) => Ok((name, found)),
        None => Err(ScriptureError::ChapterNotFound {
            book: name,
            chapter,
        }),
    }
}

/// Canonical book names in parse order
pub fn list_books(corpus: &Corpus) -> BookList {
    let books = corpus.list_books();
    BookList {
        count: books.len(),
        books,
    }
}

/// Occurrence-ranked chapters for a keyword or phrase query
pub fn search_keyword(
    corpus: &Corpus,
    query: &str,
    book: Option<&str>,
    n_results: usize,
) -> SearchResponse<KeywordResult> {
    let results = corpus
        .search_keyword(query, book, n_results)
        .into_iter()
        .map(KeywordResult::from)
        .collect();
    SearchResponse::new(query, results)
}

/// Similarity-ranked chapters for a natural-language query
pub fn search_semantic(
    corpus: &Corpus,
    query: &str,
    book: Option<&str>,
    n_results: usize,
) -> SearchResponse<SemanticResult> {
    let results = corpus
        .search_semantic(query, book, n_results)
        .into_iter()
        .map(SemanticResult::from)
        .collect();
    SearchResponse::new(query, results)
}

/// Translations offered by this corpus (the Berean Standard Bible only)
pub fn list_translations() -> Translations {
    let translations = vec![Translation {
        id: "BSB".to_string(),
        name: "Berean Standard Bible".to_string(),
        description: "Modern English translation with strong textual basis".to_string(),
        language: "English".to_string(),
    }];
    Translations {
        count: translations.len(),
        translations,
        note: "Only the BSB translation is available".to_string(),
    }
}

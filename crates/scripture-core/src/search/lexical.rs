//! Lexical search over verse text
//!
//! Two entry points:
//! - [`search_text`]: case-insensitive substring scan returning the first
//!   matching verses in traversal order (non-exhaustive, stops at the limit)
//! - [`search_keyword`]: occurrence counting aggregated per chapter and
//!   ranked by total count
//!
//! # Query syntax
//!
//! A keyword query containing double-quoted groups is a phrase query: each
//! group is counted as an exact, case-insensitive substring and anything
//! outside the quotes is ignored. Otherwise the query is split into words and
//! every word is counted independently on word boundaries, so
//! `king Philistines` matches verses with either word while
//! `"king of the Philistines"` only matches the exact phrase.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::corpus::{ChapterRef, Corpus, Verse};
use crate::reference::normalize_book;
use crate::search::capped;

/// Number of matching verses shown in a keyword preview
const PREVIEW_VERSES: usize = 3;
/// Characters of each verse shown in a keyword preview
const PREVIEW_CHARS: usize = 50;

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r#""([^"]+)""#).unwrap();
    static ref QUERY_WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// A verse returned by [`search_text`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseHit {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

/// Scan verses in traversal order and return the first `max_results` whose
/// text contains `query` (case-insensitive).
pub fn search_text(corpus: &Corpus, query: &str, max_results: usize) -> Vec<VerseHit> {
    let needle = query.to_lowercase();
    let mut hits = Vec::new();
    if max_results == 0 {
        return hits;
    }

    for (_, book, chapter) in corpus.chapters() {
        for verse in chapter.verses() {
            if verse.text.to_lowercase().contains(&needle) {
                hits.push(VerseHit {
                    book: book.name().to_string(),
                    chapter: chapter.number(),
                    verse: verse.number,
                    text: verse.text.clone(),
                });
                if hits.len() >= max_results {
                    return hits;
                }
            }
        }
    }

    hits
}

/// Parsed keyword query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordQuery {
    /// Exact phrases taken from double-quoted groups
    Phrases(Vec<String>),
    /// Individual lowercase words, each matched on word boundaries
    Words(Vec<String>),
}

impl KeywordQuery {
    pub fn parse(query: &str) -> Self {
        let phrases: Vec<String> = QUOTED
            .captures_iter(query)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().to_lowercase())
            .filter(|phrase| !phrase.trim().is_empty())
            .collect();

        if !phrases.is_empty() {
            return KeywordQuery::Phrases(phrases);
        }

        let lower = query.to_lowercase();
        KeywordQuery::Words(
            QUERY_WORD
                .find_iter(&lower)
                .map(|m| m.as_str().to_string())
                .collect(),
        )
    }

    pub fn terms(&self) -> &[String] {
        match self {
            KeywordQuery::Phrases(terms) | KeywordQuery::Words(terms) => terms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms().is_empty()
    }

    fn matchers(&self) -> Vec<TermMatcher> {
        match self {
            KeywordQuery::Phrases(phrases) => phrases
                .iter()
                .map(|p| TermMatcher::Phrase(p.clone()))
                .collect(),
            KeywordQuery::Words(words) => words
                .iter()
                .filter_map(|word| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(word)))
                        .ok()
                        .map(|re| TermMatcher::Word {
                            word: word.clone(),
                            pattern: re,
                        })
                })
                .collect(),
        }
    }
}

enum TermMatcher {
    Phrase(String),
    Word { word: String, pattern: Regex },
}

impl TermMatcher {
    /// Occurrences in an already-lowercased verse
    fn count(&self, verse_lower: &str) -> usize {
        match self {
            TermMatcher::Phrase(phrase) => verse_lower.matches(phrase.as_str()).count(),
            TermMatcher::Word { word, pattern } => {
                if !verse_lower.contains(word.as_str()) {
                    return 0;
                }
                pattern.find_iter(verse_lower).count()
            }
        }
    }
}

/// A chapter ranked by keyword occurrences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub book: String,
    pub chapter: u32,
    pub match_count: usize,
    /// Full chapter text
    pub text: String,
    /// Matching verses in chapter order
    pub verses: Vec<Verse>,
}

impl KeywordMatch {
    /// `"<n>: <first 50 chars>..."` for the first three matching verses
    pub fn preview(&self) -> String {
        self.verses
            .iter()
            .take(PREVIEW_VERSES)
            .map(|v| {
                let head: String = v.text.chars().take(PREVIEW_CHARS).collect();
                format!("{}: {}...", v.number, head)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Rank chapters by total keyword occurrences.
///
/// `book` restricts results to one canonical book (abbreviations accepted);
/// an unknown book simply matches nothing. At most `min(max_results, 20)`
/// chapters are returned, highest count first, ties in corpus order.
pub fn search_keyword(
    corpus: &Corpus,
    query: &str,
    book: Option<&str>,
    max_results: usize,
) -> Vec<KeywordMatch> {
    let limit = capped(max_results);
    let parsed = KeywordQuery::parse(query);
    if limit == 0 || parsed.is_empty() {
        return Vec::new();
    }

    let matchers = parsed.matchers();
    let book_filter = book.map(normalize_book);

    let mut ranked: Vec<(ChapterRef, KeywordMatch)> = Vec::new();
    let mut slots: HashMap<ChapterRef, usize> = HashMap::new();

    for (chapter_ref, b, chapter) in corpus.chapters() {
        if let Some(filter) = &book_filter {
            if b.name() != filter.as_str() {
                continue;
            }
        }

        for verse in chapter.verses() {
            let lower = verse.text.to_lowercase();
            let count: usize = matchers.iter().map(|m| m.count(&lower)).sum();
            if count == 0 {
                continue;
            }

            let slot = *slots.entry(chapter_ref).or_insert_with(|| {
                ranked.push((
                    chapter_ref,
                    KeywordMatch {
                        book: b.name().to_string(),
                        chapter: chapter.number(),
                        match_count: 0,
                        text: chapter.text().to_string(),
                        verses: Vec::new(),
                    },
                ));
                ranked.len() - 1
            });

            let entry = &mut ranked[slot].1;
            entry.match_count += count;
            entry.verses.push(verse.clone());
        }
    }

    ranked.sort_by(|(a_ref, a), (b_ref, b)| {
        b.match_count
            .cmp(&a.match_count)
            .then_with(|| a_ref.cmp(b_ref))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(_, m)| m)
        .collect()
}

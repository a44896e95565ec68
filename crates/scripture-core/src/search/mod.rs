//! Search module - lexical and semantic search over the parsed corpus
//!
//! This module provides:
//! - Verse-level substring scanning and chapter-level keyword ranking
//! - A TF-IDF vector space model with cosine similarity ranking
//! - The tokenizer and result caps shared by both

pub mod lexical;
pub mod semantic;

pub use lexical::{KeywordMatch, KeywordQuery, VerseHit};
pub use semantic::{cosine_similarity, SemanticIndex, SemanticMatch, SIMILARITY_FLOOR};

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Hard cap on chapter-level results, regardless of what the caller asks for
pub const MAX_RESULTS: usize = 20;

/// Words ignored by the semantic tokenizer
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "of", "to", "in", "a", "is", "that", "it", "with", "as", "for", "was", "on",
    "be", "at", "this", "by", "i", "have", "or", "an", "he", "from", "they", "we", "say", "her",
    "she", "will", "my", "one", "all", "would", "there", "their", "what", "so", "up", "out",
    "if", "about", "who", "get", "which", "go", "me", "when", "make", "can", "like", "time",
    "no", "just", "him", "know", "take", "people", "into", "year", "your", "good", "some",
    "could", "them", "see", "other", "than", "then", "now", "look", "only", "come", "its",
    "over", "think", "also", "back", "after", "use", "two", "how", "our", "work", "first",
    "well", "way", "even", "new", "want", "because", "any", "these", "give", "day", "most",
    "us",
];

/// Tokens this short or shorter are dropped
const MIN_TOKEN_LEN: usize = 3;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\b[a-z]+\b").unwrap();
    static ref STOP_SET: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();
}

/// Split text into lowercase alphabetic tokens, dropping stop words and
/// tokens shorter than three letters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|word| word.len() >= MIN_TOKEN_LEN && !STOP_SET.contains(word))
        .map(str::to_string)
        .collect()
}

/// Clamp a requested result count to [`MAX_RESULTS`]
pub fn capped(requested: usize) -> usize {
    requested.min(MAX_RESULTS)
}

//! TF-IDF vector space search over chapters
//!
//! Every chapter is a document. The index is built once from the whole
//! corpus and is read-only afterwards.
//!
//! # Weighting
//!
//! ```text
//! idf(w)    = ln(total_chapters / chapters_containing(w))   (0 when w is in no chapter)
//! tf(w, c)  = count(w, c) / total_tokens(c)                 (0 when c has no tokens)
//! weight    = tf * idf
//! ```
//!
//! Each chapter gets a dense vector with one weight per vocabulary word, in
//! lexicographic word order. Queries are tokenized and weighted the same way
//! against the same vocabulary, so out-of-vocabulary words contribute nothing.
//!
//! # Ranking
//!
//! Cosine similarity between the query vector and each chapter vector.
//! Similarities at or below [`SIMILARITY_FLOOR`] are dropped as noise.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::corpus::{ChapterRef, Corpus};
use crate::reference::normalize_book;
use crate::search::{capped, tokenize};

/// Results at or below this similarity are discarded
pub const SIMILARITY_FLOOR: f64 = 0.01;

/// Over-fetch factor applied before a book filter narrows ranked results
const BOOK_FILTER_OVERFETCH: usize = 3;

/// A chapter ranked by semantic similarity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticMatch {
    pub book: String,
    pub chapter: u32,
    pub similarity: f64,
    /// Full chapter text
    pub text: String,
}

#[derive(Debug)]
struct ChapterVector {
    chapter: ChapterRef,
    weights: Vec<f32>,
}

/// Vocabulary, IDF table and per-chapter TF-IDF vectors
#[derive(Debug, Default)]
pub struct SemanticIndex {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    term_ids: HashMap<String, usize>,
    vectors: Vec<ChapterVector>,
}

impl SemanticIndex {
    /// Build the index from chapter texts in traversal order
    pub fn build<'a>(chapters: impl IntoIterator<Item = (ChapterRef, &'a str)>) -> Self {
        let documents: Vec<(ChapterRef, Vec<String>)> = chapters
            .into_iter()
            .map(|(chapter, text)| (chapter, tokenize(text)))
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for (_, tokens) in &documents {
            let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
            for word in unique {
                *document_frequency.entry(word).or_insert(0) += 1;
            }
        }

        let mut vocabulary: Vec<String> =
            document_frequency.keys().map(|w| (*w).to_string()).collect();
        vocabulary.sort();

        let total = documents.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|word| match document_frequency.get(word.as_str()) {
                Some(&df) if df > 0 => (total / df as f64).ln(),
                _ => 0.0,
            })
            .collect();

        let term_ids: HashMap<String, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(id, word)| (word.clone(), id))
            .collect();

        let mut index = Self {
            vocabulary,
            idf,
            term_ids,
            vectors: Vec::with_capacity(documents.len()),
        };

        for (chapter, tokens) in &documents {
            let weights = index.weigh(tokens);
            index.vectors.push(ChapterVector {
                chapter: *chapter,
                weights,
            });
        }

        index
    }

    /// Vocabulary words in vector order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// IDF of a word, 0 for words outside the vocabulary
    pub fn idf(&self, word: &str) -> f64 {
        self.term_ids
            .get(word)
            .map(|&id| self.idf[id])
            .unwrap_or(0.0)
    }

    /// Number of chapter vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Stored vector for a chapter
    pub fn chapter_vector(&self, chapter: ChapterRef) -> Option<&[f32]> {
        self.vectors
            .iter()
            .find(|v| v.chapter == chapter)
            .map(|v| v.weights.as_slice())
    }

    /// TF-IDF vector for arbitrary text against this vocabulary
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        self.weigh(&tokenize(text))
    }

    fn weigh(&self, tokens: &[String]) -> Vec<f32> {
        let mut weights = vec![0.0f32; self.vocabulary.len()];
        if tokens.is_empty() {
            return weights;
        }

        let total = tokens.len() as f64;
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            if let Some(&id) = self.term_ids.get(token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        for (id, count) in counts {
            weights[id] = (count as f64 / total * self.idf[id]) as f32;
        }
        weights
    }

    /// Chapters above the noise floor, most similar first, at most `limit`.
    ///
    /// Equal similarities keep corpus order.
    pub fn rank(&self, query: &str, limit: usize) -> Vec<(ChapterRef, f64)> {
        let query_vector = self.vectorize(query);

        let mut scored: Vec<(ChapterRef, f64)> = self
            .vectors
            .iter()
            .map(|v| (v.chapter, cosine_similarity(&query_vector, &v.weights)))
            .filter(|(_, similarity)| *similarity > SIMILARITY_FLOOR)
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(limit);
        scored
    }

    /// Rank chapters of `corpus` against `query`.
    ///
    /// The result count is capped at 20. With a book filter, three times the
    /// requested count is ranked first and then narrowed to that book, so a
    /// filtered search can return fewer results than asked for.
    pub fn search(
        &self,
        corpus: &Corpus,
        query: &str,
        book: Option<&str>,
        n_results: usize,
    ) -> Vec<SemanticMatch> {
        let limit = capped(n_results);
        if limit == 0 {
            return Vec::new();
        }

        let book_filter = book.map(normalize_book);
        let fetch = if book_filter.is_some() {
            limit * BOOK_FILTER_OVERFETCH
        } else {
            limit
        };

        self.rank(query, fetch)
            .into_iter()
            .filter_map(|(chapter_ref, similarity)| {
                let (b, chapter) = corpus.resolve(chapter_ref)?;
                if let Some(filter) = &book_filter {
                    if b.name() != filter.as_str() {
                        return None;
                    }
                }
                Some(SemanticMatch {
                    book: b.name().to_string(),
                    chapter: chapter.number(),
                    similarity,
                    text: chapter.text().to_string(),
                })
            })
            .take(limit)
            .collect()
    }
}

/// Cosine similarity: dot product over the product of magnitudes.
///
/// Returns 0 when the lengths differ or either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

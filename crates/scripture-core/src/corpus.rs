//! Parsed scripture corpus
//!
//! Verses are grouped into chapters and chapters into books, each kept in the
//! order the source first mentions them. Chapter text is the space-joined
//! concatenation of its verse lines and is never edited on its own. The
//! semantic index is derived once when the corpus is built.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::parser::ParseReport;
use crate::reference::normalize_book;
use crate::search::lexical::{self, KeywordMatch, VerseHit};
use crate::search::semantic::{SemanticIndex, SemanticMatch};

/// A single verse inside a chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

/// Stable address of a chapter: book position in parse order plus chapter number.
///
/// Ordering follows the corpus (book parse order, then chapter number), which
/// is what ranking uses to break score ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterRef {
    pub book: usize,
    pub chapter: u32,
}

/// One chapter of a book
#[derive(Debug, Clone)]
pub struct Chapter {
    number: u32,
    verses: Vec<Verse>,
    positions: HashMap<u32, usize>,
    text: String,
}

impl Chapter {
    fn new(number: u32) -> Self {
        Self {
            number,
            verses: Vec::new(),
            positions: HashMap::new(),
            text: String::new(),
        }
    }

    /// Store a verse, replacing the text of an earlier verse with the same
    /// number. The chapter text always grows. Returns true on replacement.
    fn upsert_verse(&mut self, number: u32, text: &str) -> bool {
        self.text.push_str(text);
        self.text.push(' ');

        if let Some(&idx) = self.positions.get(&number) {
            self.verses[idx].text = text.to_string();
            return true;
        }

        self.positions.insert(number, self.verses.len());
        self.verses.push(Verse {
            number,
            text: text.to_string(),
        });
        false
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Full chapter text (verse texts in source order, each followed by a space)
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Verses in source order
    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn verse(&self, number: u32) -> Option<&str> {
        self.positions
            .get(&number)
            .map(|&idx| self.verses[idx].text.as_str())
    }
}

/// One book with its chapters
#[derive(Debug, Clone)]
pub struct Book {
    name: String,
    chapters: Vec<Chapter>,
    positions: HashMap<u32, usize>,
}

impl Book {
    fn new(name: String) -> Self {
        Self {
            name,
            chapters: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Canonical book name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Chapters in source order
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.positions
            .get(&number)
            .map(|&idx| &self.chapters[idx])
    }

    fn chapter_entry(&mut self, number: u32) -> &mut Chapter {
        let idx = match self.positions.get(&number) {
            Some(&idx) => idx,
            None => {
                self.positions.insert(number, self.chapters.len());
                self.chapters.push(Chapter::new(number));
                self.chapters.len() - 1
            }
        };
        &mut self.chapters[idx]
    }
}

/// Accumulates verses and produces an indexed [`Corpus`]
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    books: Vec<Book>,
    positions: HashMap<String, usize>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a verse. The book name is normalized before it becomes a key.
    ///
    /// Returns true when a verse with the same reference already existed.
    pub fn insert_verse(&mut self, book: &str, chapter: u32, verse: u32, text: &str) -> bool {
        let name = normalize_book(book.trim());
        let idx = match self.positions.get(&name) {
            Some(&idx) => idx,
            None => {
                self.positions.insert(name.clone(), self.books.len());
                self.books.push(Book::new(name));
                self.books.len() - 1
            }
        };

        self.books[idx]
            .chapter_entry(chapter)
            .upsert_verse(verse, text)
    }

    /// Freeze the corpus and build its semantic index
    pub fn build(self, report: ParseReport) -> Corpus {
        let semantic = SemanticIndex::build(self.books.iter().enumerate().flat_map(
            |(book_idx, book)| {
                book.chapters.iter().map(move |chapter| {
                    (
                        ChapterRef {
                            book: book_idx,
                            chapter: chapter.number,
                        },
                        chapter.text.as_str(),
                    )
                })
            },
        ));

        Corpus {
            books: self.books,
            positions: self.positions,
            semantic,
            report,
        }
    }
}

/// Read-only scripture corpus with its derived indices
#[derive(Debug)]
pub struct Corpus {
    books: Vec<Book>,
    positions: HashMap<String, usize>,
    semantic: SemanticIndex,
    report: ParseReport,
}

impl Corpus {
    /// Books in first-seen parse order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Canonical book names in first-seen parse order
    pub fn list_books(&self) -> Vec<String> {
        self.books.iter().map(|b| b.name.clone()).collect()
    }

    /// Look up a book by name or abbreviation
    pub fn book(&self, name: &str) -> Option<&Book> {
        self.book_index(name).map(|idx| &self.books[idx])
    }

    pub(crate) fn book_index(&self, name: &str) -> Option<usize> {
        self.positions.get(&normalize_book(name.trim())).copied()
    }

    pub fn get_chapter(&self, book: &str, chapter: u32) -> Option<&Chapter> {
        self.book(book)?.chapter(chapter)
    }

    pub fn get_verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.get_chapter(book, chapter)?.verse(verse)
    }

    /// Resolve a chapter address produced by this corpus
    pub fn resolve(&self, chapter: ChapterRef) -> Option<(&Book, &Chapter)> {
        let book = self.books.get(chapter.book)?;
        Some((book, book.chapter(chapter.chapter)?))
    }

    /// Every chapter in traversal order
    pub fn chapters(&self) -> impl Iterator<Item = (ChapterRef, &Book, &Chapter)> + '_ {
        self.books.iter().enumerate().flat_map(|(book_idx, book)| {
            book.chapters.iter().map(move |chapter| {
                (
                    ChapterRef {
                        book: book_idx,
                        chapter: chapter.number,
                    },
                    book,
                    chapter,
                )
            })
        })
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn chapter_count(&self) -> usize {
        self.books.iter().map(|b| b.chapters.len()).sum()
    }

    pub fn verse_count(&self) -> usize {
        self.books
            .iter()
            .flat_map(|b| b.chapters.iter())
            .map(|c| c.verses.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Line accounting from the parse that produced this corpus
    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    pub fn semantic_index(&self) -> &SemanticIndex {
        &self.semantic
    }

    /// Case-insensitive substring scan, first `max_results` verses in traversal order
    pub fn search_text(&self, query: &str, max_results: usize) -> Vec<VerseHit> {
        lexical::search_text(self, query, max_results)
    }

    /// Occurrence-ranked chapter search (see [`KeywordQuery`](crate::search::KeywordQuery))
    pub fn search_keyword(
        &self,
        query: &str,
        book: Option<&str>,
        max_results: usize,
    ) -> Vec<KeywordMatch> {
        lexical::search_keyword(self, query, book, max_results)
    }

    /// TF-IDF cosine-similarity chapter search
    pub fn search_semantic(
        &self,
        query: &str,
        book: Option<&str>,
        n_results: usize,
    ) -> Vec<SemanticMatch> {
        self.semantic.search(self, query, book, n_results)
    }
}

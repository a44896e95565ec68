//! Line parser for plain-text scripture sources
//!
//! Expected verse line format:
//!
//! ```text
//! <Book> <chapter>:<verse> <text>
//! Genesis 1:1	In the beginning God created the heavens and the earth.
//! 1 Samuel 3:10 Then the LORD came and stood there.
//! ```
//!
//! Blank lines and banner lines are skipped. Anything else that does not
//! match the verse pattern is discarded without failing the parse; the
//! [`ParseReport`] records how many lines went where.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{Corpus, CorpusBuilder};

/// Prefixes of banner/header lines found at the top of published texts
pub const HEADER_PREFIXES: &[&str] = &["The Holy Bible", "This text", "Verse"];

lazy_static! {
    /// Book (letters, digits, spaces), chapter:verse, then the verse text
    static ref VERSE_LINE: Regex =
        Regex::new(r"^([A-Za-z0-9][A-Za-z0-9 ]*?)\s+(\d+):(\d+)\s+(.+)$").unwrap();
}

/// Line accounting for one parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    pub lines_read: usize,
    pub verses_parsed: usize,
    pub blank_lines: usize,
    pub header_lines: usize,
    pub malformed_lines: usize,
    /// Verse references seen more than once (later text wins)
    pub duplicate_verses: usize,
}

impl ParseReport {
    /// Lines that were not turned into verses
    pub fn skipped_lines(&self) -> usize {
        self.blank_lines + self.header_lines + self.malformed_lines
    }
}

/// A verse line split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseLine<'a> {
    pub book: &'a str,
    pub chapter: u32,
    pub verse: u32,
    pub text: &'a str,
}

/// Split a single trimmed line into a verse reference and its text.
///
/// Returns `None` for lines that do not match the verse format, including
/// chapter or verse number 0.
pub fn parse_verse_line(line: &str) -> Option<VerseLine<'_>> {
    let caps = VERSE_LINE.captures(line)?;

    let chapter: u32 = caps.get(2)?.as_str().parse().ok()?;
    let verse: u32 = caps.get(3)?.as_str().parse().ok()?;
    if chapter == 0 || verse == 0 {
        return None;
    }

    let text = caps.get(4)?.as_str().trim();
    if text.is_empty() {
        return None;
    }

    Some(VerseLine {
        book: caps.get(1)?.as_str().trim(),
        chapter,
        verse,
        text,
    })
}

fn is_header(line: &str) -> bool {
    HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Parse raw source text into a corpus and build its indices.
pub fn parse_corpus(text: &str) -> Corpus {
    let mut builder = CorpusBuilder::new();
    let mut report = ParseReport::default();

    for raw in text.lines() {
        report.lines_read += 1;
        let line = raw.trim();

        if line.is_empty() {
            report.blank_lines += 1;
            continue;
        }
        if is_header(line) {
            report.header_lines += 1;
            continue;
        }

        match parse_verse_line(line) {
            Some(verse) => {
                if builder.insert_verse(verse.book, verse.chapter, verse.verse, verse.text) {
                    report.duplicate_verses += 1;
                }
                report.verses_parsed += 1;
            }
            None => report.malformed_lines += 1,
        }
    }

    debug!(
        "Parsed {} verse lines ({} skipped, {} malformed)",
        report.verses_parsed,
        report.skipped_lines(),
        report.malformed_lines
    );

    builder.build(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_line() {
        let line = parse_verse_line("Genesis 1:1 In the beginning.").unwrap();
        assert_eq!(line.book, "Genesis");
        assert_eq!(line.chapter, 1);
        assert_eq!(line.verse, 1);
        assert_eq!(line.text, "In the beginning.");
    }

    #[test]
    fn test_parse_numbered_and_multi_word_books() {
        let line = parse_verse_line("1 Samuel 3:10 Speak, for Your servant is listening.").unwrap();
        assert_eq!(line.book, "1 Samuel");
        assert_eq!(line.chapter, 3);
        assert_eq!(line.verse, 10);

        let line = parse_verse_line("Song of Solomon 2:1 I am a rose of Sharon.").unwrap();
        assert_eq!(line.book, "Song of Solomon");
    }

    #[test]
    fn test_parse_tab_separated_line() {
        let line = parse_verse_line("John 3:16\tFor God so loved the world").unwrap();
        assert_eq!(line.book, "John");
        assert_eq!(line.text, "For God so loved the world");
    }

    #[test]
    fn test_rejects_malformed_lines() {
        assert!(parse_verse_line("[Genesis 1]").is_none());
        assert!(parse_verse_line("1 In the beginning").is_none());
        assert!(parse_verse_line("Genesis 1 In the beginning").is_none());
        assert!(parse_verse_line("Genesis 0:1 Nothing").is_none());
        assert!(parse_verse_line("Genesis 1:0 Nothing").is_none());
        assert!(parse_verse_line("Genesis 1:1").is_none());
    }

    #[test]
    fn test_parse_corpus_example() {
        let corpus = parse_corpus(
            "Genesis 1:1 In the beginning God created the heavens and the earth.\n\
             Genesis 1:2 The earth was formless and void.\n",
        );
        assert_eq!(
            corpus.get_chapter("Genesis", 1).unwrap().text(),
            "In the beginning God created the heavens and the earth. The earth was formless and void. "
        );
        assert!(corpus.list_books().contains(&"Genesis".to_string()));
    }

    #[test]
    fn test_report_accounts_for_every_line() {
        let text = "The Holy Bible, Berean Standard Bible\n\
                    This text of the BSB is dedicated to the public domain.\n\
                    Verse\tBerean Standard Bible\n\
                    \n\
                    Genesis 1:1\tIn the beginning God created the heavens and the earth.\n\
                    [Genesis 2]\n\
                    Genesis 1:1\tIn the beginning.\n\
                    Exodus 1:1\tThese are the names of the sons of Israel.\n";
        let corpus = parse_corpus(text);
        let report = corpus.report();

        assert_eq!(report.lines_read, 8);
        assert_eq!(report.header_lines, 3);
        assert_eq!(report.blank_lines, 1);
        assert_eq!(report.malformed_lines, 1);
        assert_eq!(report.verses_parsed, 3);
        assert_eq!(report.duplicate_verses, 1);
        assert_eq!(report.skipped_lines(), 5);
        assert_eq!(corpus.get_verse("Genesis", 1, 1), Some("In the beginning."));
        assert_eq!(corpus.list_books(), vec!["Genesis", "Exodus"]);
    }

    #[test]
    fn test_bracketed_chapter_format_is_not_understood() {
        let corpus = parse_corpus("[Genesis 1]\n1 In the beginning.\n2 The earth.\n");
        assert!(corpus.is_empty());
        assert_eq!(corpus.report().malformed_lines, 3);
    }
}

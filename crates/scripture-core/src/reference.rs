//! Book reference normalization
//!
//! Maps short abbreviations ("jhn", "1co") and full names in any case
//! ("genesis", "1 SAMUEL") onto canonical book names. Anything unknown passes
//! through untouched so already-canonical or unfamiliar names keep working.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// Canonical book names in canonical order, paired with their abbreviation.
pub const BOOKS: &[(&str, &str)] = &[
    // Old Testament
    ("gen", "Genesis"),
    ("exo", "Exodus"),
    ("lev", "Leviticus"),
    ("num", "Numbers"),
    ("deu", "Deuteronomy"),
    ("jos", "Joshua"),
    ("jdg", "Judges"),
    ("rut", "Ruth"),
    ("1sa", "1 Samuel"),
    ("2sa", "2 Samuel"),
    ("1ki", "1 Kings"),
    ("2ki", "2 Kings"),
    ("1ch", "1 Chronicles"),
    ("2ch", "2 Chronicles"),
    ("ezr", "Ezra"),
    ("neh", "Nehemiah"),
    ("est", "Esther"),
    ("job", "Job"),
    ("psa", "Psalms"),
    ("pro", "Proverbs"),
    ("ecc", "Ecclesiastes"),
    ("sng", "Song of Solomon"),
    ("isa", "Isaiah"),
    ("jer", "Jeremiah"),
    ("lam", "Lamentations"),
    ("ezk", "Ezekiel"),
    ("dan", "Daniel"),
    ("hos", "Hosea"),
    ("jol", "Joel"),
    ("amo", "Amos"),
    ("oba", "Obadiah"),
    ("jon", "Jonah"),
    ("mic", "Micah"),
    ("nah", "Nahum"),
    ("hab", "Habakkuk"),
    ("zep", "Zephaniah"),
    ("hag", "Haggai"),
    ("zec", "Zechariah"),
    ("mal", "Malachi"),
    // New Testament
    ("mat", "Matthew"),
    ("mrk", "Mark"),
    ("luk", "Luke"),
    ("jhn", "John"),
    ("act", "Acts"),
    ("rom", "Romans"),
    ("1co", "1 Corinthians"),
    ("2co", "2 Corinthians"),
    ("gal", "Galatians"),
    ("eph", "Ephesians"),
    ("php", "Philippians"),
    ("col", "Colossians"),
    ("1th", "1 Thessalonians"),
    ("2th", "2 Thessalonians"),
    ("1ti", "1 Timothy"),
    ("2ti", "2 Timothy"),
    ("tit", "Titus"),
    ("phm", "Philemon"),
    ("heb", "Hebrews"),
    ("jas", "James"),
    ("1pe", "1 Peter"),
    ("2pe", "2 Peter"),
    ("1jn", "1 John"),
    ("2jn", "2 John"),
    ("3jn", "3 John"),
    ("jud", "Jude"),
    ("rev", "Revelation"),
];

/// Alternate spellings seen in published texts (the BSB uses "Psalm").
const ALIASES: &[(&str, &str)] = &[
    ("psalm", "Psalms"),
    ("song of songs", "Song of Solomon"),
];

lazy_static! {
    static ref LOOKUP: HashMap<String, &'static str> = {
        let mut map = HashMap::with_capacity(BOOKS.len() * 2 + ALIASES.len());
        for (abbrev, name) in BOOKS {
            map.insert((*abbrev).to_string(), *name);
            map.insert(name.to_lowercase(), *name);
        }
        for (alias, name) in ALIASES {
            map.insert((*alias).to_string(), *name);
        }
        map
    };
}

/// Normalize a book name or abbreviation to its canonical form.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Unknown
/// input is returned as given (original case preserved); this never fails.
///
/// ```
/// use scripture_core::reference::normalize_book;
///
/// assert_eq!(normalize_book("jhn"), "John");
/// assert_eq!(normalize_book("1co"), "1 Corinthians");
/// assert_eq!(normalize_book("Frobnicate"), "Frobnicate");
/// ```
pub fn normalize_book(name: &str) -> String {
    match LOOKUP.get(&name.trim().to_lowercase()) {
        Some(canonical) => (*canonical).to_string(),
        None => name.to_string(),
    }
}

/// Whether `name` resolves to a known canonical book.
pub fn is_known_book(name: &str) -> bool {
    LOOKUP.contains_key(&name.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviations() {
        assert_eq!(normalize_book("gen"), "Genesis");
        assert_eq!(normalize_book("exo"), "Exodus");
        assert_eq!(normalize_book("mat"), "Matthew");
        assert_eq!(normalize_book("jhn"), "John");
        assert_eq!(normalize_book("rev"), "Revelation");
        assert_eq!(normalize_book("1sa"), "1 Samuel");
        assert_eq!(normalize_book("3jn"), "3 John");
    }

    #[test]
    fn test_abbreviations_are_case_insensitive() {
        assert_eq!(normalize_book("GEN"), "Genesis");
        assert_eq!(normalize_book("Jhn"), "John");
        assert_eq!(normalize_book("  rom "), "Romans");
    }

    #[test]
    fn test_full_names() {
        assert_eq!(normalize_book("Genesis"), "Genesis");
        assert_eq!(normalize_book("John"), "John");
        assert_eq!(normalize_book("genesis"), "Genesis");
        assert_eq!(normalize_book("1 samuel"), "1 Samuel");
        assert_eq!(normalize_book("Psalm"), "Psalms");
    }

    #[test]
    fn test_judges_and_jude_are_distinct() {
        assert_eq!(normalize_book("jdg"), "Judges");
        assert_eq!(normalize_book("jud"), "Jude");
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(normalize_book("Unknown"), "Unknown");
        assert_eq!(normalize_book("Frobnicate"), "Frobnicate");
        assert!(!is_known_book("Frobnicate"));
    }

    #[test]
    fn test_table_covers_both_testaments() {
        assert_eq!(BOOKS.len(), 66);
        assert!(BOOKS.iter().all(|(_, name)| is_known_book(name)));
    }
}

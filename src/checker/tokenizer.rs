// Token-level rules shared by the classifier: splitting, punctuation
// trimming and the heuristic filters.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Plain and suffixed numbers: 7, 23rd, 45th, 1970s.
    static ref NUMBER_PATTERN: Regex = Regex::new(r"^[0-9]+(st|nd|rd|th|s)?$").unwrap();
}

/// Shorthand endings such as he's, they're, she'll.
const CONTRACTION_SUFFIXES: [&str; 6] = ["s", "re", "ll", "d", "t", "ve"];

const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

const SENTENCE_MARKS: [char; 5] = [',', '.', '!', '?', ';'];

/// Split on whitespace; runs of whitespace never yield empty tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Whether the raw token closes a clause or sentence.
pub fn ends_with_sentence_mark(token: &str) -> bool {
    token.ends_with(SENTENCE_MARKS)
}

/// Strip contraction suffixes and non-letter edges until nothing changes.
pub fn strip_punctuation(token: &str) -> String {
    let mut word = token.to_string();
    loop {
        let next = strip_once(&word);
        if next == word {
            return word;
        }
        word = next;
    }
}

/// One trimming pass: contraction suffix, then one trailing and one leading
/// non-letter character.
fn strip_once(word: &str) -> String {
    let mut rest = word;

    for suffix in CONTRACTION_SUFFIXES {
        if let Some(stem) = rest.strip_suffix(suffix) {
            if let Some(stem) = stem.strip_suffix(APOSTROPHES) {
                rest = stem;
                break;
            }
        }
    }

    if let Some(last) = rest.chars().last() {
        if !last.is_alphabetic() {
            rest = &rest[..rest.len() - last.len_utf8()];
        }
    }
    if let Some(first) = rest.chars().next() {
        if !first.is_alphabetic() {
            rest = &rest[first.len_utf8()..];
        }
    }

    rest.to_string()
}

/// Whether a token is exempt from dictionary lookup.
///
/// Only the numeric pattern decides. Abbreviations and (optionally) all-caps
/// words are recognised but still go on to be looked up.
pub fn is_filtered(word: &str, ignore_uppercase: bool) -> bool {
    if is_abbreviation(word) || (ignore_uppercase && is_upper_case(word)) {
        log::trace!("'{}' looks like an abbreviation or acronym", word);
    }
    NUMBER_PATTERN.is_match(&word.to_lowercase())
}

/// Single letters separated by dots, e.g. `e.g` or `U.S`.
pub fn is_abbreviation(word: &str) -> bool {
    let parts: Vec<&str> = word.trim_end_matches('.').split('.').collect();
    parts.iter().all(|part| {
        let mut chars = part.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
    })
}

pub fn is_upper_case(word: &str) -> bool {
    !word.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_skips_whitespace_runs() {
        let tokens: Vec<_> = tokenize("  one \t two\n\nthree  ").collect();
        assert_eq!(tokens, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_sentence_marks() {
        assert!(ends_with_sentence_mark("falls."));
        assert!(ends_with_sentence_mark("wait;"));
        assert!(ends_with_sentence_mark("really?"));
        assert!(!ends_with_sentence_mark("word"));
        assert!(!ends_with_sentence_mark("quote\""));
    }

    #[test]
    fn test_strip_reaches_fixpoint() {
        let once = strip_punctuation("((hello)).");
        assert_eq!(once, "hello");
        assert_eq!(strip_punctuation(&once), once);
    }

    #[test]
    fn test_strip_contractions() {
        assert_eq!(strip_punctuation("he's"), "he");
        assert_eq!(strip_punctuation("They're"), "They");
        assert_eq!(strip_punctuation("she\u{2019}ll"), "she");
        assert_eq!(strip_punctuation("(you've)"), "you");
        assert_eq!(strip_punctuation("cats"), "cats");
    }

    #[test]
    fn test_strip_exposes_new_boundaries() {
        // Suffix removal leaves a trailing quote that the next pass removes
        assert_eq!(strip_punctuation("'word''s'"), "word");
        assert_eq!(strip_punctuation("--"), "");
        assert_eq!(strip_punctuation("123"), "");
    }

    #[test]
    fn test_numbers_are_filtered() {
        for word in ["7", "1970s", "23rd", "45TH", "1st", "2nd"] {
            assert!(is_filtered(word, false), "{}", word);
        }
        for word in ["7x", "th", "abc", "12.5"] {
            assert!(!is_filtered(word, false), "{}", word);
        }
    }

    #[test]
    fn test_numeric_pattern_decides_over_other_heuristics() {
        assert!(is_abbreviation("e.g"));
        assert!(!is_filtered("e.g", false));
        assert!(is_upper_case("NASA"));
        assert!(!is_filtered("NASA", true));
    }

    #[test]
    fn test_abbreviation_shape() {
        assert!(is_abbreviation("U.S."));
        assert!(is_abbreviation("a"));
        assert!(!is_abbreviation("ab.c"));
        assert!(!is_abbreviation(""));
        assert!(!is_abbreviation("1.2"));
    }
}

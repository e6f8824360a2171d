use crate::config::ConfigStore;
use crate::error::{Result, SpellError};
use std::collections::BTreeSet;

/// Codepoints treated as word boundaries when nothing is configured.
pub const DEFAULT_DELIMITERS: &[&str] = &[
    // Whitespace
    "u000A", "u000B", "u000C", "u000D", "u2028", "u2029", "u0013", "u2003",
    // Colon
    "u003A",
    // Dashes
    "u2012", "u2013", "u2014", "u2015",
    // Comma, tab, period, slash, backslash, hash, quotation mark
    "u002C", "u0009", "u002E", "u002F", "u005C", "u0023", "u0022",
];

/// Set of codepoints that are replaced with a space before tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DelimiterSet {
    chars: BTreeSet<char>,
}

impl DelimiterSet {
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        Self {
            chars: chars.into_iter().collect(),
        }
    }

    pub fn defaults() -> Self {
        let specs: Vec<String> = DEFAULT_DELIMITERS.iter().map(|s| s.to_string()).collect();
        // The built-in table is well-formed
        Self::parse(&specs).unwrap_or_default()
    }

    /// Parse `uXXXX` style codepoint specs.
    pub fn parse(specs: &[String]) -> Result<Self> {
        let chars = specs
            .iter()
            .map(|raw| parse_codepoint(raw))
            .collect::<Result<BTreeSet<char>>>()?;
        Ok(Self { chars })
    }

    /// Read the delimiters from the store, seeding and persisting the
    /// defaults when none are configured.
    pub fn from_store(store: &mut dyn ConfigStore) -> Result<Self> {
        let mut specs = store.word_delimiters();
        if specs.is_empty() {
            specs = DEFAULT_DELIMITERS.iter().map(|s| s.to_string()).collect();
            store.set_word_delimiters(specs.clone())?;
        }

        let set = Self::parse(&specs)?;
        log::info!("Loaded {} word delimiters.", set.len());
        Ok(set)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    /// Replace every delimiter in `text` with a single space.
    pub fn replace_with_spaces(&self, text: &str) -> String {
        text.chars()
            .map(|c| if self.contains(c) { ' ' } else { c })
            .collect()
    }

    pub fn to_specs(&self) -> Vec<String> {
        self.chars
            .iter()
            .map(|c| format!("u{:04X}", *c as u32))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

fn parse_codepoint(raw: &str) -> Result<char> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix('u')
        .or_else(|| trimmed.strip_prefix('U'))
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| SpellError::config(format!("malformed word delimiter '{}'", raw)))?;

    if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SpellError::config(format!(
            "malformed word delimiter '{}'",
            raw
        )));
    }

    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| SpellError::config(format!("malformed word delimiter '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, FileConfigStore};

    #[test]
    fn test_defaults() {
        let set = DelimiterSet::defaults();
        assert_eq!(set.len(), DEFAULT_DELIMITERS.len());
        for ch in [',', '.', '/', '\\', '#', '"', ':', '\t', '\n', '\u{2014}'] {
            assert!(set.contains(ch), "missing {:?}", ch);
        }
        assert!(!set.contains(' '));
        assert!(!set.contains('-'));
        assert!(!set.contains('\''));
    }

    #[test]
    fn test_parse_accepts_both_prefixes() {
        let set = DelimiterSet::parse(&["u003B".to_string(), "0x21".to_string()]).unwrap();
        assert!(set.contains(';'));
        assert!(set.contains('!'));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["003A", "uZZZZ", "u", "uD800", "u+3A", "0x-21", "u 3A"] {
            let err = DelimiterSet::parse(&[bad.to_string()]).unwrap_err();
            assert!(matches!(err, SpellError::Configuration(_)), "{}", bad);
        }
    }

    #[test]
    fn test_replace_with_spaces() {
        let set = DelimiterSet::defaults();
        assert_eq!(
            set.replace_with_spaces("one,two.three/four"),
            "one two three four"
        );
    }

    #[test]
    fn test_from_store_seeds_defaults() {
        let mut store = FileConfigStore::in_memory(Config::default());
        let set = DelimiterSet::from_store(&mut store).unwrap();

        assert_eq!(set, DelimiterSet::defaults());
        assert_eq!(store.word_delimiters().len(), DEFAULT_DELIMITERS.len());
    }

    #[test]
    fn test_specs_round_trip_format() {
        let set = DelimiterSet::new([',', '\u{2014}']);
        assert_eq!(set.to_specs(), vec!["u002C", "u2014"]);
    }
}

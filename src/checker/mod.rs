pub mod classifier;
pub mod delimiters;
pub mod dictionary;
pub mod dispatcher;
pub mod sink;
pub mod tokenizer;

use crate::config::{CheckSettings, Config};
use crate::error::{Result, SpellError};
use crate::parser::TextSource;
use crate::{CheckReport, RunStatus};
use classifier::Classifier;
use delimiters::DelimiterSet;
use dictionary::{Dictionary, DictionaryKind};
use dispatcher::Dispatcher;
use sink::ErrorSink;
use std::path::Path;
use std::sync::Arc;

pub struct SpellChecker {
    system: Arc<Dictionary>,
    custom: Vec<Arc<Dictionary>>,
    delimiters: Arc<DelimiterSet>,
    settings: CheckSettings,
}

impl SpellChecker {
    /// Build the system dictionary and every configured custom dictionary.
    pub fn new(config: &Config, delimiters: DelimiterSet) -> Result<Self> {
        let system = match config.wordlist_dir() {
            Some(dir) => Dictionary::load_system(&dir, &config.excluded_word_lists)?,
            None => Dictionary::bundled(),
        };

        let mut checker = Self::with_system_dictionary(
            system,
            delimiters,
            CheckSettings::from_config(config),
        );

        for (id, path) in &config.dictionaries {
            let is_default = config.default_dictionary.as_deref() == Some(id.as_str());
            checker.add_custom_dictionary(path, is_default)?;
        }

        Ok(checker)
    }

    pub fn with_system_dictionary(
        system: Dictionary,
        delimiters: DelimiterSet,
        settings: CheckSettings,
    ) -> Self {
        Self {
            system: Arc::new(system),
            custom: Vec::new(),
            delimiters: Arc::new(delimiters),
            settings,
        }
    }

    /// Register a file-backed custom dictionary after the existing ones.
    pub fn add_custom_dictionary(&mut self, path: &Path, is_default: bool) -> Result<()> {
        let kind = if is_default {
            DictionaryKind::CustomDefault
        } else {
            DictionaryKind::Custom
        };
        let dict = Dictionary::load_from_path(path, kind)?;
        self.custom.push(Arc::new(dict));
        Ok(())
    }

    pub fn clear_custom_dictionaries(&mut self) {
        self.custom.clear();
    }

    /// Add newline-separated words to the default custom dictionary.
    pub fn add_to_default_custom_dictionary(&self, text: &str) -> Result<usize> {
        let dict = self
            .custom
            .iter()
            .find(|d| d.kind() == DictionaryKind::CustomDefault)
            .ok_or_else(|| {
                SpellError::InvalidDictionaryState(
                    "no default custom dictionary is registered".to_string(),
                )
            })?;
        dict.add(text)
    }

    /// All dictionaries in lookup order: system first, then custom ones.
    pub fn dictionaries(&self) -> Vec<Arc<Dictionary>> {
        std::iter::once(Arc::clone(&self.system))
            .chain(self.custom.iter().cloned())
            .collect()
    }

    pub fn delimiters(&self) -> &DelimiterSet {
        &self.delimiters
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// Check every chunk concurrently and collect the distinct misspellings.
    pub fn check_chunks<I>(&self, chunks: I) -> Result<CheckReport>
    where
        I: IntoIterator<Item = String>,
    {
        let sink = Arc::new(ErrorSink::new());
        let dictionaries = Arc::new(self.dictionaries());
        let delimiters = Arc::clone(&self.delimiters);
        let settings = self.settings;

        let job_sink = Arc::clone(&sink);
        let mut dispatcher = Dispatcher::from_settings(&settings);
        let dispatch = dispatcher.run(chunks, move |chunk| {
            let classifier = Classifier::new(&dictionaries, &delimiters, settings);
            classifier.classify(&chunk, |item| {
                job_sink.add_word(item);
            });
        })?;

        let status = if dispatch.timed_out {
            RunStatus::TimedOut
        } else {
            RunStatus::Complete
        };
        let items = sink.items();
        log::info!("Error count: {}", items.len());

        Ok(CheckReport {
            count: items.len(),
            items,
            status,
        })
    }

    pub fn check_document(&self, source: &dyn TextSource, path: &Path) -> Result<CheckReport> {
        let chunks = source.chunks(path)?;
        log::debug!("{}: {} chunks", path.display(), chunks.len());
        self.check_chunks(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn checker(words: &[&str], compound: bool) -> SpellChecker {
        SpellChecker::with_system_dictionary(
            Dictionary::from_words(DictionaryKind::System, words.iter()),
            DelimiterSet::defaults(),
            CheckSettings {
                find_compound_words: compound,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_dedup_across_chunks() {
        let checker = checker(&["the", "cat", "sat"], false);
        let report = checker
            .check_chunks(vec!["teh cat sat".to_string(), "the cat, teh end".to_string()])
            .unwrap();

        assert_eq!(report.items, vec!["end", "teh"]);
        assert_eq!(report.count, 2);
        assert_eq!(report.status, RunStatus::Complete);
    }

    #[test]
    fn test_compound_run() {
        let checker = checker(&["rain", "falls"], true);
        let report = checker.check_chunks(vec!["teh rain falls.".to_string()]).unwrap();
        assert_eq!(report.items, vec!["teh "]);
    }

    #[test]
    fn test_many_chunks_under_backpressure() {
        let checker = checker(&["fine"], false);
        let chunks: Vec<String> = (0..1000u32)
            .map(|i| {
                let v = (i % 250) as u8;
                format!("fine zz{}{}", (b'a' + v / 26) as char, (b'a' + v % 26) as char)
            })
            .collect();
        let report = checker.check_chunks(chunks).unwrap();
        assert_eq!(report.count, 250);
    }

    #[test]
    fn test_default_custom_dictionary() {
        let dir = tempdir().unwrap();
        let default_path = dir.path().join("default.dic");
        let extra_path = dir.path().join("extra.dic");
        fs::write(&default_path, "").unwrap();
        fs::write(&extra_path, "grok\n").unwrap();

        let mut checker = checker(&["the"], false);
        assert!(matches!(
            checker.add_to_default_custom_dictionary("word"),
            Err(SpellError::InvalidDictionaryState(_))
        ));

        checker.add_custom_dictionary(&extra_path, false).unwrap();
        checker.add_custom_dictionary(&default_path, true).unwrap();
        assert_eq!(checker.dictionaries().len(), 3);

        let before = checker.check_chunks(vec!["the grok zorb".to_string()]).unwrap();
        assert_eq!(before.items, vec!["zorb"]);

        assert_eq!(checker.add_to_default_custom_dictionary("Zorb").unwrap(), 1);
        let after = checker.check_chunks(vec!["the grok zorb".to_string()]).unwrap();
        assert!(after.items.is_empty());
        assert_eq!(fs::read_to_string(&default_path).unwrap(), "Zorb\n");
        assert_eq!(fs::read_to_string(&extra_path).unwrap(), "grok\n");

        checker.clear_custom_dictionaries();
        assert_eq!(checker.dictionaries().len(), 1);
    }

    #[test]
    fn test_new_from_config() {
        let dir = tempdir().unwrap();
        let lists = dir.path().join("wordlists");
        fs::create_dir(&lists).unwrap();
        fs::write(lists.join("english.txt"), "hello\nworld\n").unwrap();
        fs::write(lists.join("canadian.txt"), "toque\n").unwrap();
        let mine = dir.path().join("mine.dic");
        fs::write(&mine, "parspell\n").unwrap();

        let mut config = Config {
            wordlist_dir: Some(lists),
            excluded_word_lists: vec![crate::config::WordListCategory::Canadian],
            default_dictionary: Some("mine".to_string()),
            ..Default::default()
        };
        config.dictionaries.insert("mine".to_string(), mine);

        let checker = SpellChecker::new(&config, DelimiterSet::defaults()).unwrap();
        let report = checker
            .check_chunks(vec!["Hello world, parspell toque".to_string()])
            .unwrap();
        assert_eq!(report.items, vec!["toque"]);
        assert_eq!(checker.add_to_default_custom_dictionary("toque").unwrap(), 1);
    }
}

use crate::config::WordListCategory;
use crate::error::{Result, SpellError};
use flate2::read::GzDecoder;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Role a dictionary plays in a checking session.
///
/// Lookup is identical for every kind; the kind only decides where the words
/// come from and whether the dictionary accepts runtime insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryKind {
    System,
    CustomDefault,
    Custom,
}

/// A sorted, deduplicated list of lowercase words.
///
/// Readers take a shared lock for the binary search; `add` holds the
/// exclusive lock across the in-memory insert and the file append so no
/// reader ever sees a half-applied insertion.
#[derive(Debug)]
pub struct Dictionary {
    kind: DictionaryKind,
    path: Option<PathBuf>,
    words: RwLock<Vec<String>>,
}

impl Dictionary {
    /// Build an in-memory dictionary with no backing file.
    pub fn from_words<I, S>(kind: DictionaryKind, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Self::from_set(kind, None, set)
    }

    /// Load a file-backed custom dictionary, one word per line.
    pub fn load_from_path(path: &Path, kind: DictionaryKind) -> Result<Self> {
        let set = read_word_file(path)?;
        let dict = Self::from_set(kind, Some(path.to_path_buf()), set);
        log::info!(
            "Loaded dictionary [{}]. Size {} words.",
            path.display(),
            dict.len()
        );
        Ok(dict)
    }

    /// Build the system dictionary by merging every word list under `dir`.
    ///
    /// Files whose name mentions an excluded category are skipped. When the
    /// directory does not exist the bundled English list is used instead.
    pub fn load_system(dir: &Path, excluded: &[WordListCategory]) -> Result<Self> {
        if excluded.contains(&WordListCategory::All) {
            log::info!("All system word lists are excluded!");
            return Ok(Self::from_set(DictionaryKind::System, None, HashSet::new()));
        }

        if !dir.is_dir() {
            log::debug!(
                "No word list directory at {}, using bundled word list",
                dir.display()
            );
            return Ok(Self::bundled());
        }

        let mut set = HashSet::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                SpellError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_lowercase();
            if !name.ends_with(".txt") && !name.ends_with(".txt.gz") {
                continue;
            }
            if let Some(category) = excluded.iter().find(|c| c.matches_file_name(&name)) {
                log::info!("Skipping {:?} words list: {}", category, name);
                continue;
            }

            set.extend(read_word_file(entry.path())?);
        }

        let dict = Self::from_set(DictionaryKind::System, None, set);
        log::info!("Dictionary size: {} words.", dict.len());
        Ok(dict)
    }

    /// The small English list shipped inside the binary.
    pub fn bundled() -> Self {
        Self::from_words(DictionaryKind::System, BUNDLED_WORDS.iter())
    }

    fn from_set(kind: DictionaryKind, path: Option<PathBuf>, set: HashSet<String>) -> Self {
        let mut words: Vec<String> = set.into_iter().collect();
        words.sort_unstable();
        Self {
            kind,
            path,
            words: RwLock::new(words),
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        let needle = word.to_lowercase();
        self.words.read().binary_search(&needle).is_ok()
    }

    /// Add every line of `text` that is not already known.
    ///
    /// New words go into the sorted list and the original line is appended
    /// to the backing file. Returns how many words were actually inserted.
    pub fn add(&self, text: &str) -> Result<usize> {
        let path = self.path.as_ref().ok_or_else(|| {
            SpellError::InvalidDictionaryState(format!(
                "{:?} dictionary has no backing file to add words to",
                self.kind
            ))
        })?;

        let mut words = self.words.write();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SpellError::io(path, e))?;
        let mut added = 0;

        for line in text.split('\n') {
            let word = line.trim().to_lowercase();
            if word.is_empty() {
                continue;
            }

            if let Err(pos) = words.binary_search(&word) {
                writeln!(file, "{}", line.trim_end_matches('\r'))
                    .map_err(|e| SpellError::io(path, e))?;

                log::info!("Adding {} to dictionary.", word);
                words.insert(pos, word);
                added += 1;
            }
        }

        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.words.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> DictionaryKind {
        self.kind
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Read a word file into a lowercase set, transparently gunzipping `.gz`.
fn read_word_file(path: &Path) -> Result<HashSet<String>> {
    let file = File::open(path).map_err(|e| SpellError::io(path, e))?;

    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut words = HashSet::new();
    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|e| SpellError::io(path, e))?;
        let word = line.trim().to_lowercase();
        if !word.is_empty() {
            words.insert(word);
        }
    }

    Ok(words)
}

const BUNDLED_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "back", "be",
    "because", "been", "but", "by", "can", "come", "could", "day", "do", "even", "first", "for",
    "from", "get", "give", "go", "good", "had", "has", "have", "he", "her", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "know", "like", "look", "make", "me",
    "most", "my", "new", "no", "not", "now", "of", "on", "one", "only", "or", "other", "our",
    "out", "over", "people", "say", "see", "she", "so", "some", "take", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "think", "this", "time", "to", "two",
    "up", "us", "use", "want", "was", "way", "we", "well", "were", "what", "when", "which",
    "who", "will", "with", "work", "would", "year", "you", "your",
];

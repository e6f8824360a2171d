use crate::error::{Result, SpellError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Bundled word-list families that can be excluded from the system dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordListCategory {
    American,
    British,
    Canadian,
    English,
    All,
}

impl WordListCategory {
    /// Whether a (lowercased) word-list file name belongs to this category.
    pub fn matches_file_name(&self, name: &str) -> bool {
        match self {
            WordListCategory::American => name.contains("american"),
            WordListCategory::British => name.contains("british"),
            WordListCategory::Canadian => name.contains("canadian"),
            WordListCategory::English => name.contains("english"),
            WordListCategory::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Word boundary codepoints written as `uXXXX`. Empty means "seed defaults".
    #[serde(default)]
    pub word_delimiters: Vec<String>,

    #[serde(default)]
    pub ignore_uppercase: bool,

    #[serde(default)]
    pub find_compound_words: bool,

    #[serde(default)]
    pub excluded_word_lists: Vec<WordListCategory>,

    /// Id of the dictionary that receives "add word" requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dictionary: Option<String>,

    /// Directory holding the system word lists. Defaults to the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordlist_dir: Option<PathBuf>,

    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default = "default_join_timeout_secs")]
    pub join_timeout_secs: u64,

    /// Custom dictionary id -> word file.
    #[serde(default)]
    pub dictionaries: BTreeMap<String, PathBuf>,
}

fn default_workers() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    50
}

fn default_join_timeout_secs() -> u64 {
    30 * 60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_delimiters: Vec::new(),
            ignore_uppercase: false,
            find_compound_words: false,
            excluded_word_lists: Vec::new(),
            dictionaries: BTreeMap::new(),
            default_dictionary: None,
            wordlist_dir: None,
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            join_timeout_secs: default_join_timeout_secs(),
        }
    }
}

/// The boolean preferences a config file sets explicitly. An absent key
/// leaves the value of the layer below untouched.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct ExplicitFlags {
    ignore_uppercase: Option<bool>,
    find_compound_words: Option<bool>,
}

/// Values the command line may force on top of the config files.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ignore_uppercase: bool,
    pub find_compound_words: bool,
    pub custom_dictionary: Option<PathBuf>,
    pub workers: Option<usize>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let (global, flags) = Self::read_layer(&global_path)?;
                config = config.merge(global, flags);
            }
        }

        let local_path = PathBuf::from(".parspell.toml");
        if local_path.exists() {
            let (local, flags) = Self::read_layer(&local_path)?;
            config = config.merge(local, flags);
        }

        config.ignore_uppercase |= overrides.ignore_uppercase;
        config.find_compound_words |= overrides.find_compound_words;
        if let Some(workers) = overrides.workers {
            config.workers = workers;
        }
        if let Some(path) = overrides.custom_dictionary {
            config.dictionaries.insert("cli".to_string(), path);
            config.default_dictionary = Some("cli".to_string());
        }

        // Fall back to a personal dictionary in the config dir
        if config.default_dictionary_path().is_none() {
            if let Some(path) = Self::default_personal_dict_path() {
                config.dictionaries.insert("personal".to_string(), path);
                config.default_dictionary = Some("personal".to_string());
            }
        }

        // The default dictionary must exist so words can be appended to it
        if let Some(path) = config.default_dictionary_path() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| SpellError::io(parent, e))?;
                }
            }
            if !path.exists() {
                fs::write(&path, "").map_err(|e| SpellError::io(&path, e))?;
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::read_layer(path).map(|(config, _)| config)
    }

    fn read_layer(path: &Path) -> Result<(Self, ExplicitFlags)> {
        let contents = fs::read_to_string(path).map_err(|e| SpellError::io(path, e))?;
        Self::parse_layer(&contents).map_err(|e| {
            SpellError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    fn parse_layer(
        contents: &str,
    ) -> std::result::Result<(Self, ExplicitFlags), toml::de::Error> {
        let config = toml::from_str(contents)?;
        let flags = toml::from_str(contents)?;
        Ok((config, flags))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| SpellError::config(format!("failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| SpellError::io(parent, e))?;
            }
        }
        fs::write(path, contents).map_err(|e| SpellError::io(path, e))
    }

    fn merge(mut self, other: Self, flags: ExplicitFlags) -> Self {
        if !other.word_delimiters.is_empty() {
            self.word_delimiters = other.word_delimiters;
        }
        if !other.excluded_word_lists.is_empty() {
            self.excluded_word_lists = other.excluded_word_lists;
        }
        self.dictionaries.extend(other.dictionaries);
        if other.default_dictionary.is_some() {
            self.default_dictionary = other.default_dictionary;
        }
        if other.wordlist_dir.is_some() {
            self.wordlist_dir = other.wordlist_dir;
        }
        if other.workers != default_workers() {
            self.workers = other.workers;
        }
        if other.queue_capacity != default_queue_capacity() {
            self.queue_capacity = other.queue_capacity;
        }
        if other.join_timeout_secs != default_join_timeout_secs() {
            self.join_timeout_secs = other.join_timeout_secs;
        }
        if let Some(ignore) = flags.ignore_uppercase {
            self.ignore_uppercase = ignore;
        }
        if let Some(enabled) = flags.find_compound_words {
            self.find_compound_words = enabled;
        }
        self
    }

    pub fn default_dictionary_path(&self) -> Option<PathBuf> {
        self.default_dictionary
            .as_ref()
            .and_then(|id| self.dictionaries.get(id))
            .cloned()
    }

    pub fn wordlist_dir(&self) -> Option<PathBuf> {
        self.wordlist_dir
            .clone()
            .or_else(|| Self::data_dir().map(|dir| dir.join("wordlists")))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "parspell").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_personal_dict_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "parspell").map(|dirs| dirs.config_dir().join("personal.txt"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "parspell").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

/// Immutable per-run view of the preferences the engine needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckSettings {
    pub ignore_uppercase: bool,
    pub find_compound_words: bool,
    pub workers: usize,
    pub queue_capacity: usize,
    pub join_timeout: Duration,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CheckSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ignore_uppercase: config.ignore_uppercase,
            find_compound_words: config.find_compound_words,
            workers: config.workers.max(1),
            queue_capacity: config.queue_capacity.max(1),
            join_timeout: Duration::from_secs(config.join_timeout_secs),
        }
    }
}

/// Read/write access to persisted user preferences.
pub trait ConfigStore {
    fn word_delimiters(&self) -> Vec<String>;
    fn set_word_delimiters(&mut self, delimiters: Vec<String>) -> Result<()>;

    fn ignore_uppercase(&self) -> bool;
    fn set_ignore_uppercase(&mut self, ignore: bool) -> Result<()>;

    fn find_compound_words(&self) -> bool;
    fn set_find_compound_words(&mut self, enabled: bool) -> Result<()>;

    fn is_word_list_excluded(&self, category: WordListCategory) -> bool;
    fn set_word_list_excluded(&mut self, category: WordListCategory, excluded: bool)
        -> Result<()>;

    fn dictionaries(&self) -> BTreeMap<String, PathBuf>;
    fn default_dictionary(&self) -> Option<String>;
    fn set_dictionaries(
        &mut self,
        dictionaries: BTreeMap<String, PathBuf>,
        default: Option<String>,
    ) -> Result<()>;
}

/// A `Config` whose changes are written through to a TOML file.
///
/// Only the touched setting is persisted: the file on disk is re-read,
/// patched and rewritten, so CLI or project-local overrides held in the
/// effective config never leak into it.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    config: Config,
    path: Option<PathBuf>,
}

impl FileConfigStore {
    pub fn new(config: Config, path: Option<PathBuf>) -> Self {
        Self { config, path }
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(config: Config) -> Self {
        Self::new(config, None)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    fn persist(&mut self, apply: impl Fn(&mut Config)) -> Result<()> {
        apply(&mut self.config);

        if let Some(path) = &self.path {
            let mut on_disk = if path.exists() {
                Config::from_file(path)?
            } else {
                Config::default()
            };
            apply(&mut on_disk);
            on_disk.save(path)?;
        }
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn word_delimiters(&self) -> Vec<String> {
        self.config.word_delimiters.clone()
    }

    fn set_word_delimiters(&mut self, delimiters: Vec<String>) -> Result<()> {
        self.persist(|c| c.word_delimiters = delimiters.clone())
    }

    fn ignore_uppercase(&self) -> bool {
        self.config.ignore_uppercase
    }

    fn set_ignore_uppercase(&mut self, ignore: bool) -> Result<()> {
        self.persist(|c| c.ignore_uppercase = ignore)
    }

    fn find_compound_words(&self) -> bool {
        self.config.find_compound_words
    }

    fn set_find_compound_words(&mut self, enabled: bool) -> Result<()> {
        self.persist(|c| c.find_compound_words = enabled)
    }

    fn is_word_list_excluded(&self, category: WordListCategory) -> bool {
        self.config.excluded_word_lists.contains(&category)
    }

    fn set_word_list_excluded(
        &mut self,
        category: WordListCategory,
        excluded: bool,
    ) -> Result<()> {
        self.persist(|c| {
            c.excluded_word_lists.retain(|x| *x != category);
            if excluded {
                c.excluded_word_lists.push(category);
            }
        })
    }

    fn dictionaries(&self) -> BTreeMap<String, PathBuf> {
        self.config.dictionaries.clone()
    }

    fn default_dictionary(&self) -> Option<String> {
        self.config.default_dictionary.clone()
    }

    fn set_dictionaries(
        &mut self,
        dictionaries: BTreeMap<String, PathBuf>,
        default: Option<String>,
    ) -> Result<()> {
        self.persist(|c| {
            c.dictionaries = dictionaries.clone();
            c.default_dictionary = default.clone();
        })
    }
}

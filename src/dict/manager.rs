use crate::checker::dictionary::DictionaryKind;
use crate::config::Config;
use crate::SpellChecker;
use anyhow::{Context, Result};
use colored::*;
use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

// Use a specific commit hash for reproducibility and stability
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
const WORDLIST_VERSION: &str = "2023.12";

fn wordlist_dir(config: &Config) -> Result<PathBuf> {
    config
        .wordlist_dir()
        .context("Failed to determine the word list directory")
}

pub fn list_word_lists(config: &Config) -> Result<()> {
    let dir = wordlist_dir(config)?;
    let lists = installed_word_lists(&dir)?;

    if lists.is_empty() {
        println!("{}", "No word lists installed, using the bundled list.".yellow());
        println!(
            "Run {} to download one.",
            "parspell dict download english".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed word lists:".bold());
    println!();

    for path in lists {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_lowercase();
        let size_kb = fs::metadata(&path)?.len() / 1024;
        let excluded = config
            .excluded_word_lists
            .iter()
            .any(|c| c.matches_file_name(&name));

        let marker = if excluded { "✗".red() } else { "✓".green() };
        println!(
            "  {} {} ({})",
            marker,
            name.cyan().bold(),
            format!("{}KB", size_kb).dimmed()
        );
    }

    println!();
    println!("Word list directory: {}", dir.display().to_string().dimmed());

    Ok(())
}

/// Word list files (`.txt` / `.txt.gz`) directly inside `dir`, sorted.
pub fn installed_word_lists(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut lists = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        if path.is_file() && (name.ends_with(".txt") || name.ends_with(".txt.gz")) {
            lists.push(path);
        }
    }
    lists.sort();
    Ok(lists)
}

pub fn download_word_list(config: &Config, list: &str) -> Result<PathBuf> {
    let url = match list {
        "english" => format!("{}/words_alpha.txt", WORDLIST_BASE_URL),
        other => anyhow::bail!(
            "Word list '{}' is not available. Only 'english' can be downloaded.",
            other
        ),
    };

    println!(
        "{} {} word list (version: {})...",
        "Downloading".cyan().bold(),
        list.yellow(),
        WORDLIST_VERSION.dimmed()
    );
    println!("Source: {}", url.dimmed());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress template")?,
    );
    pb.set_message("Downloading...");

    let response = reqwest::blocking::get(&url).context("Failed to download word list")?;
    if !response.status().is_success() {
        anyhow::bail!("Failed to download word list: HTTP {}", response.status());
    }
    let content = response.text()?;
    pb.finish_with_message("Download complete");

    let words = parse_word_list(&content);
    println!("Found {} words", words.len().to_string().yellow());

    let dir = wordlist_dir(config)?;
    fs::create_dir_all(&dir).context("Failed to create word list directory")?;
    let path = dir.join(format!("{}-words.txt.gz", list));
    write_word_list(&path, &words)?;

    println!(
        "{} Word list installed: {}",
        "✓".green().bold(),
        path.display().to_string().cyan()
    );

    Ok(path)
}

fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

fn write_word_list(path: &Path, words: &[String]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create word list: {}", path.display()))?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    for word in words {
        writeln!(encoder, "{}", word)?;
    }
    encoder.finish().context("Failed to finalize word list")?;
    Ok(())
}

pub fn show_info(checker: &SpellChecker) {
    println!("{}", "Dictionaries (lookup order):".bold());

    for dict in checker.dictionaries() {
        let label = match dict.kind() {
            DictionaryKind::System => "system".cyan(),
            DictionaryKind::CustomDefault => "custom (default)".green(),
            DictionaryKind::Custom => "custom".normal(),
        };
        let location = dict
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "in memory".to_string());
        println!(
            "  {} {} words  {}",
            label,
            dict.len().to_string().yellow(),
            location.dimmed()
        );
    }

    let settings = checker.settings();
    println!();
    println!("  Word delimiters: {}", checker.delimiters().len());
    println!("  Compound words:  {}", settings.find_compound_words);
    println!("  Ignore upper:    {}", settings.ignore_uppercase);
    println!(
        "  Workers: {} (queue {})",
        settings.workers, settings.queue_capacity
    );
}

/// Add words to the default custom dictionary, one per argument.
pub fn add_words(checker: &SpellChecker, words: &[String]) -> Result<usize> {
    let added = checker
        .add_to_default_custom_dictionary(&words.join("\n"))
        .context("Failed to add words")?;
    println!(
        "{} Added {} of {} words",
        "✓".green().bold(),
        added,
        words.len()
    );
    Ok(added)
}

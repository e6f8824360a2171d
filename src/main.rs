use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use parspell::checker::delimiters::DelimiterSet;
use parspell::cli::output::OutputFormat;
use parspell::config::{ConfigOverrides, FileConfigStore};
use parspell::parser::FileTextSource;
use parspell::{cli, dict, Config, RunStatus, SpellChecker};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parspell")]
#[command(version, about = "A parallel spellchecker that reports distinct misspellings", long_about = None)]
struct Cli {
    /// Files to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Merge consecutive unknown words into one reported item
    #[arg(short, long)]
    compound: bool,

    /// Ignore words written entirely in upper case
    #[arg(short = 'u', long)]
    ignore_uppercase: bool,

    /// Offer to add each reported word to the default dictionary
    #[arg(short, long)]
    interactive: bool,

    /// Default custom dictionary file (created if missing)
    #[arg(short, long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed system word lists
    List,
    /// Download a system word list
    Download {
        /// Word list name (currently only "english")
        #[arg(default_value = "english")]
        list: String,
    },
    /// Show the dictionaries a check would use
    Info,
    /// Add words to the default custom dictionary
    Add {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "parspell", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(ConfigOverrides {
        ignore_uppercase: cli.ignore_uppercase,
        find_compound_words: cli.compound,
        custom_dictionary: cli.dictionary.clone(),
        workers: cli.workers,
    })?;

    if let Some(command) = cli.command {
        return handle_command(command, config);
    }

    if cli.files.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let checker = build_checker(config)?;
    let colored = !cli.no_color;
    let source = FileTextSource;

    let mut total_errors = 0;
    let mut unreadable = 0;
    for file_path in &cli.files {
        let report = match checker.check_document(&source, file_path) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("Error: {}", e);
                unreadable += 1;
                continue;
            }
        };

        cli::output::print_report(file_path, &report, colored, cli.format);
        if report.status == RunStatus::TimedOut {
            log::warn!("{}: results are partial", file_path.display());
        }

        if cli.interactive && !report.items.is_empty() {
            let accepted = cli::prompt::offer_additions(&checker, &report.items, colored)?;
            total_errors += report.count.saturating_sub(accepted);
        } else {
            total_errors += report.count;
        }
    }

    if cli.format == OutputFormat::Text {
        cli::output::print_check_summary(total_errors, &cli.files, colored);
    }

    if unreadable > 0 || (total_errors > 0 && !cli.no_fail) {
        std::process::exit(1);
    }

    Ok(())
}

fn build_checker(config: Config) -> Result<SpellChecker> {
    let mut store = FileConfigStore::new(config, Config::global_config_path());
    let delimiters =
        DelimiterSet::from_store(&mut store).context("Failed to load word delimiters")?;
    SpellChecker::new(store.config(), delimiters).context("Failed to load dictionaries")
}

fn handle_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => {
                dict::manager::list_word_lists(&config)?;
            }
            DictCommands::Download { list } => {
                dict::manager::download_word_list(&config, &list)?;
            }
            DictCommands::Info => {
                let checker = build_checker(config)?;
                dict::manager::show_info(&checker);
            }
            DictCommands::Add { words } => {
                let checker = build_checker(config)?;
                dict::manager::add_words(&checker, &words)?;
            }
        },
    }
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

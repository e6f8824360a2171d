use crate::{CheckReport, RunStatus};
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    file: String,
    files_checked: usize,
    total_errors: usize,
    status: RunStatus,
    errors: &'a [String],
}

pub fn print_report(
    file_path: &Path,
    report: &CheckReport,
    colored_output: bool,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Text => print!("{}", render_text(file_path, report, colored_output)),
        OutputFormat::Json => println!("{}", render_json(file_path, report)),
    }
}

pub fn render_text(file_path: &Path, report: &CheckReport, colored_output: bool) -> String {
    let mut out = String::new();
    if report.items.is_empty() && report.status == RunStatus::Complete {
        return out;
    }

    let file_name = file_path.display().to_string();
    if colored_output {
        out.push_str(&format!("\n{}\n", file_name.bold().underline()));
    } else {
        out.push_str(&format!("\n{}\n", file_name));
    }

    for item in &report.items {
        let item = item.trim_end();
        if colored_output {
            out.push_str(&format!("  {}\n", item.red().bold()));
        } else {
            out.push_str(&format!("  {}\n", item));
        }
    }

    if report.status == RunStatus::TimedOut {
        let note = "  (check timed out, results may be incomplete)";
        if colored_output {
            out.push_str(&format!("{}\n", note.yellow()));
        } else {
            out.push_str(&format!("{}\n", note));
        }
    }

    out
}

pub fn render_json(file_path: &Path, report: &CheckReport) -> String {
    let output = JsonOutput {
        file: file_path.display().to_string(),
        files_checked: 1,
        total_errors: report.count,
        status: report.status,
        errors: &report.items,
    };

    // Serializing plain strings and numbers cannot fail
    serde_json::to_string_pretty(&output).unwrap_or_default()
}

pub fn print_check_summary(total_errors: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    if total_errors == 0 {
        if colored {
            println!("{}", "✓ No spelling errors found!".green().bold());
        } else {
            println!("✓ No spelling errors found!");
        }
    } else {
        let error_word = if total_errors == 1 { "error" } else { "errors" };
        let file_word = if files.len() == 1 { "file" } else { "files" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total_errors.to_string().red().bold(),
                error_word,
                files.len(),
                file_word
            );
        } else {
            println!(
                "✗ {} {} found in {} {}",
                total_errors,
                error_word,
                files.len(),
                file_word
            );
        }
    }
}

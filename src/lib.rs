pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod parser;

pub use checker::SpellChecker;
pub use config::{CheckSettings, Config};
pub use error::{Result, SpellError};

use serde::Serialize;

/// Whether a run waited for every chunk or gave up at the join deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Complete,
    TimedOut,
}

/// Outcome of checking one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Distinct unresolved items in natural order.
    pub items: Vec<String>,
    pub count: usize,
    pub status: RunStatus,
}

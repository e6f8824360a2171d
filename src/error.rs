use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the checking engine and its collaborators.
#[derive(Error, Debug)]
pub enum SpellError {
    /// A dictionary load or append could not complete.
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    IoUnlocated(#[from] io::Error),

    /// Mutation attempted on a dictionary that has no backing file.
    #[error("Invalid dictionary state: {0}")]
    InvalidDictionaryState(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The dispatcher gave up waiting for outstanding chunks.
    #[error("Timed out after {0:?} waiting for spell-check workers")]
    ConcurrencyTimeout(Duration),

    #[error("Unreadable document {path}: {reason}")]
    UnreadableDocument { path: PathBuf, reason: String },
}

impl SpellError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SpellError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        SpellError::Configuration(msg.into())
    }

    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        SpellError::UnreadableDocument {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = SpellError::io(
            "/tmp/custom.dic",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/custom.dic"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_timeout_message() {
        let err = SpellError::ConcurrencyTimeout(Duration::from_secs(3));
        assert!(err.to_string().contains("3s"));
    }
}

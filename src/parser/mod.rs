pub mod markdown;
pub mod plaintext;

use crate::error::{Result, SpellError};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Markdown,
    PlainText,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "md" | "mdx" | "markdown" => FileType::Markdown,
            _ => FileType::PlainText,
        }
    }
}

/// Produces the independent chunks (paragraphs) of a document.
pub trait TextSource {
    fn chunks(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads documents from disk, choosing the splitter by file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextSource;

impl TextSource for FileTextSource {
    fn chunks(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path).map_err(|e| SpellError::unreadable(path, e))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| SpellError::unreadable(path, "not valid UTF-8 text"))?;

        Ok(match FileType::from_path(path) {
            FileType::Markdown => markdown::paragraphs(&content),
            FileType::PlainText => plaintext::paragraphs(&content),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(
            FileType::from_path(&PathBuf::from("test.md")),
            FileType::Markdown
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("README.MARKDOWN")),
            FileType::Markdown
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("notes.txt")),
            FileType::PlainText
        );
        assert_eq!(
            FileType::from_path(&PathBuf::from("LICENSE")),
            FileType::PlainText
        );
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let err = FileTextSource
            .chunks(&dir.path().join("gone.txt"))
            .unwrap_err();
        assert!(matches!(err, SpellError::UnreadableDocument { .. }));
    }

    #[test]
    fn test_binary_file_is_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.txt");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let err = FileTextSource.chunks(&path).unwrap_err();
        assert!(matches!(err, SpellError::UnreadableDocument { .. }));
    }

    #[test]
    fn test_reads_paragraphs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "First one.\n\nSecond one.\n").unwrap();

        let chunks = FileTextSource.chunks(&path).unwrap();
        assert_eq!(chunks, vec!["First one.", "Second one."]);
    }
}

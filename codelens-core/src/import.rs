//! Importing source code from local files

use std::path::Path;

use tracing::debug;

use crate::language::detect_language;
use crate::{Error, Language, Result};

/// Extensions accepted by the file import filter (besides the language table)
const EXTRA_EXTENSIONS: &[&str] = &["txt"];

/// Source text read from a local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSource {
    /// File name (no directory component)
    pub file_name: String,
    /// Full file content, unmodified
    pub content: String,
}

impl ImportedSource {
    /// Create an imported source from a name and content
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk
    ///
    /// The content is kept byte-for-byte; files that are not valid UTF-8 are
    /// rejected.
    pub fn read(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Validation(format!("Invalid file path: {}", path.display())))?
            .to_string();

        let content = std::fs::read_to_string(path)?;

        debug!(file = %file_name, bytes = content.len(), "Imported source file");

        Ok(Self { file_name, content })
    }

    /// Language for this file, keeping `current` if the name is not recognized
    pub fn language(&self, current: Language) -> Language {
        detect_language(&self.file_name, current)
    }
}

/// Whether a file name passes the import filter
pub fn is_importable(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => {
            Language::from_extension(ext).is_some()
                || EXTRA_EXTENSIONS
                    .iter()
                    .any(|extra| extra.eq_ignore_ascii_case(ext))
        }
        None => false,
    }
}

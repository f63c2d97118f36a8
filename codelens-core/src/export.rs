//! Exporting optimized code to a local file

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{Language, Result};

/// Base name for exported files
const EXPORT_STEM: &str = "optimal-code";

/// Extension used when the language id is not recognized
const FALLBACK_EXTENSION: &str = ".txt";

/// File name for exported code in the given language
///
/// Unknown language ids get `optimal-code.txt`.
pub fn export_file_name(language_id: &str) -> String {
    let ext = Language::from_id(language_id)
        .map(|lang| lang.file_extension())
        .unwrap_or(FALLBACK_EXTENSION);
    format!("{}{}", EXPORT_STEM, ext)
}

/// Write `code` verbatim into `dir` under the export file name
pub fn write_export(dir: &Path, language_id: &str, code: &str) -> Result<PathBuf> {
    let path = dir.join(export_file_name(language_id));
    std::fs::write(&path, code)?;

    info!(path = %path.display(), bytes = code.len(), "Exported optimized code");

    Ok(path)
}

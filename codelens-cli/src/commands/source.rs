//! Loading source code from a file or stdin

use std::io::Read;
use std::path::Path;

use codelens_core::{is_importable, ImportedSource, Language, ReviewSession};
use tracing::warn;

/// Build a session from FILE (or stdin when absent or `-`)
///
/// An explicit `--language` wins over the language detected from the file name.
pub fn load_session(file: Option<&Path>, language: Option<Language>) -> anyhow::Result<ReviewSession> {
    let mut session = ReviewSession::new(String::new(), language.unwrap_or_default());

    match file {
        Some(path) if path != Path::new("-") => {
            let source = ImportedSource::read(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

            if !is_importable(&source.file_name) {
                warn!(file = %source.file_name, "File type is not a recognized source file");
            }

            session.import(source);
        }
        _ => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            session.set_source_code(content);
        }
    }

    if let Some(lang) = language {
        session.set_language(lang);
    }

    Ok(session)
}

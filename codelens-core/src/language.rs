//! Supported languages
//!
//! The fixed set of languages offered to the user and embedded in review
//! prompts, together with filename-based detection.

use serde::{Deserialize, Serialize};

/// A language that can be reviewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
    Python,
    Java,
    CSharp,
    Go,
    Rust,
    Ruby,
    Html,
    Css,
    Sql,
    Php,
    Cpp,
    C,
    Json,
    Xml,
    Yaml,
}

impl Language {
    /// All supported languages, in display order
    pub const ALL: [Language; 17] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Java,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::Ruby,
        Language::Html,
        Language::Css,
        Language::Sql,
        Language::Php,
        Language::Cpp,
        Language::C,
        Language::Json,
        Language::Xml,
        Language::Yaml,
    ];

    /// Identifier used in prompts, config and on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
            Language::Html => "html",
            Language::Css => "css",
            Language::Sql => "sql",
            Language::Php => "php",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Json => "json",
            Language::Xml => "xml",
            Language::Yaml => "yaml",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Ruby => "Ruby",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Sql => "SQL",
            Language::Php => "PHP",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Json => "JSON",
            Language::Xml => "XML",
            Language::Yaml => "YAML",
        }
    }

    /// Extension used when exporting code in this language, including the dot
    pub fn file_extension(&self) -> &'static str {
        match self {
            Language::JavaScript => ".js",
            Language::TypeScript => ".ts",
            Language::Python => ".py",
            Language::Java => ".java",
            Language::CSharp => ".cs",
            Language::Go => ".go",
            Language::Rust => ".rs",
            Language::Ruby => ".rb",
            Language::Html => ".html",
            Language::Css => ".css",
            Language::Sql => ".sql",
            Language::Php => ".php",
            Language::Cpp => ".cpp",
            Language::C => ".c",
            Language::Json => ".json",
            Language::Xml => ".xml",
            Language::Yaml => ".yaml",
        }
    }

    /// Look up a language by its identifier (case-insensitive)
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.id().eq_ignore_ascii_case(id.trim()))
    }

    /// Map a bare file extension (without the dot) to a language
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "py" => Language::Python,
            "java" => Language::Java,
            "cs" => Language::CSharp,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "rb" => Language::Ruby,
            "html" => Language::Html,
            "css" => Language::Css,
            "sql" => Language::Sql,
            "php" => Language::Php,
            "cpp" => Language::Cpp,
            "c" => Language::C,
            "json" => Language::Json,
            "xml" => Language::Xml,
            "yaml" | "yml" => Language::Yaml,
            _ => return None,
        };
        Some(lang)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|l| l.id()).collect();
            format!("Unknown language '{}'. Expected one of: {}", s, known.join(", "))
        })
    }
}

/// Detect the language of a file from its name
///
/// Falls back to `current` when the extension is missing or unrecognized.
pub fn detect_language(filename: &str, current: Language) -> Language {
    filename
        .rsplit_once('.')
        .and_then(|(_, ext)| Language::from_extension(ext))
        .unwrap_or(current)
}

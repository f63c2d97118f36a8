//! Review prompt generation
//!
//! The prompt template uses `{{VARIABLE}}` placeholders. The user's code is
//! substituted last so that placeholder-like text inside it is left alone.

use crate::Language;

/// Embedded review prompt template
const REVIEW_TEMPLATE: &str = include_str!("prompts/review.md");

/// System message sent alongside every review prompt
pub const SYSTEM_PROMPT: &str = "You are an expert code reviewer. Always respond with valid JSON \
containing 'review' and 'optimalCode' fields.";

/// A fixed dimension every review covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewDimension {
    /// Runtime errors, logic flaws, unhandled edge cases
    Correctness,
    /// Injection, unsafe data handling and similar issues
    Security,
    /// Bottlenecks, inefficient algorithms, leaks
    Performance,
    /// Conventions, style, readability
    Readability,
    /// Simpler logic, modern language features
    Modernization,
}

impl ReviewDimension {
    /// All dimensions, in prompt order
    pub const ALL: [ReviewDimension; 5] = [
        ReviewDimension::Correctness,
        ReviewDimension::Security,
        ReviewDimension::Performance,
        ReviewDimension::Readability,
        ReviewDimension::Modernization,
    ];

    /// Short heading for the dimension
    pub fn title(&self) -> &'static str {
        match self {
            ReviewDimension::Correctness => "Bugs and Errors",
            ReviewDimension::Security => "Security Vulnerabilities",
            ReviewDimension::Performance => "Performance Issues",
            ReviewDimension::Readability => "Best Practices & Readability",
            ReviewDimension::Modernization => "Simplification & Modernization",
        }
    }

    /// What the reviewer should look for
    pub fn guidance(&self) -> &'static str {
        match self {
            ReviewDimension::Correctness => {
                "Identify potential runtime errors, logic flaws, and edge cases that are not handled."
            }
            ReviewDimension::Security => {
                "Look for common security issues like injection vulnerabilities, insecure handling of data, etc."
            }
            ReviewDimension::Performance => {
                "Highlight any performance bottlenecks, inefficient algorithms, or memory leaks."
            }
            ReviewDimension::Readability => {
                "Check for adherence to language-specific conventions, code style, and overall \
                 readability. Suggest improvements for clarity and maintainability."
            }
            ReviewDimension::Modernization => {
                "Suggest ways to simplify complex logic and use modern language features."
            }
        }
    }
}

impl std::fmt::Display for ReviewDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// The rendered instruction for a single review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPrompt {
    /// System message
    pub system: String,
    /// User message embedding the rubric and the code
    pub user: String,
}

impl ReviewPrompt {
    /// Render the prompt for `code` written in `language`
    pub fn new(code: &str, language: Language) -> Self {
        let dimensions = ReviewDimension::ALL
            .iter()
            .map(|d| format!("- **{}:** {}", d.title(), d.guidance()))
            .collect::<Vec<_>>()
            .join("\n");

        let user = REVIEW_TEMPLATE
            .replace("{{LANGUAGE}}", language.id())
            .replace("{{DIMENSIONS}}", &dimensions)
            .replace("{{CODE}}", code);

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

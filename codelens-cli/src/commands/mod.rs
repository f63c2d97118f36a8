//! CLI command implementations

pub mod prompt;
pub mod review;
mod source;

pub use prompt::PromptArgs;
pub use review::ReviewArgs;

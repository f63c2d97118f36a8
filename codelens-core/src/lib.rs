//! Codelens Core - Core library for LLM-backed code review
//!
//! This crate builds review prompts, sends them to a hosted LLM provider,
//! validates the two-field structured reply and tracks the state of a review
//! session for a front-end.

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod language;
pub mod provider;
pub mod review;
pub mod secrets;
pub mod session;

pub use config::{Config, ProviderConfig, ProviderKind, StructuredOutput};
pub use error::{Error, Result};
pub use export::{export_file_name, write_export};
pub use import::{is_importable, ImportedSource};
pub use language::{detect_language, Language};
pub use provider::{CompletionRequest, Provider};
pub use review::{ReviewClient, ReviewDimension, ReviewPrompt, ReviewResult, ReviewSettings};
pub use secrets::Secrets;
pub use session::{ReviewSession, ReviewTicket, SessionPhase};

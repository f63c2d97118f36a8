//! Review module for LLM code review
//!
//! This module builds the review prompt, defines the two-field result contract
//! and validates provider replies against it. [`ReviewClient`] ties the pieces
//! together with a [`Provider`](crate::provider::Provider).

mod client;
mod prompt;
mod result;

pub use client::{ReviewClient, ReviewSettings};
pub use prompt::{ReviewDimension, ReviewPrompt, SYSTEM_PROMPT};
pub use result::ReviewResult;

pub(crate) use result::SCHEMA_NAME;

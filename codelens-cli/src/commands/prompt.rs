//! Prompt command - show the rendered review prompt without calling a provider

use std::path::PathBuf;

use clap::Args;
use codelens_core::{Language, ReviewPrompt};

use super::source::load_session;

/// Arguments for the prompt command
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Source file (reads stdin when omitted or "-")
    pub file: Option<PathBuf>,

    /// Language of the code (detected from the file name by default)
    #[arg(short, long)]
    pub language: Option<Language>,
}

impl PromptArgs {
    /// Execute the prompt command
    pub fn execute(&self) -> anyhow::Result<()> {
        let session = load_session(self.file.as_deref(), self.language)?;
        let prompt = ReviewPrompt::new(session.source_code(), session.language());

        println!("--- system ---");
        println!("{}", prompt.system);
        println!();
        println!("--- user ---");
        println!("{}", prompt.user);

        Ok(())
    }
}

//! Review command - run one code review against the configured provider

use std::path::PathBuf;

use clap::Args;
use codelens_core::{write_export, Config, Language, ReviewClient, Secrets};

use super::source::load_session;

/// Arguments for the review command
#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Source file (reads stdin when omitted or "-")
    pub file: Option<PathBuf>,

    /// Language of the code (detected from the file name by default)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Write the optimized code to DIR/optimal-code.<ext>
    #[arg(short, long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Print the result as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,
}

impl ReviewArgs {
    /// Execute the review command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let mut session = load_session(self.file.as_deref(), self.language)?;

        let secrets = Secrets::load()?;
        let client = ReviewClient::from_config(config, &secrets)?;

        if verbose {
            tracing::info!(
                provider = client.provider_name(),
                language = %session.language(),
                bytes = session.source_code().len(),
                "Starting review"
            );
        }

        let ticket = match session.begin() {
            Ok(ticket) => ticket,
            Err(e) => anyhow::bail!("{}", e),
        };

        if !self.json {
            eprintln!(
                "Reviewing {} code with {} ...",
                session.language().label(),
                client.provider_name()
            );
        }

        tokio::select! {
            outcome = client.request_review(&ticket.source_code, ticket.language) => {
                session.complete(ticket.id, outcome);
            }
            _ = tokio::signal::ctrl_c() => {
                session.cancel();
                anyhow::bail!("Review cancelled");
            }
        }

        let Some(result) = session.result() else {
            anyhow::bail!(
                "{}",
                session
                    .error()
                    .unwrap_or(codelens_core::session::REVIEW_FAILED_MESSAGE)
            );
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", result.review);
            println!();
            println!("## Optimized Code");
            println!();
            println!("```{}", session.language().id());
            println!("{}", result.optimal_code.trim_end_matches('\n'));
            println!("```");
        }

        if let Some(ref dir) = self.export {
            let path = write_export(dir, session.language().id(), &result.optimal_code)?;
            eprintln!("Optimized code written to {}", path.display());
        }

        Ok(())
    }
}

//! Codelens CLI - Command line interface for Codelens
//!
//! LLM-backed code review with an optimized rewrite.

mod commands;

use clap::{Parser, Subcommand};
use codelens_core::{Config, Language, ProviderKind, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{PromptArgs, ReviewArgs};

/// Codelens: AI code review with an optimized rewrite
#[derive(Parser, Debug)]
#[command(name = "codelens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Provider to use: groq, openai or gemini (overrides config and env)
    #[arg(long, global = true, env = "CODELENS_PROVIDER")]
    provider: Option<ProviderKind>,

    /// Model to use (overrides config and env)
    #[arg(long, global = true, env = "CODELENS_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Review source code
    #[command(visible_alias = "r")]
    Review(ReviewArgs),

    /// Print the review prompt without contacting a provider
    Prompt(PromptArgs),

    /// List supported languages
    Languages,

    /// Show current configuration
    Config,

    /// Create a secrets file template
    Init,
}

/// Log filter from RUST_LOG; --verbose raises the default level to info
fn log_filter(verbose: bool) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("info"),
        Err(_) => EnvFilter::new("error"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(cli.verbose))
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.provider, cli.model.clone())?;

    if cli.verbose {
        tracing::info!(
            provider = %config.provider.kind,
            model = %config.provider.model(),
            base_url = %config.provider.base_url(),
            timeout = ?config.provider.timeout,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("codelens {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Review(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Prompt(args)) => {
            args.execute()?;
        }
        Some(Commands::Languages) => {
            println!("{:<12} {:<12} Extension", "Id", "Label");
            for lang in Language::ALL {
                println!("{:<12} {:<12} {}", lang.id(), lang.label(), lang.file_extension());
            }
        }
        Some(Commands::Config) => {
            let provider = &config.provider;
            println!("Codelens Configuration");
            println!("======================");
            println!();
            println!("Provider Settings:");
            println!("  kind: {}", provider.kind);
            println!("  model: {}", provider.model());
            println!("  base_url: {}", provider.base_url());
            println!("  temperature: {}", provider.temperature);
            println!("  timeout: {:?}", provider.timeout);
            println!("  structured_output: {:?}", provider.structured_output());
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
            if let Some(path) = Secrets::default_secrets_path() {
                println!("Secrets file: {}", path.display());
            }
            let has_key = Secrets::load()?.api_key(provider.kind).is_some();
            println!(
                "API key for {}: {}",
                provider.kind,
                if has_key { "set" } else { "not set" }
            );
        }
        Some(Commands::Init) => {
            let path = Secrets::create_template()?;
            println!("Created secrets template at {}", path.display());
            println!("Edit it and add your API key.");
        }
        None => {
            println!("Codelens - AI code review with an optimized rewrite");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

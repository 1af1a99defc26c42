//! # Report Forge CLI (`reportforge`)
//!
//! ## Usage
//!
//! ```bash
//! reportforge --config ./config/reportforge.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `reportforge serve` | Start the HTTP API server |
//! | `reportforge extract <file>` | Extract and print a template's text (debugging aid) |
//!
//! The config file is optional; built-in defaults bind `127.0.0.1:3001` with
//! generation disabled. Set `generation.provider = "openai"` and export
//! `OPENAI_API_KEY` to enable report generation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use report_forge::{config, extract, models::SourceFormat, server};

/// Report Forge — upload a DOCX/PDF template, combine it with data via an
/// LLM, download the generated document.
#[derive(Parser)]
#[command(
    name = "reportforge",
    about = "Report Forge — template-to-report generation service",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/reportforge.toml`; built-in defaults apply when
    /// the file does not exist.
    #[arg(long, global = true, default_value = "./config/reportforge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    ///
    /// Binds to `[server].bind` and serves the upload and generation
    /// endpoints. Templates are held in memory for the process lifetime.
    Serve,

    /// Extract and print the plain text of a local template file.
    ///
    /// Runs the same extraction path as the upload endpoint. Useful for
    /// checking what the model will actually see for a given template.
    Extract {
        /// Path to a `.docx` or `.pdf` file.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_forge=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Extract { file } => {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let format = SourceFormat::from_filename(name).ok_or_else(|| {
                anyhow::anyhow!("unsupported file type: {} (expected .docx or .pdf)", name)
            })?;
            let bytes = std::fs::read(&file)?;
            let text = extract::extract_text(&bytes, format)?;
            println!("{}", text);
        }
    }

    Ok(())
}

//! `plagscan` - check a paragraph against a content-similarity site.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "plagscan")]
#[command(about = "Check text for reuse on the web through a similarity search site")]
#[command(version)]
struct Cli {
    /// Directory of site definition TOML files
    #[arg(long, global = true, value_name = "DIR")]
    definitions: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a text and print the matches
    ///
    /// The text is read from --text, --file, or standard input.
    Check {
        /// Text to check
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Site definition to use (defaults to the configured site)
        #[arg(long)]
        site: Option<String>,

        /// Overall deadline in seconds, capped by the configured maximum
        #[arg(long, value_name = "SECS")]
        deadline_secs: Option<u64>,

        /// Show the browser window
        #[arg(long)]
        headful: bool,

        /// Print the full report instead of the response envelope
        #[arg(long)]
        report: bool,
    },

    /// List registered site definitions
    Sites,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,plagscan=debug"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            text,
            file,
            site,
            deadline_secs,
            headful,
            report,
        } => {
            let args = commands::CheckArgs {
                text,
                file,
                site,
                deadline_secs,
                headful,
                report,
                definitions: cli.definitions,
            };
            commands::check(args).await
        }
        Commands::Sites => commands::sites(cli.definitions.as_deref()),
    }
}

// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intervue - interview preparation with retrieval-augmented answers.
//!
//! This is the binary entry point: a thin developer front end over the
//! pipeline crates.

mod ask;
mod doctor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use intervue_config::IntervueConfig;
use intervue_core::{Category, LengthTier, ModelIdentifier, SearchMode};
use intervue_provider::{KNOWN_MODELS, ModelGateway};

/// Intervue - interview preparation with retrieval-augmented answers.
#[derive(Parser, Debug)]
#[command(name = "intervue", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one interview question and print the scored record as JSON.
    Ask(AskArgs),
    /// Check search backend, embedding model and provider reachability.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// List selectable model identifiers.
    Models,
}

#[derive(clap::Args, Debug)]
pub(crate) struct AskArgs {
    /// The interview question.
    pub question: String,

    /// Candidate profile: `de` / `data engineer` or `mle` / `machine learning engineer`.
    #[arg(long, short = 'c', default_value = "de")]
    pub category: Category,

    /// Generation model as `<provider>/<model>`.
    #[arg(long, short = 'm', default_value = "ollama/phi3.5")]
    pub model: ModelIdentifier,

    /// Retrieval mode: `lexical` or `vector`.
    #[arg(long, default_value = "lexical")]
    pub mode: SearchMode,

    /// Answer length: `short`, `medium` or `long`.
    #[arg(long, short = 'l', default_value = "short")]
    pub length: LengthTier,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => intervue_config::load_and_validate_path(path),
        None => intervue_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            intervue_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    let outcome = match cli.command {
        Some(Commands::Ask(args)) => ask::run_ask(&config, args).await,
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        Some(Commands::Models) => {
            list_models(&config);
            Ok(())
        }
        None => {
            println!("intervue: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn list_models(config: &IntervueConfig) {
    // Constructing providers performs no I/O.
    let gateway = ModelGateway::from_config(config).ok();
    for raw in KNOWN_MODELS {
        let available = match (&gateway, ModelIdentifier::parse(raw)) {
            (Some(gateway), Ok(model)) => gateway.is_registered(model.provider()),
            _ => false,
        };
        if available {
            println!("{raw}");
        } else {
            println!("{raw}  (unavailable: provider not configured)");
        }
    }
}

/// Logs go to stderr so `ask` output stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("intervue={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

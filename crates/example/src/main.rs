//! Example file assistant CLI.
//!
//! A file assistant that can list, read, and write files within a sandboxed directory.
//!
//! # Usage
//!
//! ```bash
//! assist <working_dir> <query>
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=sextant_prompt=debug assist ./sandbox "List all files"
//! ```
//!
//! The model is read from `SEXTANT_MODEL` and the API key from the variable
//! named by `SEXTANT_API_KEY_VAR` (default `ANTHROPIC_API_KEY`); both may be
//! set in a `.env` file.

use example::{Sandbox, classify, file_assistant};
use sextant::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .try_init()
        .ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: <working_dir> <query>");
        eprintln!("Example: ./sandbox \"List all files\"");
        std::process::exit(1);
    }

    let query = &args[2];
    let sandbox = Sandbox::new(&args[1]).unwrap_or_else(|e| {
        eprintln!("Error: cannot open {}: {}", args[1], e);
        std::process::exit(1);
    });

    match classify().call(query.clone()).await {
        Ok(kind) => tracing::info!(?kind, "classified request"),
        Err(e) => tracing::warn!(error = %e, "could not classify request"),
    }

    let assistant = file_assistant(&sandbox).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    match assistant.call(Arguments::new().arg(query.as_str())).await {
        Ok(answer) => println!("{answer}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

//! Flashcards command-line client.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin flashcards-client -- --addr http://localhost:8080 createDeck Algebra Basics Ana
//! cargo run --bin flashcards-client -- getDeckById 1
//! ```

use flashcards_server::client::DEFAULT_ADDR;
use flashcards_server::{ClientCommand, FlashcardsClient};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage: flashcards-client [--addr <base-url>] <command> [args...]";

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut addr = DEFAULT_ADDR.to_string();
    if let Some(position) = args.iter().position(|a| a == "--addr") {
        if position + 1 >= args.len() {
            tracing::error!("--addr requires a value");
            return ExitCode::FAILURE;
        }
        addr = args.remove(position + 1);
        args.remove(position);
    } else if let Some(position) = args.iter().position(|a| a.starts_with("--addr=")) {
        addr = args.remove(position).trim_start_matches("--addr=").to_string();
    }

    let Some((name, rest)) = args.split_first() else {
        tracing::error!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let command = match ClientCommand::parse(name, rest) {
        Ok(command) => command,
        Err(e) => {
            tracing::error!(error = %e, "Error handling command");
            return ExitCode::FAILURE;
        },
    };

    match FlashcardsClient::new(addr).execute(&command).await {
        Ok(response) => {
            tracing::info!(command = %name, response = %response, "Request succeeded");
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(command = %name, error = %e, "Request failed");
            ExitCode::FAILURE
        },
    }
}

//! # Checkout Replay
//!
//! Mounts a billing block on a cart fixture, plays an event script against
//! an in-memory host, and prints what the host would have received.
//!
//! ## Usage
//! ```bash
//! cargo run -p billing-extension --bin replay -- \
//!     demos/infusion-cart.json demos/infusion-events.json
//!
//! # Use a specific config file (clinic directory path, log filter)
//! cargo run -p billing-extension --bin replay -- cart.json events.json --config ./billing.toml
//!
//! # More detail
//! RUST_LOG=billing=trace cargo run -p billing-extension --bin replay -- cart.json events.json
//! ```
//!
//! ## Output
//! A JSON document on stdout:
//! ```json
//! { "sessionId": "...", "rejectedEvents": 0, "mutations": [...], "view": {...} }
//! ```
//! Logs go to stderr. Rejected events are logged and skipped.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use billing_core::{CartLine, CheckoutView};
use billing_extension::{
    init_tracing, CheckoutEvent, CheckoutSession, ExtensionConfig, ExtensionError,
    ExtensionResult, RecordedMutation, RecordingHost,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayReport {
    session_id: Uuid,
    rejected_events: usize,
    mutations: Vec<RecordedMutation>,
    view: CheckoutView,
}

fn print_help() {
    println!("Checkout Billing Replay");
    println!();
    println!("Usage: replay <CART.json> <EVENTS.json> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir/billing.toml)");
    println!("  -h, --help           Show this help message");
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ExtensionResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| ExtensionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct ReplayArgs {
    cart_path: PathBuf,
    events_path: PathBuf,
    config_path: Option<PathBuf>,
}

/// Parses arguments after the program name. `Ok(None)` means help was asked for.
fn parse_args(args: &[String]) -> Result<Option<ReplayArgs>, String> {
    let mut config_path: Option<PathBuf> = None;
    let mut positional: Vec<PathBuf> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => match iter.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => return Err(format!("{arg} requires a path")),
            },
            "--help" | "-h" => return Ok(None),
            other => positional.push(PathBuf::from(other)),
        }
    }

    match <[PathBuf; 2]>::try_from(positional) {
        Ok([cart_path, events_path]) => Ok(Some(ReplayArgs {
            cart_path,
            events_path,
            config_path,
        })),
        Err(_) => Err("expected a cart file and an event script".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let args = match parse_args(&args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return Ok(());
        }
        Err(message) => {
            print_help();
            return Err(message.into());
        }
    };

    let config = ExtensionConfig::load(args.config_path.clone())?;
    init_tracing(&config.logging.filter);

    // `load` runs before the subscriber exists, so report what it used here.
    info!(
        config = ?ExtensionConfig::resolve_path(args.config_path),
        directory = ?config.directory_path(),
        filter = %config.logging.filter,
        "Extension config loaded"
    );

    let directory = Arc::new(config.load_directory()?);
    let lines: Vec<CartLine> = read_json(&args.cart_path)?;
    let events: Vec<CheckoutEvent> = read_json(&args.events_path)?;

    info!(cart = ?args.cart_path, events = events.len(), "Replaying checkout");

    let mut session = CheckoutSession::mount(&lines, directory, RecordingHost::new());

    let mut rejected_events = 0;
    for (index, event) in events.into_iter().enumerate() {
        let name = event.name();
        if let Err(e) = session.dispatch(event).await {
            error!(index, event = name, error = %e, "Event failed");
            rejected_events += 1;
        }
    }

    let report = ReplayReport {
        session_id: session.id(),
        rejected_events,
        mutations: session.host().recorded().await,
        view: session.view(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_positional_and_config() {
        let parsed = parse_args(&args(&["cart.json", "--config", "b.toml", "events.json"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            parsed,
            ReplayArgs {
                cart_path: PathBuf::from("cart.json"),
                events_path: PathBuf::from("events.json"),
                config_path: Some(PathBuf::from("b.toml")),
            }
        );
    }

    #[test]
    fn test_config_flag_without_value_is_an_error() {
        let err = parse_args(&args(&["cart.json", "events.json", "--config"])).unwrap_err();
        assert!(err.contains("--config"));
        assert!(parse_args(&args(&["cart.json", "events.json", "-c"])).is_err());
    }

    #[test]
    fn test_missing_positional_and_help() {
        assert!(parse_args(&args(&["cart.json"])).is_err());
        assert!(parse_args(&args(&["a", "b", "c"])).is_err());
        assert_eq!(parse_args(&args(&["cart.json", "-h"])), Ok(None));
    }
}

//! # billing-extension: Checkout Billing Block Runtime
//!
//! Mounts one billing block per checkout, feeds shopper events through the
//! pure state machine in `billing-core`, and issues the resulting attribute
//! and shipping-address changes to the checkout host.
//!
//! ## Module Organization
//! ```text
//! billing_extension/
//! ├── lib.rs          ◄─── You are here (exports, tracing setup)
//! ├── session.rs      ◄─── CheckoutSession: mount, events, host calls
//! ├── event.rs        ◄─── CheckoutEvent (serializable shopper input)
//! ├── host.rs         ◄─── CheckoutHost trait + RecordingHost
//! ├── config.rs       ◄─── billing.toml + BILLING_* overrides
//! ├── error.rs        ◄─── ExtensionError
//! └── bin/
//!     └── replay.rs   ◄─── Replays a cart + event script
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use std::sync::Arc;
//! use billing_core::{BillingMethod, CartLine};
//! use billing_directory::ClinicDirectory;
//! use billing_extension::{CheckoutSession, RecordingHost};
//!
//! # async fn run() -> billing_extension::ExtensionResult<()> {
//! let directory = Arc::new(ClinicDirectory::bundled()?);
//! let lines = vec![CartLine::tagged("SUP-1", "ICN/HOMEPHARMA")];
//! let mut session = CheckoutSession::mount(&lines, directory, RecordingHost::new());
//!
//! session.toggle_billing(BillingMethod::InfusionClinic, true)?;
//! session.choose_province("Ontario")?;
//! session.choose_clinic("Downtown Infusion Clinic").await?;
//! # Ok(())
//! # }
//! ```

use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod event;
pub mod host;
pub mod session;

pub use config::{ConfigError, ConfigResult, ExtensionConfig};
pub use error::{ExtensionError, ExtensionResult};
pub use event::CheckoutEvent;
pub use host::{CheckoutHost, HostError, HostResult, MutationKind, RecordedMutation, RecordingHost};
pub use session::{CheckoutSession, ClinicOutcome};

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set:
/// - `RUST_LOG=debug` - Show all debug logs
/// - `RUST_LOG=billing=trace` - Trace for billing crates only
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

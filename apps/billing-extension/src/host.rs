//! # Checkout Host
//!
//! The seam between the extension and the checkout runtime that owns the
//! cart, the checkout attributes and the shipping address.
//!
//! ## Call Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutSession                         CheckoutHost                   │
//! │  ───────────────                         ────────────                   │
//! │                                                                         │
//! │  choose_clinic("Downtown…")                                             │
//! │       │                                                                 │
//! │       ├── apply(UpdateAttribute) ──────► apply_attribute_change         │
//! │       │          ◄──────────────────────── Ok / HostError               │
//! │       │                                                                 │
//! │       └── apply(UpdateShippingAddress) ► apply_shipping_address_change  │
//! │                  ◄──────────────────────── Ok / HostError               │
//! │                                                                         │
//! │  The host owns persistence and validation. No retries here.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use billing_core::{CheckoutMutation, MailingAddress};

// =============================================================================
// Host Error
// =============================================================================

/// Failures reported by the checkout host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host refused the change (validation, policy).
    #[error("Checkout host rejected the change: {reason}")]
    Rejected { reason: String },

    /// The host could not be reached or is shutting down.
    #[error("Checkout host unavailable: {0}")]
    Unavailable(String),
}

pub type HostResult<T> = Result<T, HostError>;

// =============================================================================
// Host Trait
// =============================================================================

/// Mutation APIs provided by the checkout runtime.
#[async_trait]
pub trait CheckoutHost: Send + Sync {
    /// Sets a checkout-level attribute.
    async fn apply_attribute_change(&self, key: &str, value: &str) -> HostResult<()>;

    /// Replaces (or partially updates) the shipping address.
    async fn apply_shipping_address_change(&self, address: &MailingAddress) -> HostResult<()>;

    /// Routes a change record to the matching API.
    async fn apply(&self, mutation: &CheckoutMutation) -> HostResult<()> {
        match mutation {
            CheckoutMutation::UpdateAttribute { key, value } => {
                self.apply_attribute_change(key, value).await
            }
            CheckoutMutation::UpdateShippingAddress { address } => {
                self.apply_shipping_address_change(address).await
            }
        }
    }
}

// =============================================================================
// Recording Host
// =============================================================================

/// Kind of change, used to make [`RecordingHost`] reject one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Attribute,
    ShippingAddress,
}

impl MutationKind {
    pub fn of(mutation: &CheckoutMutation) -> Self {
        match mutation {
            CheckoutMutation::UpdateAttribute { .. } => MutationKind::Attribute,
            CheckoutMutation::UpdateShippingAddress { .. } => MutationKind::ShippingAddress,
        }
    }
}

/// A change the host accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedMutation {
    pub mutation: CheckoutMutation,
    pub applied_at: DateTime<Utc>,
}

/// In-memory host that records every accepted change.
///
/// Used by the `replay` tool and by tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    applied: Mutex<Vec<RecordedMutation>>,
    reject: Option<MutationKind>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that rejects every change of `kind`.
    pub fn rejecting(kind: MutationKind) -> Self {
        RecordingHost {
            reject: Some(kind),
            ..Default::default()
        }
    }

    /// Accepted changes, oldest first.
    pub async fn recorded(&self) -> Vec<RecordedMutation> {
        self.applied.lock().await.clone()
    }

    /// Accepted change records without timestamps.
    pub async fn mutations(&self) -> Vec<CheckoutMutation> {
        self.applied
            .lock()
            .await
            .iter()
            .map(|r| r.mutation.clone())
            .collect()
    }

    async fn record(&self, mutation: CheckoutMutation) -> HostResult<()> {
        if self.reject == Some(MutationKind::of(&mutation)) {
            return Err(HostError::Rejected {
                reason: format!("{:?} changes are disabled", MutationKind::of(&mutation)),
            });
        }

        self.applied.lock().await.push(RecordedMutation {
            mutation,
            applied_at: Utc::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl CheckoutHost for RecordingHost {
    async fn apply_attribute_change(&self, key: &str, value: &str) -> HostResult<()> {
        self.record(CheckoutMutation::attribute(key, value)).await
    }

    async fn apply_shipping_address_change(&self, address: &MailingAddress) -> HostResult<()> {
        self.record(CheckoutMutation::shipping_address(address.clone()))
            .await
    }
}

//! Payment processor integration.
//!
//! The processor is the source of truth for payment status: local state is
//! only written after it reports a session as `paid`. Handlers talk to a
//! [`PaymentProvider`] trait object so tests can substitute the
//! deterministic [`mock::MockPaymentProvider`] for the real
//! [`stripe::StripeClient`].

pub mod mock;
pub mod stripe;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Session status reported by the processor once the payer has completed
/// checkout. Anything else must not produce local state.
pub const PAYMENT_STATUS_PAID: &str = "paid";

/// Opaque tags attached to a checkout session at creation and read back
/// during reconciliation. Key names are part of the wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(rename = "contestId", default)]
    pub contest_id: String,
    #[serde(rename = "userEmail", default)]
    pub user_email: String,
    #[serde(rename = "contestName", default)]
    pub contest_name: String,
}

/// Snapshot of a checkout session as reported by the processor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect URL for the payer to complete checkout. Present on freshly
    /// created sessions.
    pub url: Option<String>,
    /// `paid`, `unpaid`, or `no_payment_required`.
    pub payment_status: String,
    /// The stable transaction id. Set once payment settles; a session may be
    /// retried or regenerated, the transaction id is the dedup key.
    pub payment_intent: Option<String>,
    /// Total charged, in minor units.
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub metadata: SessionMetadata,
}

/// Inputs for opening a single-use checkout session.
#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    pub contest_id: i32,
    pub contest_name: String,
    /// Line-item amount in minor units.
    pub unit_amount: i64,
    pub user_email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP call to the processor could not be completed.
    #[error("payment provider request failed: {0}")]
    Request(String),

    /// The processor rejected the call. Contains the processor's message.
    #[error("{0}")]
    Api(String),

    /// No session with the given id exists.
    #[error("checkout session not found: {0}")]
    SessionNotFound(String),
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Open a single-use checkout session in `payment` mode with one line
    /// item, tagged with the contest/payer metadata.
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<CheckoutSession, ProviderError>;

    /// Fetch the current state of a checkout session.
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError>;
}

/// Convert a decimal currency amount to integer minor units (cents).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Convert integer minor units back to a decimal currency amount.
pub fn from_minor_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

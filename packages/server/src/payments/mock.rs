//! Mock payment provider for tests and demos.
//!
//! Sessions are held in memory. `create_session` issues deterministic
//! `cs_test_N` ids and leaves the session `unpaid`; tests drive it to the
//! settled state with [`MockPaymentProvider::mark_paid`], which assigns the
//! transaction id, or seed arbitrary sessions with
//! [`MockPaymentProvider::insert_session`].

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use super::{
    CheckoutSession, CreateSessionParams, PAYMENT_STATUS_PAID, PaymentProvider, ProviderError,
    SessionMetadata,
};

#[derive(Default)]
pub struct MockPaymentProvider {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    counter: AtomicU32,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session in an arbitrary state.
    pub fn insert_session(&self, session: CheckoutSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session);
    }

    /// Settle a session: sets `payment_status` to `paid` and assigns the
    /// given transaction id.
    ///
    /// # Panics
    ///
    /// Panics if the session does not exist; tests seed before settling.
    pub fn mark_paid(&self, session_id: &str, transaction_id: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .get_mut(session_id)
            .unwrap_or_else(|| panic!("unknown mock session '{session_id}'"));
        session.payment_status = PAYMENT_STATUS_PAID.to_string();
        session.payment_intent = Some(transaction_id.to_string());
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<CheckoutSession, ProviderError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("cs_test_{n}");

        let session = CheckoutSession {
            id: id.clone(),
            url: Some(format!("https://checkout.mock.local/pay/{id}")),
            payment_status: "unpaid".to_string(),
            payment_intent: None,
            amount_total: Some(params.unit_amount),
            metadata: SessionMetadata {
                contest_id: params.contest_id.to_string(),
                user_email: params.user_email,
                contest_name: params.contest_name,
            },
        };

        self.insert_session(session.clone());
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| ProviderError::SessionNotFound(session_id.to_string()))
    }
}

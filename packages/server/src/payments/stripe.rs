use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use super::{CheckoutSession, CreateSessionParams, PaymentProvider, ProviderError};
use crate::config::StripeConfig;

const API_BASE: &str = "https://api.stripe.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Checkout Sessions client for the Stripe HTTP API.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    client_origin: String,
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            http,
            secret_key: config.secret_key.clone(),
            client_origin: config.client_origin.trim_end_matches('/').to_string(),
        })
    }

    async fn read_session(
        &self,
        response: reqwest::Response,
        session_id: Option<&str>,
    ) -> Result<CheckoutSession, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<CheckoutSession>()
                .await
                .map_err(|e| ProviderError::Request(e.to_string()));
        }

        if status == reqwest::StatusCode::NOT_FOUND
            && let Some(id) = session_id
        {
            return Err(ProviderError::SessionNotFound(id.to_string()));
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error.message)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(ProviderError::Api(message))
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    #[instrument(skip(self, params), fields(contest_id = params.contest_id))]
    async fn create_session(
        &self,
        params: CreateSessionParams,
    ) -> Result<CheckoutSession, ProviderError> {
        let contest_id = params.contest_id.to_string();
        let unit_amount = params.unit_amount.to_string();
        let success_url = format!(
            "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
            self.client_origin
        );
        let cancel_url = format!("{}/payment-cancelled", self.client_origin);

        let form: &[(&str, &str)] = &[
            ("mode", "payment"),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", "usd"),
            ("line_items[0][price_data][unit_amount]", &unit_amount),
            (
                "line_items[0][price_data][product_data][name]",
                &params.contest_name,
            ),
            ("success_url", &success_url),
            ("cancel_url", &cancel_url),
            ("metadata[contestId]", &contest_id),
            ("metadata[userEmail]", &params.user_email),
            ("metadata[contestName]", &params.contest_name),
        ];

        let response = self
            .http
            .post(format!("{API_BASE}/checkout/sessions"))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        self.read_session(response, None).await
    }

    #[instrument(skip(self))]
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, ProviderError> {
        let response = self
            .http
            .get(format!("{API_BASE}/checkout/sessions/{session_id}"))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        self.read_session(response, Some(session_id)).await
    }
}

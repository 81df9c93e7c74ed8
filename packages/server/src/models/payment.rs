use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_email;
use crate::entity::payment;
use crate::error::AppError;

/// Body of `POST /create-checkout-session`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub contest_id: i32,
    pub contest_name: String,
    /// Decimal currency amount; converted to minor units for the processor.
    #[schema(example = 19.99)]
    pub amount: f64,
    pub user_email: String,
}

pub fn validate_create_checkout(req: &CreateCheckoutRequest) -> Result<(), AppError> {
    if req.contest_id <= 0 {
        return Err(AppError::Validation("contestId is required".into()));
    }
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(AppError::Validation(
            "amount must be a positive amount".into(),
        ));
    }
    validate_email(&req.user_email)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateCheckoutResponse {
    /// Redirect URL where the payer completes checkout.
    pub url: String,
}

/// Body of `POST /confirm-payment`. The field name matches the query
/// parameter the processor appends to the success redirect.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ConfirmPaymentRequest {
    pub session_id: String,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: i32,
    pub email: String,
    pub price: f64,
    pub transaction_id: String,
    pub date: DateTime<Utc>,
    pub contest_id: i32,
    pub contest_name: String,
    pub status: String,
}

impl From<payment::Model> for PaymentResponse {
    fn from(m: payment::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            price: m.price,
            transaction_id: m.transaction_id,
            date: m.date,
            contest_id: m.contest_id,
            contest_name: m.contest_name,
            status: m.status,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentResponse {
    pub success: bool,
    /// Present on success; `true` when this confirmation was a replay of an
    /// already-reconciled transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_processed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResponse>,
    /// Present when the session was not paid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConfirmPaymentResponse {
    pub fn confirmed(payment: PaymentResponse, already_processed: bool) -> Self {
        Self {
            success: true,
            already_processed: Some(already_processed),
            payment_result: Some(payment),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            already_processed: None,
            payment_result: None,
            message: Some(message.into()),
        }
    }
}

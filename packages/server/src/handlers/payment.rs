use axum::Json;
use axum::extract::{Path, State};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{contest, payment};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::payment::*;
use crate::payments::{self, CreateSessionParams, PAYMENT_STATUS_PAID};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/create-checkout-session",
    tag = "Payments",
    operation_id = "createCheckoutSession",
    summary = "Open a checkout session for a contest entry",
    description = "Opens a single-use session with the payment processor and returns its redirect URL. No local state is written; local effects happen only on confirmation.",
    request_body = CreateCheckoutRequest,
    responses(
        (status = 200, description = "Session created", body = CreateCheckoutResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 500, description = "Processor call failed (PAYMENT_PROVIDER_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(contest_id = payload.contest_id))]
pub async fn create_checkout_session(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCheckoutRequest>,
) -> Result<Json<CreateCheckoutResponse>, AppError> {
    validate_create_checkout(&payload)?;

    let session = state
        .payments
        .create_session(CreateSessionParams {
            contest_id: payload.contest_id,
            contest_name: payload.contest_name,
            unit_amount: payments::to_minor_units(payload.amount),
            user_email: payload.user_email,
        })
        .await?;

    let url = session.url.ok_or_else(|| {
        AppError::PaymentProvider("checkout session has no redirect URL".into())
    })?;

    Ok(Json(CreateCheckoutResponse { url }))
}

/// Reconcile a completed checkout session with local state.
///
/// The processor is the source of truth: nothing is written unless it
/// reports the session as `paid`. The write itself is a conditional insert
/// keyed by the processor's stable transaction id — the unique index on
/// `payment.transaction_id` makes replays (page refresh after redirect,
/// client retries, a regenerated session for the same settled transaction)
/// land on the unique-violation path, which returns the existing record and
/// leaves the participation counter alone. Insert and increment share one
/// transaction, so a payment row and its counter bump are inseparable.
#[utoipa::path(
    post,
    path = "/confirm-payment",
    tag = "Payments",
    operation_id = "confirmPayment",
    summary = "Confirm a checkout session and record the entry",
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Outcome of the reconciliation; `success: false` with a message when the session is not paid", body = ConfirmPaymentResponse),
        (status = 400, description = "Session is not a contest-entry session (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown session or contest (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Processor call failed (PAYMENT_PROVIDER_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(session_id = %payload.session_id))]
pub async fn confirm_payment(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmPaymentResponse>, AppError> {
    let session = state.payments.retrieve_session(&payload.session_id).await?;

    if session.payment_status != PAYMENT_STATUS_PAID {
        tracing::debug!(
            payment_status = %session.payment_status,
            "Confirmation rejected: session not paid"
        );
        return Ok(Json(ConfirmPaymentResponse::rejected(
            "Payment not completed",
        )));
    }

    let transaction_id = session.payment_intent.ok_or_else(|| {
        AppError::PaymentProvider("paid session has no payment intent".into())
    })?;
    let amount_total = session
        .amount_total
        .ok_or_else(|| AppError::PaymentProvider("paid session has no amount".into()))?;
    let contest_id: i32 = session.metadata.contest_id.parse().map_err(|_| {
        AppError::Validation("session metadata is missing a contest id".into())
    })?;

    let txn = state.db.begin().await?;
    super::contest::find_contest_for_update(&txn, contest_id).await?;

    let new_payment = payment::ActiveModel {
        email: Set(session.metadata.user_email),
        price: Set(payments::from_minor_units(amount_total)),
        transaction_id: Set(transaction_id.clone()),
        date: Set(chrono::Utc::now()),
        contest_id: Set(contest_id),
        contest_name: Set(session.metadata.contest_name),
        status: Set(payment::STATUS_SUCCEEDED.to_string()),
        ..Default::default()
    };

    match new_payment.insert(&txn).await {
        Ok(model) => {
            contest::Entity::update_many()
                .col_expr(
                    contest::Column::ParticipationCount,
                    Expr::col(contest::Column::ParticipationCount).add(1),
                )
                .filter(contest::Column::Id.eq(contest_id))
                .exec(&txn)
                .await?;
            txn.commit().await?;

            tracing::info!(
                contest_id,
                transaction_id = %transaction_id,
                "Payment confirmed"
            );

            Ok(Json(ConfirmPaymentResponse::confirmed(model.into(), false)))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            txn.rollback().await?;

            let existing = payment::Entity::find()
                .filter(payment::Column::TransactionId.eq(&transaction_id))
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "transaction '{transaction_id}' hit the unique constraint but was not found"
                    ))
                })?;

            tracing::debug!(
                transaction_id = %transaction_id,
                "Replayed confirmation for an already-settled transaction"
            );

            Ok(Json(ConfirmPaymentResponse::confirmed(existing.into(), true)))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/{email}",
    tag = "Payments",
    operation_id = "paymentHistory",
    summary = "The caller's payment history",
    params(("email" = String, Path, description = "Payer email")),
    responses(
        (status = 200, description = "Payments, newest first", body = Vec<PaymentResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn payment_history(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    auth_user.require_self(&email)?;

    let payments = payment::Entity::find()
        .filter(payment::Column::Email.eq(&email))
        .order_by_desc(payment::Column::Date)
        .all(&state.db)
        .await?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::shared::validate_email;
use crate::models::user::{TokenRequest, TokenResponse};
use crate::state::AppState;
use crate::utils::jwt;

/// Mint a bearer token for a signed-in identity.
///
/// The client's auth provider has already verified the identity; this
/// endpoint only binds the email into a short-lived token.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    operation_id = "issueToken",
    summary = "Issue a bearer token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn issue_token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate_email(&payload.email)?;

    let token = jwt::sign(payload.email.trim(), &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    Ok(Json(TokenResponse { token }))
}

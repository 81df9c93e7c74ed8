use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::contest::{delete_contest_tree, find_contest_for_update};
use crate::entity::{contest, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::contest::ContestResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/contests",
    tag = "Admin",
    operation_id = "listAllContests",
    summary = "List every contest, pending included",
    responses(
        (status = 200, description = "All contests, newest first", body = Vec<ContestResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_all_contests(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContestResponse>>, AppError> {
    auth_user.require_role(&state.db, user::ROLE_ADMIN).await?;

    let contests = contest::Entity::find()
        .order_by_desc(contest::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(contests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    patch,
    path = "/admin/contests/{id}",
    tag = "Admin",
    operation_id = "approveContest",
    summary = "Approve a pending contest",
    description = "Idempotent: approving an already-approved contest is a no-op.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest approved", body = ContestResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn approve_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestResponse>, AppError> {
    auth_user.require_role(&state.db, user::ROLE_ADMIN).await?;

    let txn = state.db.begin().await?;
    let existing = find_contest_for_update(&txn, id).await?;

    if existing.status == contest::STATUS_APPROVED {
        txn.commit().await?;
        return Ok(Json(existing.into()));
    }

    let mut active: contest::ActiveModel = existing.into();
    active.status = Set(contest::STATUS_APPROVED.to_string());
    let model = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(contest_id = id, "Contest approved");

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/admin/contests/{id}",
    tag = "Admin",
    operation_id = "removeContest",
    summary = "Remove any contest",
    description = "Deletes the contest together with its submissions and payment records.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 204, description = "Contest removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn remove_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_role(&state.db, user::ROLE_ADMIN).await?;

    let txn = state.db.begin().await?;
    find_contest_for_update(&txn, id).await?;
    delete_contest_tree(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(contest_id = id, "Contest removed by admin");

    Ok(StatusCode::NO_CONTENT)
}

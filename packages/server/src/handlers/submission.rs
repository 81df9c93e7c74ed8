use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use super::contest::{find_contest, require_owner};
use crate::entity::{payment, submission, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::submission::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/submissions",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a completed task",
    description = "Participation is unlocked by payment: the caller must hold a succeeded payment for the contest. Submissions close at the deadline.",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 201, description = "Submission recorded", body = SubmissionResponse),
        (status = 400, description = "Validation error or deadline passed (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "No paid entry for this contest (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(contest_id = payload.contest_id))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_submission(&payload)?;

    let participant = auth_user.require_account(&state.db).await?;
    let contest = find_contest(&state.db, payload.contest_id).await?;

    if chrono::Utc::now() >= contest.deadline {
        return Err(AppError::Validation("Contest deadline has passed".into()));
    }

    let paid = payment::Entity::find()
        .filter(payment::Column::ContestId.eq(contest.id))
        .filter(payment::Column::Email.eq(&participant.email))
        .filter(payment::Column::Status.eq(payment::STATUS_SUCCEEDED))
        .one(&state.db)
        .await?
        .is_some();
    if !paid {
        return Err(AppError::PermissionDenied);
    }

    let new_submission = submission::ActiveModel {
        contest_id: Set(contest.id),
        user_id: Set(participant.id),
        participant_email: Set(participant.email),
        participant_name: Set(participant.name),
        task_url: Set(payload.task_url.trim().to_string()),
        date: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_submission.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/submissions/contest/{id}",
    tag = "Submissions",
    operation_id = "contestSubmissions",
    summary = "List a contest's submissions for judging",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Submissions, oldest first", body = Vec<SubmissionResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id))]
pub async fn contest_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let creator = auth_user.require_role(&state.db, user::ROLE_CREATOR).await?;
    let contest = find_contest(&state.db, contest_id).await?;
    require_owner(&contest, &creator.email)?;

    let submissions = submission::Entity::find()
        .filter(submission::Column::ContestId.eq(contest_id))
        .order_by_asc(submission::Column::Date)
        .all(&state.db)
        .await?;

    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

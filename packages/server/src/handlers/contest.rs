use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{contest, payment, submission, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contest::*;
use crate::models::shared::escape_like;
use crate::state::AppState;

/// How many contests `GET /contests/popular` returns.
const POPULAR_LIMIT: u64 = 6;

#[utoipa::path(
    get,
    path = "/contests",
    tag = "Contests",
    operation_id = "listContests",
    summary = "List approved contests with filtering and pagination",
    description = "Public. `search` is a case-insensitive substring match on the category tag, `type` an exact match. Pages are 1-indexed, default page 1 and limit 10; `count` is the total match count across all pages.",
    params(ContestListQuery),
    responses(
        (status = 200, description = "One page of contests", body = ContestListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_contests(
    State(state): State<AppState>,
    Query(query): Query<ContestListQuery>,
) -> Result<Json<ContestListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let mut select =
        contest::Entity::find().filter(contest::Column::Status.eq(contest::STATUS_APPROVED));

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(contest::Column::ContestType)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    if let Some(ref contest_type) = query.contest_type {
        select = select.filter(contest::Column::ContestType.eq(contest_type));
    }

    let count = select.clone().count(&state.db).await?;

    let result = select
        .order_by_asc(contest::Column::Id)
        .offset((page - 1) * limit)
        .limit(limit)
        .all(&state.db)
        .await?
        .into_iter()
        .map(ContestResponse::from)
        .collect();

    Ok(Json(ContestListResponse { result, count }))
}

#[utoipa::path(
    get,
    path = "/contests/popular",
    tag = "Contests",
    operation_id = "popularContests",
    summary = "Top contests by participation",
    responses(
        (status = 200, description = "Up to six approved contests, most-entered first", body = Vec<ContestResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn popular_contests(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContestResponse>>, AppError> {
    let contests = contest::Entity::find()
        .filter(contest::Column::Status.eq(contest::STATUS_APPROVED))
        .order_by_desc(contest::Column::ParticipationCount)
        .order_by_asc(contest::Column::Id)
        .limit(POPULAR_LIMIT)
        .all(&state.db)
        .await?;

    Ok(Json(contests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/contests/{id}",
    tag = "Contests",
    operation_id = "getContest",
    summary = "Get a contest by ID",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest details", body = ContestResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestResponse>, AppError> {
    let model = find_contest(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/contests",
    tag = "Contests",
    operation_id = "createContest",
    summary = "Create a new contest",
    description = "Requires the creator role. New contests start `pending` until an admin approves them.",
    request_body = ContestRequest,
    responses(
        (status = 201, description = "Contest created", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let creator = auth_user.require_role(&state.db, user::ROLE_CREATOR).await?;
    validate_contest_request(&payload)?;

    let tags =
        serde_json::to_value(&payload.tags).map_err(|e| AppError::Internal(e.to_string()))?;

    let new_contest = contest::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        image: Set(payload.image),
        description: Set(payload.description),
        price: Set(payload.price),
        prize: Set(payload.prize),
        task_instruction: Set(payload.task_instruction),
        contest_type: Set(payload.contest_type),
        tags: Set(tags),
        deadline: Set(payload.deadline),
        creator_name: Set(creator.name),
        creator_email: Set(creator.email),
        creator_image: Set(creator.image),
        status: Set(contest::STATUS_PENDING.to_string()),
        participation_count: Set(0),
        winner_id: Set(None),
        ..Default::default()
    };

    let model = new_contest.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ContestResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/contests/{id}",
    tag = "Contests",
    operation_id = "updateContest",
    summary = "Update an own contest",
    description = "Requires the creator role and ownership. Replaces the content fields; status, participation count, and winner are untouched.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = ContestRequest,
    responses(
        (status = 200, description = "Contest updated", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ContestRequest>,
) -> Result<Json<ContestResponse>, AppError> {
    let creator = auth_user.require_role(&state.db, user::ROLE_CREATOR).await?;
    validate_contest_request(&payload)?;

    let existing = find_contest(&state.db, id).await?;
    require_owner(&existing, &creator.email)?;

    let tags =
        serde_json::to_value(&payload.tags).map_err(|e| AppError::Internal(e.to_string()))?;

    let mut active: contest::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());
    active.image = Set(payload.image);
    active.description = Set(payload.description);
    active.price = Set(payload.price);
    active.prize = Set(payload.prize);
    active.task_instruction = Set(payload.task_instruction);
    active.contest_type = Set(payload.contest_type);
    active.tags = Set(tags);
    active.deadline = Set(payload.deadline);

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/contests/{id}",
    tag = "Contests",
    operation_id = "deleteContest",
    summary = "Delete an own pending contest",
    description = "Requires the creator role and ownership. Approved contests cannot be deleted by their creator; entries may already be paid.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 204, description = "Contest deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Contest already approved (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let creator = auth_user.require_role(&state.db, user::ROLE_CREATOR).await?;

    let txn = state.db.begin().await?;
    let existing = find_contest_for_update(&txn, id).await?;
    require_owner(&existing, &creator.email)?;

    if existing.status != contest::STATUS_PENDING {
        return Err(AppError::Conflict(
            "Approved contests cannot be deleted".into(),
        ));
    }

    delete_contest_tree(&txn, id).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/contests/creator/{email}",
    tag = "Contests",
    operation_id = "creatorContests",
    summary = "List the caller's own contests",
    params(("email" = String, Path, description = "Creator email")),
    responses(
        (status = 200, description = "Contests created by the caller, pending included", body = Vec<ContestResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn creator_contests(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<ContestResponse>>, AppError> {
    auth_user.require_role(&state.db, user::ROLE_CREATOR).await?;
    auth_user.require_self(&email)?;

    let contests = contest::Entity::find()
        .filter(contest::Column::CreatorEmail.eq(&email))
        .order_by_asc(contest::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(contests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    patch,
    path = "/contests/winner/{id}",
    tag = "Contests",
    operation_id = "declareWinner",
    summary = "Declare a contest winner",
    description = "Requires the creator role and ownership. The winner can be declared once, only after the deadline, and must have submitted to the contest.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = DeclareWinnerRequest,
    responses(
        (status = 200, description = "Winner declared", body = ContestResponse),
        (status = 400, description = "Deadline not passed or winner never submitted (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Winner already declared (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, winner_id = payload.winner_id))]
pub async fn declare_winner(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<DeclareWinnerRequest>,
) -> Result<Json<ContestResponse>, AppError> {
    let creator = auth_user.require_role(&state.db, user::ROLE_CREATOR).await?;

    let txn = state.db.begin().await?;
    let existing = find_contest_for_update(&txn, id).await?;
    require_owner(&existing, &creator.email)?;

    if existing.winner_id.is_some() {
        return Err(AppError::Conflict("Winner already declared".into()));
    }
    if chrono::Utc::now() < existing.deadline {
        return Err(AppError::Validation(
            "Contest deadline has not passed".into(),
        ));
    }

    user::Entity::find_by_id(payload.winner_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let submitted = submission::Entity::find()
        .filter(submission::Column::ContestId.eq(id))
        .filter(submission::Column::UserId.eq(payload.winner_id))
        .one(&txn)
        .await?
        .is_some();
    if !submitted {
        return Err(AppError::Validation(
            "Winner must have submitted to the contest".into(),
        ));
    }

    let mut active: contest::ActiveModel = existing.into();
    active.winner_id = Set(Some(payload.winner_id));
    let model = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(contest_id = id, winner_id = payload.winner_id, "Winner declared");

    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/contests/won/{email}",
    tag = "Contests",
    operation_id = "wonContests",
    summary = "List contests won by a user",
    params(("email" = String, Path, description = "Winner email")),
    responses(
        (status = 200, description = "Contests the user has won", body = Vec<ContestResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn won_contests(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<ContestResponse>>, AppError> {
    let Some(winner) = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
    else {
        return Ok(Json(Vec::new()));
    };

    let contests = contest::Entity::find()
        .filter(contest::Column::WinnerId.eq(winner.id))
        .order_by_asc(contest::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(contests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/contests/registered/{email}",
    tag = "Contests",
    operation_id = "registeredContests",
    summary = "List contests the caller has paid to enter",
    params(("email" = String, Path, description = "Participant email")),
    responses(
        (status = 200, description = "Entered contests, soonest deadline first", body = Vec<ContestResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn registered_contests(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<ContestResponse>>, AppError> {
    auth_user.require_self(&email)?;

    let contest_ids: Vec<i32> = payment::Entity::find()
        .filter(payment::Column::Email.eq(&email))
        .filter(payment::Column::Status.eq(payment::STATUS_SUCCEEDED))
        .select_only()
        .column(payment::Column::ContestId)
        .into_tuple()
        .all(&state.db)
        .await?;

    if contest_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let contests = contest::Entity::find()
        .filter(contest::Column::Id.is_in(contest_ids))
        .order_by_asc(contest::Column::Deadline)
        .all(&state.db)
        .await?;

    Ok(Json(contests.into_iter().map(Into::into).collect()))
}

pub(crate) async fn find_contest<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<contest::Model, AppError> {
    contest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

pub(crate) async fn find_contest_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<contest::Model, AppError> {
    use sea_orm::sea_query::LockType;
    contest::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

pub(crate) fn require_owner(model: &contest::Model, email: &str) -> Result<(), AppError> {
    if model.creator_email == email {
        Ok(())
    } else {
        Err(AppError::PermissionDenied)
    }
}

/// Delete a contest together with its submissions and payments.
pub(crate) async fn delete_contest_tree(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<(), AppError> {
    submission::Entity::delete_many()
        .filter(submission::Column::ContestId.eq(id))
        .exec(txn)
        .await?;
    payment::Entity::delete_many()
        .filter(payment::Column::ContestId.eq(id))
        .exec(txn)
        .await?;
    contest::Entity::delete_by_id(id).exec(txn).await?;
    Ok(())
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::user::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    operation_id = "createUser",
    summary = "Create a user on first sign-in",
    description = "Idempotent per email: a repeat sign-in returns the existing record unchanged.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 200, description = "User already existed", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_user(&payload)?;

    let email = payload.email.trim().to_string();
    let new_user = user::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(email.clone()),
        image: Set(payload.image),
        role: Set(user::DEFAULT_ROLE.to_string()),
        address: Set(String::new()),
        bio: Set(String::new()),
        ..Default::default()
    };

    match new_user.insert(&state.db).await {
        Ok(model) => Ok((StatusCode::CREATED, Json(UserResponse::from(model)))),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            let existing = user::Entity::find()
                .filter(user::Column::Email.eq(&email))
                .one(&state.db)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "user '{email}' hit the unique constraint but was not found"
                    ))
                })?;
            Ok((StatusCode::OK, Json(UserResponse::from(existing))))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List all users",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    auth_user.require_role(&state.db, user::ROLE_ADMIN).await?;

    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{email}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Fetch the caller's own user record",
    params(("email" = String, Path, description = "Principal email")),
    responses(
        (status = 200, description = "User record", body = UserResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_self(&email)?;

    let user = find_user_by_email(&state.db, &email).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/users/{email}",
    tag = "Users",
    operation_id = "updateProfile",
    summary = "Self-service profile update",
    params(("email" = String, Path, description = "Principal email")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_self(&email)?;
    validate_update_profile(&payload)?;

    let existing = find_user_by_email(&state.db, &email).await?;
    let mut active: user::ActiveModel = existing.into();

    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(bio);
    }

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/users/role/{id}",
    tag = "Users",
    operation_id = "updateRole",
    summary = "Change a user's role",
    description = "Admin only. The new role binds on the target's next request; roles are read from the store per request, never cached.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_role(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_role(&state.db, user::ROLE_ADMIN).await?;
    validate_update_role(&payload)?;

    let existing = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let mut active: user::ActiveModel = existing.into();
    active.role = Set(payload.role.clone());
    let model = active.update(&state.db).await?;

    tracing::info!(user_id = id, role = %payload.role, "Role changed");

    Ok(Json(model.into()))
}

async fn find_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<user::Model, AppError> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

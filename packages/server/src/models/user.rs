use serde::{Deserialize, Serialize};

use super::shared::{validate_email, validate_required};
use crate::entity::user;
use crate::error::AppError;

/// Body of `POST /jwt`. The client's auth provider has already verified the
/// identity; only the email ends up in the token.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct TokenRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    /// Bearer token valid for one hour.
    pub token: String,
}

/// Body of `POST /users` — the first-sign-in upsert.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    pub image: Option<String>,
}

pub fn validate_create_user(req: &CreateUserRequest) -> Result<(), AppError> {
    validate_required(&req.name, "name")?;
    validate_email(&req.email)
}

/// Body of `PUT /users/{email}` — self-service profile edits. Absent fields
/// are left unchanged.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

pub fn validate_update_profile(req: &UpdateProfileRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_required(name, "name")?;
    }
    Ok(())
}

/// Body of `PATCH /users/role/{id}`.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateRoleRequest {
    /// One of: user, creator, admin.
    #[schema(example = "creator")]
    pub role: String,
}

pub fn validate_update_role(req: &UpdateRoleRequest) -> Result<(), AppError> {
    if !user::ROLES.contains(&req.role.as_str()) {
        return Err(AppError::Validation(format!(
            "role must be one of: {}",
            user::ROLES.join(", ")
        )));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub address: String,
    pub bio: String,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            image: m.image,
            role: m.role,
            address: m.address,
            bio: m.bio,
        }
    }
}

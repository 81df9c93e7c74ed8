use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::*;

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated principal extracted from the `Authorization: Bearer <token>`
/// header.
///
/// Add this as a handler parameter to require authentication. Role checks
/// happen via [`AuthUser::require_role`] in the handler body.
pub struct AuthUser {
    pub email: String,
}

impl AuthUser {
    /// Load the caller's user record and require the given role.
    ///
    /// The role is read from the store on every call, never from the token,
    /// so a role change binds on the caller's very next request.
    pub async fn require_role(
        &self,
        db: &DatabaseConnection,
        role: &str,
    ) -> Result<user::Model, AppError> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(&self.email))
            .one(db)
            .await?;

        match user {
            Some(user) if user.role == role => Ok(user),
            _ => Err(AppError::PermissionDenied),
        }
    }

    /// Load the caller's user record, or fail with `PERMISSION_DENIED` when
    /// the principal has no account yet.
    pub async fn require_account(
        &self,
        db: &DatabaseConnection,
    ) -> Result<user::Model, AppError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(&self.email))
            .one(db)
            .await?
            .ok_or(AppError::PermissionDenied)
    }

    /// Require that the caller is operating on their own resource.
    pub fn require_self(&self, email: &str) -> Result<(), AppError> {
        if self.email == email {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser { email: claims.sub })
    }
}

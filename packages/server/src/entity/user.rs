use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The role assigned to users created on first sign-in.
pub const DEFAULT_ROLE: &str = "user";

pub const ROLE_USER: &str = "user";
pub const ROLE_CREATOR: &str = "creator";
pub const ROLE_ADMIN: &str = "admin";

/// All roles an account can hold.
pub const ROLES: &[&str] = &[ROLE_USER, ROLE_CREATOR, ROLE_ADMIN];

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub image: Option<String>,

    /// One of: user, creator, admin.
    pub role: String,
    pub address: String,
    pub bio: String,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::submission::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

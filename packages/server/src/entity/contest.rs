use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Freshly created contests await admin approval.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub image: String,
    pub description: String, // in Markdown
    /// Entry price as a decimal currency value.
    pub price: f64,
    pub prize: String,
    pub task_instruction: String,
    /// Category tag. Matched by the `type` and `search` listing filters.
    pub contest_type: String,
    /// Free-form tags stored as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub deadline: DateTimeUtc,

    /// Snapshot of the creator at creation time.
    pub creator_name: String,
    pub creator_email: String,
    pub creator_image: Option<String>,

    /// One of: pending, approved.
    pub status: String,
    /// Count of confirmed paid entries, incremented by payment confirmation.
    pub participation_count: i32,

    /// NULL until the creator declares a winner.
    pub winner_id: Option<i32>,
    #[sea_orm(belongs_to, from = "winner_id", to = "id")]
    pub winner: BelongsTo<Option<super::user::Entity>>,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_SUCCEEDED: &str = "succeeded";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Payer email.
    pub email: String,
    pub price: f64,

    /// The processor's stable identifier for the settled payment.
    /// Unique: reconciliation dedups on this, not on the session id.
    #[sea_orm(unique)]
    pub transaction_id: String,

    pub date: DateTimeUtc,

    pub contest_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,
    /// Denormalized for payment-history display.
    pub contest_name: String,

    /// One of: pending, succeeded.
    pub status: String,
}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_required;
use crate::entity::contest;
use crate::error::AppError;

/// Body of `POST /contests` and `PUT /contests/{id}`. Wire names follow the
/// original clients (camelCase, category tag under `type`).
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContestRequest {
    pub name: String,
    pub image: String,
    pub description: String,
    /// Entry price as a decimal currency value.
    #[schema(example = 19.99)]
    pub price: f64,
    pub prize: String,
    pub task_instruction: String,
    /// Category tag.
    #[serde(rename = "type")]
    #[schema(example = "design")]
    pub contest_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub deadline: DateTime<Utc>,
}

pub fn validate_contest_request(req: &ContestRequest) -> Result<(), AppError> {
    validate_required(&req.name, "name")?;
    validate_required(&req.image, "image")?;
    validate_required(&req.description, "description")?;
    validate_required(&req.prize, "prize")?;
    validate_required(&req.task_instruction, "taskInstruction")?;
    validate_required(&req.contest_type, "type")?;
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(AppError::Validation(
            "price must be a non-negative amount".into(),
        ));
    }
    Ok(())
}

/// Body of `PATCH /contests/winner/{id}`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclareWinnerRequest {
    pub winner_id: i32,
}

/// Query parameters of `GET /contests`.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ContestListQuery {
    /// Case-insensitive substring match on the category tag.
    pub search: Option<String>,
    /// Exact category match.
    #[serde(rename = "type")]
    pub contest_type: Option<String>,
    /// 1-indexed page, default 1.
    pub page: Option<u64>,
    /// Page size, default 10.
    pub limit: Option<u64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreatorInfo {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContestResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: f64,
    pub prize: String,
    pub task_instruction: String,
    #[serde(rename = "type")]
    pub contest_type: String,
    pub tags: Vec<String>,
    pub deadline: DateTime<Utc>,
    pub creator: CreatorInfo,
    pub status: String,
    pub participation_count: i32,
    pub winner_id: Option<i32>,
}

impl From<contest::Model> for ContestResponse {
    fn from(m: contest::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            image: m.image,
            description: m.description,
            price: m.price,
            prize: m.prize,
            task_instruction: m.task_instruction,
            contest_type: m.contest_type,
            tags: serde_json::from_value(m.tags).unwrap_or_default(),
            deadline: m.deadline,
            creator: CreatorInfo {
                name: m.creator_name,
                email: m.creator_email,
                image: m.creator_image,
            },
            status: m.status,
            participation_count: m.participation_count,
            winner_id: m.winner_id,
        }
    }
}

/// Envelope of `GET /contests`: one page of results plus the total match
/// count across all pages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestListResponse {
    pub result: Vec<ContestResponse>,
    pub count: u64,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::submission;
use crate::error::AppError;

/// Body of `POST /submissions`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    pub contest_id: i32,
    /// URL of the completed task.
    #[schema(example = "https://drive.example.com/task/abc")]
    pub task_url: String,
}

pub fn validate_create_submission(req: &CreateSubmissionRequest) -> Result<(), AppError> {
    if req.contest_id <= 0 {
        return Err(AppError::Validation("contestId is required".into()));
    }
    let url = req.task_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::Validation("taskUrl must be an http(s) URL".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: i32,
    pub contest_id: i32,
    pub user_id: i32,
    pub participant_email: String,
    pub participant_name: String,
    pub task_url: String,
    pub date: DateTime<Utc>,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(m: submission::Model) -> Self {
        Self {
            id: m.id,
            contest_id: m.contest_id,
            user_id: m.user_id,
            participant_email: m.participant_email,
            participant_name: m.participant_name,
            task_url: m.task_url,
            date: m.date,
        }
    }
}

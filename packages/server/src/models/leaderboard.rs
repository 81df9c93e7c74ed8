use serde::Serialize;

/// One leaderboard row: a winner with their win count and display fields.
#[derive(Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub winner_id: i32,
    pub win_count: i64,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

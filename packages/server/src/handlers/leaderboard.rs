use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{contest, user};
use crate::error::AppError;
use crate::models::leaderboard::LeaderboardEntry;
use crate::state::AppState;

/// Winner display fields as pulled from the user table.
type WinnerRow = (i32, String, String, Option<String>);

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "Leaderboard",
    operation_id = "leaderboard",
    summary = "Winners ranked by win count",
    description = "Groups contests with a declared winner by winner, joins user display fields, and sorts by win count descending. Winnerless contests are excluded; ties break on winner id ascending.",
    responses(
        (status = 200, description = "The full leaderboard", body = Vec<LeaderboardEntry>),
    ),
)]
#[instrument(skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let wins: Vec<(Option<i32>, i64)> = contest::Entity::find()
        .select_only()
        .column(contest::Column::WinnerId)
        .column_as(contest::Column::Id.count(), "win_count")
        .filter(contest::Column::WinnerId.is_not_null())
        .group_by(contest::Column::WinnerId)
        .into_tuple()
        .all(&state.db)
        .await?;

    let wins: Vec<(i32, i64)> = wins
        .into_iter()
        .filter_map(|(winner, count)| winner.map(|w| (w, count)))
        .collect();

    let winner_ids: Vec<i32> = wins.iter().map(|&(winner, _)| winner).collect();
    let users: Vec<WinnerRow> = if winner_ids.is_empty() {
        Vec::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(winner_ids))
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Name)
            .column(user::Column::Email)
            .column(user::Column::Image)
            .into_tuple()
            .all(&state.db)
            .await?
    };

    Ok(Json(build_leaderboard(wins, users)))
}

/// Merge win counts with winner display fields and order the board.
fn build_leaderboard(wins: Vec<(i32, i64)>, users: Vec<WinnerRow>) -> Vec<LeaderboardEntry> {
    let users: HashMap<i32, (String, String, Option<String>)> = users
        .into_iter()
        .map(|(id, name, email, image)| (id, (name, email, image)))
        .collect();

    let mut entries: Vec<LeaderboardEntry> = wins
        .into_iter()
        .filter_map(|(winner_id, win_count)| {
            users.get(&winner_id).map(|(name, email, image)| LeaderboardEntry {
                winner_id,
                win_count,
                name: name.clone(),
                email: email.clone(),
                image: image.clone(),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.win_count
            .cmp(&a.win_count)
            .then(a.winner_id.cmp(&b.winner_id))
    });
    entries
}

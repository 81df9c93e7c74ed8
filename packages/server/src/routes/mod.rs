use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::handlers;
use crate::state::AppState;

/// The full route table. Paths are flat, exactly as the original clients
/// expect them.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(contest_routes())
        .merge(admin_routes())
        .merge(payment_routes())
        .merge(submission_routes())
        .route("/leaderboard", get(handlers::leaderboard::leaderboard))
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/jwt", post(handlers::auth::issue_token))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/{email}",
            get(handlers::user::get_user).put(handlers::user::update_profile),
        )
        .route("/users/role/{id}", patch(handlers::user::update_role))
}

fn contest_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/contests",
            get(handlers::contest::list_contests).post(handlers::contest::create_contest),
        )
        .route("/contests/popular", get(handlers::contest::popular_contests))
        .route(
            "/contests/{id}",
            get(handlers::contest::get_contest)
                .put(handlers::contest::update_contest)
                .delete(handlers::contest::delete_contest),
        )
        .route(
            "/contests/creator/{email}",
            get(handlers::contest::creator_contests),
        )
        .route(
            "/contests/winner/{id}",
            patch(handlers::contest::declare_winner),
        )
        .route("/contests/won/{email}", get(handlers::contest::won_contests))
        .route(
            "/contests/registered/{email}",
            get(handlers::contest::registered_contests),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/contests", get(handlers::admin::list_all_contests))
        .route(
            "/admin/contests/{id}",
            patch(handlers::admin::approve_contest).delete(handlers::admin::remove_contest),
        )
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(handlers::payment::create_checkout_session),
        )
        .route("/confirm-payment", post(handlers::payment::confirm_payment))
        .route("/payments/{email}", get(handlers::payment::payment_history))
}

fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(handlers::submission::create_submission))
        .route(
            "/submissions/contest/{id}",
            get(handlers::submission::contest_submissions),
        )
}

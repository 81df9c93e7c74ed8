pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod payments;
pub mod routes;
pub mod state;
pub mod utils;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ContestHub API",
        version = "1.0.0",
        description = "API for the ContestHub contest-hosting platform"
    ),
    paths(
        handlers::auth::issue_token,
        handlers::user::create_user,
        handlers::user::list_users,
        handlers::user::get_user,
        handlers::user::update_profile,
        handlers::user::update_role,
        handlers::contest::list_contests,
        handlers::contest::popular_contests,
        handlers::contest::get_contest,
        handlers::contest::create_contest,
        handlers::contest::update_contest,
        handlers::contest::delete_contest,
        handlers::contest::creator_contests,
        handlers::contest::declare_winner,
        handlers::contest::won_contests,
        handlers::contest::registered_contests,
        handlers::admin::list_all_contests,
        handlers::admin::approve_contest,
        handlers::admin::remove_contest,
        handlers::payment::create_checkout_session,
        handlers::payment::confirm_payment,
        handlers::payment::payment_history,
        handlers::submission::create_submission,
        handlers::submission::contest_submissions,
        handlers::leaderboard::leaderboard,
    ),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "Users", description = "Accounts, profiles, and roles"),
        (name = "Contests", description = "Contest CRUD and listings"),
        (name = "Admin", description = "Moderation"),
        (name = "Payments", description = "Checkout and reconciliation"),
        (name = "Submissions", description = "Task submissions"),
        (name = "Leaderboard", description = "Winner rankings"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allow_origins.is_empty() {
        // The original deployment allowed any origin.
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);
    let api = ApiDoc::openapi();

    routes::routes()
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .layer(cors)
}

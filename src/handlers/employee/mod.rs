//! `/employee/*` - self service for employees (team leads and admins too)

pub mod dashboard;
pub mod settings;
pub mod timesheets;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route(
            "/timesheets",
            get(timesheets::list).post(timesheets::submit),
        )
        .route("/settings", get(settings::settings))
        // Unknown paths inside the area stay behind the gatekeeper
        .fallback(super::not_found)
}

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{admin, employee, health, home, not_found, session};
use crate::middleware::gatekeeper_middleware;
use crate::state::AppState;

/// Full application router.
///
/// The gatekeeper wraps only `/`, `/admin/*` and `/employee/*`; `/health`,
/// `/logout` and unknown paths outside those areas never pass through it.
pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/", get(home::root))
        .nest("/admin", admin::routes())
        .nest("/employee", employee::routes())
        .layer(from_fn_with_state(
            state.gatekeeper.clone(),
            gatekeeper_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/logout", post(session::logout))
        .merge(gated)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

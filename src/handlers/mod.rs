// handlers/mod.rs - request handlers grouped by area
//
// Gated (behind the gatekeeper): home (`/`), admin (`/admin/*`), employee (`/employee/*`)
// Ungated: health (`/health`), session (`/logout`)
pub mod admin;
pub mod employee;
pub mod health;
pub mod home;
pub mod session;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Fallback for unknown paths
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": true,
            "message": "Route not found",
            "code": "NOT_FOUND"
        })),
    )
}

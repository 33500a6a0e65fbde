use axum::extract::State;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::database::models::Employee;
use crate::database::Repository;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Settings {
    /// Identity as carried by the session token
    pub session: AuthUser,
    pub profile: Employee,
}

/// GET /employee/settings
pub async fn settings(user: AuthUser, State(pool): State<PgPool>) -> ApiResult<Settings> {
    let profile = Repository::<Employee>::new(pool).get(user.id).await?;
    Ok(ApiResponse::success(Settings {
        session: user,
        profile,
    }))
}

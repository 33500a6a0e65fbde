use axum::extract::State;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::database::models::{Employee, Timesheet};
use crate::database::{Bind, Repository};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct EmployeeDashboard {
    pub profile: Employee,
    pub timesheets: Vec<Timesheet>,
}

/// GET /employee - the caller's profile and timesheets
pub async fn dashboard(user: AuthUser, State(pool): State<PgPool>) -> ApiResult<EmployeeDashboard> {
    let profile = Repository::<Employee>::new(pool.clone()).get(user.id).await?;
    let timesheets = Repository::<Timesheet>::new(pool)
        .list_by("employee_id", Bind::BigInt(Some(user.id)))
        .await?;

    Ok(ApiResponse::success(EmployeeDashboard {
        profile,
        timesheets,
    }))
}

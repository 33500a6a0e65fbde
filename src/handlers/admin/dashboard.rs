use axum::extract::State;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::database::models::{Client, Employee, Project, Timesheet, TimesheetStatus};
use crate::database::{Bind, Repository};
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub employees: i64,
    pub clients: i64,
    pub projects: i64,
    pub pending_timesheets: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub user: AuthUser,
    pub counts: DashboardCounts,
}

/// GET /admin
pub async fn dashboard(user: AuthUser, State(pool): State<PgPool>) -> ApiResult<AdminDashboard> {
    let counts = DashboardCounts {
        employees: Repository::<Employee>::new(pool.clone()).count().await?,
        clients: Repository::<Client>::new(pool.clone()).count().await?,
        projects: Repository::<Project>::new(pool.clone()).count().await?,
        pending_timesheets: Repository::<Timesheet>::new(pool)
            .count_by(
                "status",
                Bind::Text(Some(TimesheetStatus::Submitted.as_str().to_string())),
            )
            .await?,
    };

    Ok(ApiResponse::success(AdminDashboard { user, counts }))
}

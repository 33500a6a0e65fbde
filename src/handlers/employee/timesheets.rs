use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use sqlx::PgPool;

use crate::auth::AuthUser;
use crate::database::models::{Timesheet, TimesheetFields, TimesheetStatus};
use crate::database::{Bind, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /employee/timesheets - own entries, newest first
pub async fn list(user: AuthUser, State(pool): State<PgPool>) -> ApiResult<Vec<Timesheet>> {
    let rows = Repository::<Timesheet>::new(pool)
        .list_by("employee_id", Bind::BigInt(Some(user.id)))
        .await?;
    Ok(ApiResponse::success(rows))
}

/// Pin a submission to the caller and the initial review state
fn prepare_submission(user: &AuthUser, mut fields: TimesheetFields) -> Result<TimesheetFields, ApiError> {
    if fields.work_date.is_none() {
        return Err(ApiError::bad_request("work_date is required"));
    }
    if fields.hours.is_none() {
        return Err(ApiError::bad_request("hours is required"));
    }
    fields.check_hours().map_err(ApiError::bad_request)?;

    fields.employee_id = Some(user.id);
    fields.status = Some(TimesheetStatus::Submitted);
    Ok(fields)
}

/// POST /employee/timesheets
pub async fn submit(
    user: AuthUser,
    State(pool): State<PgPool>,
    payload: Result<Json<TimesheetFields>, JsonRejection>,
) -> ApiResult<Timesheet> {
    let Json(fields) = payload?;
    let fields = prepare_submission(&user, fields)?;
    let row = Repository::<Timesheet>::new(pool).create(fields).await?;
    tracing::info!(employee_id = user.id, timesheet_id = row.id, "Timesheet submitted");
    Ok(ApiResponse::created(row))
}

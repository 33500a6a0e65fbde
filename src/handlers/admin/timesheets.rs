use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::database::models::{Timesheet, TimesheetFields, TimesheetStatus};
use crate::database::{Bind, Repository};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TimesheetQuery {
    pub status: Option<String>,
}

fn parse_status(raw: Option<&str>) -> Result<Option<TimesheetStatus>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase()))
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Unknown timesheet status '{}'", value))),
    }
}

/// GET /admin/timesheets[?status=submitted|approved|rejected]
pub async fn list(
    State(pool): State<PgPool>,
    Query(query): Query<TimesheetQuery>,
) -> ApiResult<Vec<Timesheet>> {
    let repo = Repository::<Timesheet>::new(pool);
    let rows = match parse_status(query.status.as_deref())? {
        Some(status) => {
            repo.list_by("status", Bind::Text(Some(status.as_str().to_string())))
                .await?
        }
        None => repo.list().await?,
    };
    Ok(ApiResponse::success(rows))
}

/// PATCH /admin/timesheets/:id - review or correct an entry
pub async fn update(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    payload: Result<Json<TimesheetFields>, JsonRejection>,
) -> ApiResult<Timesheet> {
    let Json(patch) = payload?;
    patch.check_hours().map_err(ApiError::bad_request)?;
    let row = Repository::<Timesheet>::new(pool).update(id, patch).await?;
    tracing::info!(timesheet_id = id, status = %row.status, "Timesheet updated");
    Ok(ApiResponse::success(row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parsing() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(parse_status(Some(" ")).unwrap(), None);
        assert_eq!(
            parse_status(Some("Approved")).unwrap(),
            Some(TimesheetStatus::Approved)
        );
        assert!(parse_status(Some("pending")).is_err());
    }
}

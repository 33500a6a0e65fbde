use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use sqlx::PgPool;

use crate::database::models::{Project, ProjectFields, DEFAULT_PROJECT_STATUS};
use crate::database::Repository;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /admin/projects - new projects start out active unless told otherwise
pub async fn create(
    State(pool): State<PgPool>,
    payload: Result<Json<ProjectFields>, JsonRejection>,
) -> ApiResult<Project> {
    let Json(mut fields) = payload?;
    fields
        .status
        .get_or_insert_with(|| DEFAULT_PROJECT_STATUS.to_string());

    let project = Repository::<Project>::new(pool).create(fields).await?;
    Ok(ApiResponse::created(project))
}

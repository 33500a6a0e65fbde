//! Table-agnostic CRUD handlers, instantiated per entity in the admin router

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use sqlx::PgPool;

use crate::database::{Entity, Repository};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /admin/<entity>
pub async fn list<T: Entity>(State(pool): State<PgPool>) -> ApiResult<Vec<T>> {
    let rows = Repository::<T>::new(pool).list().await?;
    Ok(ApiResponse::success(rows))
}

/// POST /admin/<entity>
pub async fn create<T: Entity>(
    State(pool): State<PgPool>,
    payload: Result<Json<T::Fields>, JsonRejection>,
) -> ApiResult<T> {
    let Json(fields) = payload?;
    let row = Repository::<T>::new(pool).create(fields).await?;
    tracing::info!(table = T::TABLE, "Record created");
    Ok(ApiResponse::created(row))
}

/// GET /admin/<entity>/:id
pub async fn show<T: Entity>(State(pool): State<PgPool>, Path(id): Path<i64>) -> ApiResult<T> {
    Ok(ApiResponse::success(Repository::<T>::new(pool).get(id).await?))
}

/// PATCH /admin/<entity>/:id - only the fields present in the body change
pub async fn update<T: Entity>(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    payload: Result<Json<T::Fields>, JsonRejection>,
) -> ApiResult<T> {
    let Json(patch) = payload?;
    let row = Repository::<T>::new(pool).update(id, patch).await?;
    Ok(ApiResponse::success(row))
}

/// DELETE /admin/<entity>/:id - returns the deleted record
pub async fn remove<T: Entity>(State(pool): State<PgPool>, Path(id): Path<i64>) -> ApiResult<T> {
    let row = Repository::<T>::new(pool).delete(id).await?;
    tracing::info!(table = T::TABLE, id, "Record deleted");
    Ok(ApiResponse::success(row))
}

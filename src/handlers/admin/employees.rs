use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::models::{Employee, EmployeeFields};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::EmployeeService;

/// GET /admin/employees
pub async fn list(State(service): State<EmployeeService>) -> ApiResult<Vec<Employee>> {
    Ok(ApiResponse::success(service.repository().list().await?))
}

/// POST /admin/employees - creates the account and emails the invitation
pub async fn create(
    State(service): State<EmployeeService>,
    payload: Result<Json<EmployeeFields>, JsonRejection>,
) -> ApiResult<Employee> {
    let Json(fields) = payload?;
    let employee = service.create_employee(fields).await?;
    Ok(ApiResponse::created(employee))
}

/// GET /admin/employees/:id
pub async fn show(
    State(service): State<EmployeeService>,
    Path(id): Path<i64>,
) -> ApiResult<Employee> {
    Ok(ApiResponse::success(service.repository().get(id).await?))
}

/// PATCH /admin/employees/:id
pub async fn update(
    State(service): State<EmployeeService>,
    Path(id): Path<i64>,
    payload: Result<Json<EmployeeFields>, JsonRejection>,
) -> ApiResult<Employee> {
    let Json(patch) = payload?;
    Ok(ApiResponse::success(service.update_employee(id, patch).await?))
}

/// DELETE /admin/employees/:id
pub async fn remove(
    State(service): State<EmployeeService>,
    Path(id): Path<i64>,
) -> ApiResult<Employee> {
    let employee = service.repository().delete(id).await?;
    tracing::info!(employee_id = id, "Employee deleted");
    Ok(ApiResponse::success(employee))
}

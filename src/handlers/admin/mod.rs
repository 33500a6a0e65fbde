//! `/admin/*` - back office for admins and team leads

pub mod crud;
pub mod dashboard;
pub mod employees;
pub mod projects;
pub mod timesheets;

use axum::{routing::get, Router};

use crate::database::models::{Client, Project, Timesheet};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route(
            "/employees",
            get(employees::list).post(employees::create),
        )
        .route(
            "/employees/:id",
            get(employees::show)
                .patch(employees::update)
                .delete(employees::remove),
        )
        .route("/clients", get(crud::list::<Client>).post(crud::create::<Client>))
        .route(
            "/clients/:id",
            get(crud::show::<Client>)
                .patch(crud::update::<Client>)
                .delete(crud::remove::<Client>),
        )
        .route("/projects", get(crud::list::<Project>).post(projects::create))
        .route(
            "/projects/:id",
            get(crud::show::<Project>)
                .patch(crud::update::<Project>)
                .delete(crud::remove::<Project>),
        )
        .route("/timesheets", get(timesheets::list))
        .route(
            "/timesheets/:id",
            get(crud::show::<Timesheet>)
                .patch(timesheets::update)
                .delete(crud::remove::<Timesheet>),
        )
        // Unknown paths inside the area stay behind the gatekeeper
        .fallback(super::not_found)
}

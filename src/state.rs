use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::middleware::Gatekeeper;
use crate::notify::Mailer;
use crate::services::EmployeeService;

/// Shared, read-only application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub gatekeeper: Gatekeeper,
    pub employees: EmployeeService,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        pool: PgPool,
        gatekeeper: Gatekeeper,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let employees = EmployeeService::new(
            pool.clone(),
            mailer,
            config.invitation_policy,
            &config.server.public_url,
        );
        Self {
            config,
            pool,
            gatekeeper,
            employees,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Gatekeeper {
    fn from_ref(state: &AppState) -> Self {
        state.gatekeeper.clone()
    }
}

impl FromRef<AppState> for EmployeeService {
    fn from_ref(state: &AppState) -> Self {
        state.employees.clone()
    }
}

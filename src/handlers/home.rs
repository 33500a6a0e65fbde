use axum::response::Json;
use serde_json::{json, Value};

/// GET / - public landing for anonymous visitors
///
/// Signed-in visitors never reach this handler; the gatekeeper sends them to
/// their role's landing page.
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Timey",
            "version": version,
            "description": "Employee and timesheet administration",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "logout": "POST /logout (public)",
                "admin": "/admin, /admin/{employees,clients,projects,timesheets}[/:id] (admin, teamLead)",
                "employee": "/employee, /employee/timesheets, /employee/settings (employee, teamLead, admin)",
            }
        }
    }))
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::field::blank_as_none;
use crate::database::query_builder::{Assignments, Bind};
use crate::database::repository::{Entity, IntoAssignments};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Employee {
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "role",
        "phone",
        "position",
        "hire_date",
        "password_hash",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Employee";

    type Fields = EmployeeFields;
}

/// Employee input. `password` is plaintext and never stored; the employee
/// service hashes it into `password_hash` before the record reaches the store.
#[derive(Default, Deserialize)]
pub struct EmployeeFields {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub hire_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub password: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
}

impl IntoAssignments for EmployeeFields {
    fn into_assignments(self) -> Assignments {
        vec![
            ("name", Bind::Text(self.name)),
            ("email", Bind::Text(self.email)),
            ("role", Bind::Text(self.role)),
            ("phone", Bind::Text(self.phone)),
            ("position", Bind::Text(self.position)),
            ("hire_date", Bind::Date(self.hire_date)),
            ("password_hash", Bind::Text(self.password_hash)),
        ]
    }
}

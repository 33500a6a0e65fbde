use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::field::blank_as_none;
use crate::database::query_builder::{Assignments, Bind};
use crate::database::repository::{Entity, IntoAssignments};

pub const DEFAULT_PROJECT_STATUS: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub client_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Project {
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_id",
        "name",
        "description",
        "status",
        "start_date",
        "end_date",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Project";

    type Fields = ProjectFields;
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectFields {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub client_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
}

impl IntoAssignments for ProjectFields {
    fn into_assignments(self) -> Assignments {
        vec![
            ("client_id", Bind::BigInt(self.client_id)),
            ("name", Bind::Text(self.name)),
            ("description", Bind::Text(self.description)),
            ("status", Bind::Text(self.status)),
            ("start_date", Bind::Date(self.start_date)),
            ("end_date", Bind::Date(self.end_date)),
        ]
    }
}

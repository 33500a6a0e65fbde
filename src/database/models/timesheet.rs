use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::field::blank_as_none;
use crate::database::query_builder::{Assignments, Bind};
use crate::database::repository::{Entity, IntoAssignments};

/// Review state of a timesheet entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Submitted,
    Approved,
    Rejected,
}

impl TimesheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimesheetStatus::Submitted => "submitted",
            TimesheetStatus::Approved => "approved",
            TimesheetStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Timesheet {
    pub id: i64,
    pub employee_id: i64,
    pub project_id: Option<i64>,
    pub work_date: NaiveDate,
    pub hours: Decimal,
    pub task: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Timesheet {
    const TABLE: &'static str = "timesheets";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "employee_id",
        "project_id",
        "work_date",
        "hours",
        "task",
        "notes",
        "status",
        "created_at",
        "updated_at",
    ];
    const LABEL: &'static str = "Timesheet";

    type Fields = TimesheetFields;
}

#[derive(Debug, Default, Deserialize)]
pub struct TimesheetFields {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub employee_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub project_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub work_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub hours: Option<Decimal>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub task: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<TimesheetStatus>,
}

/// Upper bound for a single day's entry
pub const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Fractional digits the `hours` column keeps
pub const HOURS_SCALE: u32 = 2;

impl TimesheetFields {
    /// Range and precision check for `hours`, when present
    pub fn check_hours(&self) -> Result<(), String> {
        let Some(hours) = self.hours else {
            return Ok(());
        };
        if hours.is_sign_negative() || hours.is_zero() {
            return Err("hours must be positive".into());
        }
        if hours > MAX_DAILY_HOURS {
            return Err(format!("hours cannot exceed {} per day", MAX_DAILY_HOURS));
        }
        if hours.normalize().scale() > HOURS_SCALE {
            return Err(format!(
                "hours allows at most {} decimal places",
                HOURS_SCALE
            ));
        }
        Ok(())
    }
}

impl IntoAssignments for TimesheetFields {
    fn into_assignments(self) -> Assignments {
        vec![
            ("employee_id", Bind::BigInt(self.employee_id)),
            ("project_id", Bind::BigInt(self.project_id)),
            ("work_date", Bind::Date(self.work_date)),
            ("hours", Bind::Decimal(self.hours)),
            ("task", Bind::Text(self.task)),
            ("notes", Bind::Text(self.notes)),
            (
                "status",
                Bind::Text(self.status.map(|s| s.as_str().to_string())),
            ),
        ]
    }
}

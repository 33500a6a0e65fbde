pub mod client;
pub mod employee;
pub mod project;
pub mod timesheet;

pub use client::{Client, ClientFields};
pub use employee::{Employee, EmployeeFields};
pub use project::{Project, ProjectFields, DEFAULT_PROJECT_STATUS};
pub use timesheet::{Timesheet, TimesheetFields, TimesheetStatus};

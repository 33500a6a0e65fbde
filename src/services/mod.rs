pub mod employee_service;

pub use employee_service::{EmployeeService, ServiceError, DEFAULT_EMPLOYEE_ROLE};

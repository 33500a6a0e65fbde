pub mod field;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::{Bind, QueryBuilder};
pub use repository::{Entity, IntoAssignments, Repository};

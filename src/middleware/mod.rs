pub mod gatekeeper;
pub mod response;
pub mod route_scope;

pub use gatekeeper::{gatekeeper_middleware, AccessDecision, Gatekeeper};
pub use response::{ApiResponse, ApiResult};
pub use route_scope::{normalize_path, RouteScope, RouteTable, RouteTableError};

pub mod claims;
pub mod password;
pub mod token;

pub use claims::{AuthUser, Claims, CustomRole, Role, TOKEN_TTL_HOURS};
pub use token::{InvalidToken, TokenCodec, TokenError};

mod middleware;
mod password;
mod token;

pub use middleware::{AuthError, RequireUser};
pub use password::{hash_password, verify_password};
pub use token::{SESSION_TTL_DAYS, TokenGenerator, issue_session, parse_token};

mod access;
mod auth;
pub mod dto;
mod folders;
mod mistakes;
mod records;
pub mod response;
mod router;
pub mod validation;

pub use folders::ensure_system_folders;
pub use router::{AppState, create_router};

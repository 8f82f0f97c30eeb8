mod admin_auth;
mod client_id;
mod error_handler;

pub use admin_auth::admin_auth;
pub use client_id::{ClientId, UNKNOWN_CLIENT, client_identifier};
pub use error_handler::log_errors;

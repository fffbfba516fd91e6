//! Auth module: domain types, errors and the session service.
//!
//! Credentials are checked by the backend; this layer only validates input
//! and hides backend failure details from callers.

pub mod domain;
pub mod errors;
pub mod service;

pub use errors::AuthError;
pub use service::AuthService;

pub mod types;
pub mod utils;
pub mod env;

/// Name reported by `/version` and startup logs.
pub const APP_NAME: &str = "servigraf";

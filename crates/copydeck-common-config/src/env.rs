//! Environment variable handling.

use std::env;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("required environment variable not set: {var}")]
    NotSet { var: String },
}

/// Environment variable names.
pub mod vars {
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
    pub const COPYDECK_CONFIG: &str = "COPYDECK_CONFIG";
}

/// Load `.env` then `.env.local` from the working directory, later files winning.
///
/// Missing files are not an error.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_filename_override(".env.local");
}

/// Get a required string variable.
pub fn require_var(var: &str) -> Result<String, EnvError> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| EnvError::NotSet {
            var: var.to_string(),
        })
}

//! Application error types.

use std::fmt;

use crate::provider::ProviderError;

/// Errors raised while wiring the application together.
#[derive(Debug)]
pub enum AppError {
    /// The HTTP client or tile provider could not be built.
    Provider(ProviderError),

    /// The cache directory is unusable.
    CacheDirectory(std::io::Error),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Provider(e) => write!(f, "Failed to create tile provider: {}", e),
            AppError::CacheDirectory(e) => {
                write!(f, "Failed to prepare cache directory: {}", e)
            }
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Provider(e) => Some(e),
            AppError::CacheDirectory(e) => Some(e),
            AppError::Config(_) => None,
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Provider(e)
    }
}

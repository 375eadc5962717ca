use derive_more::{Constructor, Error};
use std::fmt;

/// The requested basis or model is structurally unsupported.
#[derive(Debug, Clone, PartialEq, Eq, Error, Constructor)]
pub struct ConfigurationError {
    pub details: String,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Configuration error: {}", self.details)
    }
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

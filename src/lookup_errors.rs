//! # Lookup Error Types Module
//!
//! This module defines the error type used throughout the recipe lookup pipeline.
//! It provides structured error handling for the different recipe sources and failure modes.

/// Custom error types for recipe lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No ingredients were provided
    EmptyIngredients,
    /// The demo fixture could not be read or parsed
    Fixture(String),
    /// The API answered with a non-success status
    Api { status: u16, message: String },
    /// The request never got a response
    Network(String),
    /// The request timed out
    Timeout(String),
    /// The response body did not have the expected shape
    Decode(String),
    /// Too many recent failures, calls are short-circuited
    CircuitOpen,
}

impl LookupError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            LookupError::Network(_) | LookupError::Timeout(_) => true,
            LookupError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the failure comes from the local demo data rather than the API
    pub fn is_demo_data_failure(&self) -> bool {
        matches!(self, LookupError::Fixture(_))
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::EmptyIngredients => write!(f, "No ingredients provided"),
            LookupError::Fixture(msg) => write!(f, "Demo data error: {msg}"),
            LookupError::Api { status, message } => write!(f, "API error (HTTP {status}): {message}"),
            LookupError::Network(msg) => write!(f, "Network error: {msg}"),
            LookupError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
            LookupError::Decode(msg) => write!(f, "Decode error: {msg}"),
            LookupError::CircuitOpen => write!(f, "Recipe API temporarily disabled after repeated failures"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout(err.to_string())
        } else if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            LookupError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            LookupError::Network(err.to_string())
        }
    }
}

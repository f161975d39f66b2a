//! # Lookup Configuration Module
//!
//! This module defines configuration structures for recipe lookups,
//! including the operating mode, recovery settings and request limits.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

// Constants for lookup configuration
pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";
pub const DEFAULT_DEMO_RECIPES_PATH: &str = "data/demo_recipes.json";
pub const RESULT_LIMIT: u32 = 5; // keeps API quota usage bounded
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 3;

/// Where recipe candidates come from, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Query the Spoonacular API with the given key
    Live { api_key: String },
    /// Read candidates from a local fixture file, no third-party calls
    Demo { fixture_path: PathBuf },
}

impl Mode {
    /// Resolve the mode from an optional credential.
    ///
    /// A missing or blank key selects demo mode. A wrong key still selects
    /// live mode and surfaces as an API failure at lookup time.
    pub fn from_credential(api_key: Option<String>, fixture_path: PathBuf) -> Self {
        match api_key.map(|key| key.trim().to_string()) {
            Some(key) if !key.is_empty() => Mode::Live { api_key: key },
            _ => Mode::Demo { fixture_path },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Live { .. } => "live",
            Mode::Demo { .. } => "demo",
        }
    }
}

/// Recovery configuration for error handling
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for a single API request in seconds
    pub operation_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_retry_delay_ms: 250,
            max_retry_delay_ms: 2000,
            operation_timeout_secs: 10,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration structure for the recipe lookup pipeline
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Live or demo operation
    pub mode: Mode,
    /// Base URL of the Spoonacular API
    pub base_url: String,
    /// Number of candidates requested from findByIngredients
    pub result_limit: u32,
    /// How many detail requests may be in flight at once
    pub detail_concurrency: usize,
    /// Recovery and error handling configuration
    pub recovery: RecoveryConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Demo {
                fixture_path: PathBuf::from(DEFAULT_DEMO_RECIPES_PATH),
            },
            base_url: DEFAULT_BASE_URL.to_string(),
            result_limit: RESULT_LIMIT,
            detail_concurrency: DEFAULT_DETAIL_CONCURRENCY,
            recovery: RecoveryConfig::default(),
        }
    }
}

impl LookupConfig {
    /// Build the configuration from environment variables.
    ///
    /// `SPOONACULAR_API_KEY` is the only switch between live and demo mode.
    /// Numeric settings that fail to parse keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let recovery_defaults = RecoveryConfig::default();

        let fixture_path = env::var("DEMO_RECIPES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DEMO_RECIPES_PATH));
        let mode = Mode::from_credential(env::var("SPOONACULAR_API_KEY").ok(), fixture_path);

        Self {
            mode,
            base_url: env::var("SPOONACULAR_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            result_limit: defaults.result_limit,
            detail_concurrency: env_or("DETAIL_CONCURRENCY", defaults.detail_concurrency).max(1),
            recovery: RecoveryConfig {
                max_retries: env_or("LOOKUP_MAX_RETRIES", recovery_defaults.max_retries),
                operation_timeout_secs: env_or(
                    "LOOKUP_TIMEOUT_SECS",
                    recovery_defaults.operation_timeout_secs,
                ),
                ..recovery_defaults
            },
        }
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = key, value = %raw, "Ignoring unparseable configuration value");
            default
        }),
        Err(_) => default,
    }
}

//! # Spoonacular API Client
//!
//! Live recipe source backed by the Spoonacular REST API.
//!
//! # Features
//! - `findByIngredients` search capped at a fixed number of results
//! - Recipe information lookup for instructions, time and dish types
//! - Per-request timeout
//! - Retry of transient failures with exponential backoff and jitter
//! - Circuit breaker on searches that fails fast after repeated outages
//!
//! # API Reference
//! <https://spoonacular.com/food-api/docs>

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::lookup_config::RecoveryConfig;
use crate::lookup_errors::LookupError;
use crate::recipe_model::{parse_candidates, RecipeCandidate, RecipeDetails};
use crate::recipe_source::RecipeSource;

/// Spoonacular API client
#[derive(Debug)]
pub struct SpoonacularClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
    recovery: RecoveryConfig,
    /// Gates `findByIngredients` only
    circuit_breaker: CircuitBreaker,
}

impl SpoonacularClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(api_key: &str, base_url: &str, recovery: RecoveryConfig) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(recovery.operation_timeout_secs))
            .build()
            .map_err(|e| LookupError::Network(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            circuit_breaker: CircuitBreaker::new(&recovery),
            recovery,
        })
    }

    /// GET `path` with the given query, retrying transient failures.
    ///
    /// With a breaker, an open circuit fails fast and a call that still fails
    /// transiently after its retries counts as one failure. Non-transient
    /// answers (rejected keys, unknown recipes, bad bodies) show the API is up
    /// and are not counted.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        breaker: Option<&CircuitBreaker>,
    ) -> Result<T, LookupError> {
        if breaker.is_some_and(|breaker| breaker.is_open()) {
            warn!(path, "Circuit breaker open, skipping Spoonacular request");
            return Err(LookupError::CircuitOpen);
        }

        let result = self.send_with_retries(path, query).await;
        if let Some(breaker) = breaker {
            match &result {
                Ok(_) => breaker.record_success(),
                Err(e) if e.is_transient() => breaker.record_failure(),
                Err(_) => {}
            }
        }
        result
    }

    async fn send_with_retries<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let mut attempt = 0;
        loop {
            match self.send_once(path, query).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.recovery.max_retries => {
                    let delay = self.retry_delay(attempt);
                    warn!(path, attempt = attempt + 1, delay_ms = delay.as_millis() as u64, error = %e, "Retrying Spoonacular request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LookupError::Decode(format!("unexpected response from {path}: {e}")))
    }

    /// Exponential backoff capped at `max_retry_delay_ms`, plus up to 50% jitter
    fn retry_delay(&self, attempt: u32) -> Duration {
        let base = self.recovery.base_retry_delay_ms;
        let backoff = base
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(self.recovery.max_retry_delay_ms);
        let jitter = rand::thread_rng().gen_range(0..=backoff / 2);
        Duration::from_millis(backoff + jitter)
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    fn mode_name(&self) -> &'static str {
        "live"
    }

    async fn find_by_ingredients(
        &self,
        ingredients: &[String],
        limit: u32,
    ) -> Result<Vec<RecipeCandidate>, LookupError> {
        let joined = ingredients.join(",");
        let number = limit.to_string();
        debug!(ingredients = %joined, number = %number, "Searching Spoonacular by ingredients");

        let body: Value = self
            .get_json(
                "/recipes/findByIngredients",
                &[("ingredients", joined.as_str()), ("number", number.as_str())],
                Some(&self.circuit_breaker),
            )
            .await?;
        parse_candidates(body)
    }

    async fn recipe_details(&self, id: u64) -> Result<RecipeDetails, LookupError> {
        debug!(recipe_id = id, "Fetching Spoonacular recipe information");
        // detail failures stay with their candidate and never gate searches
        self.get_json(&format!("/recipes/{id}/information"), &[], None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_is_capped() {
        let recovery = RecoveryConfig {
            base_retry_delay_ms: 100,
            max_retry_delay_ms: 300,
            ..Default::default()
        };
        let client = SpoonacularClient::new("key", "http://localhost/", recovery).unwrap();
        for attempt in 0..6 {
            let delay = client.retry_delay(attempt).as_millis() as u64;
            assert!(delay >= 100);
            assert!(delay <= 450);
        }
        assert_eq!(client.base_url, "http://localhost");
    }
}

//! # Demo Recipe Source
//!
//! Stand-in for the Spoonacular API when no API key is configured. Candidates
//! come from a local JSON file shaped like a findByIngredients response and
//! every candidate gets the same synthetic details, so no third-party call is
//! ever made.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::lookup_errors::LookupError;
use crate::recipe_model::{parse_candidates, RecipeCandidate, RecipeDetails};
use crate::recipe_source::RecipeSource;

#[derive(Debug, Clone)]
pub struct DemoRecipeSource {
    fixture_path: PathBuf,
}

impl DemoRecipeSource {
    pub fn new(fixture_path: PathBuf) -> Self {
        Self { fixture_path }
    }
}

#[async_trait]
impl RecipeSource for DemoRecipeSource {
    fn mode_name(&self) -> &'static str {
        "demo"
    }

    /// Read the fixture file. The ingredient list is not used for filtering
    /// and the result is capped at `limit` like the live API.
    async fn find_by_ingredients(
        &self,
        ingredients: &[String],
        limit: u32,
    ) -> Result<Vec<RecipeCandidate>, LookupError> {
        debug!(path = %self.fixture_path.display(), ingredients = ingredients.len(), "Loading demo recipes");

        let content = tokio::fs::read_to_string(&self.fixture_path)
            .await
            .map_err(|e| {
                LookupError::Fixture(format!("cannot read {}: {e}", self.fixture_path.display()))
            })?;
        let body: Value = serde_json::from_str(&content).map_err(|e| {
            LookupError::Fixture(format!("invalid JSON in {}: {e}", self.fixture_path.display()))
        })?;

        let mut candidates = parse_candidates(body).map_err(|e| LookupError::Fixture(e.to_string()))?;
        candidates.truncate(limit as usize);

        info!(candidates = candidates.len(), "Demo recipes loaded");
        Ok(candidates)
    }

    async fn recipe_details(&self, _id: u64) -> Result<RecipeDetails, LookupError> {
        Ok(RecipeDetails::demo())
    }
}

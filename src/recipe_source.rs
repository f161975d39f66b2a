//! Recipe sources: where candidates and their details come from.

use std::sync::Arc;

use async_trait::async_trait;

use crate::demo_source::DemoRecipeSource;
use crate::lookup_config::{LookupConfig, Mode};
use crate::lookup_errors::LookupError;
use crate::recipe_model::{RecipeCandidate, RecipeDetails};
use crate::spoonacular::SpoonacularClient;

/// Supplies recipe candidates for an ingredient list and their details
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Short name used in logs ("live", "demo")
    fn mode_name(&self) -> &'static str;

    /// Find up to `limit` candidates using the given ingredients
    async fn find_by_ingredients(
        &self,
        ingredients: &[String],
        limit: u32,
    ) -> Result<Vec<RecipeCandidate>, LookupError>;

    /// Fetch instructions, preparation time and dish types for one candidate
    async fn recipe_details(&self, id: u64) -> Result<RecipeDetails, LookupError>;
}

/// Build the source matching the configured mode
pub fn build_source(config: &LookupConfig) -> Result<Arc<dyn RecipeSource>, LookupError> {
    match &config.mode {
        Mode::Live { api_key } => Ok(Arc::new(SpoonacularClient::new(
            api_key,
            &config.base_url,
            config.recovery.clone(),
        )?)),
        Mode::Demo { fixture_path } => Ok(Arc::new(DemoRecipeSource::new(fixture_path.clone()))),
    }
}

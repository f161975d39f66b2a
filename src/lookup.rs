//! # Recipe Lookup Module
//!
//! The lookup pipeline: find candidates for the user's ingredients, enrich
//! each one with its details, classify into exact and partial matches, and
//! drive a [`ResultsView`] through loading, notices and result panels.
//!
//! ## Failure handling
//!
//! - No ingredients: a notice is shown and no request is made
//! - Find request fails: the whole lookup fails with a user-visible notice
//! - A detail request fails: logged, the candidate keeps its search fields
//! - Find request returns nothing: a "no recipes" message, no fallback recipe
//! - Results cannot be shown: the view drops partial output, then a notice

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::ingredient_set::IngredientSet;
use crate::lookup_config::LookupConfig;
use crate::lookup_errors::LookupError;
use crate::recipe_model::{ClassifiedRecipeSet, EnrichedRecipe, RecipeCandidate};
use crate::recipe_source::RecipeSource;

/// Result of a lookup that reached the recipe source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The source returned no candidates at all
    NoCandidates,
    Classified(ClassifiedRecipeSet),
}

/// User-visible notices raised by a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    EmptyIngredients,
    DemoDataUnavailable,
    LookupFailed,
}

impl Notice {
    /// Localization key of the notice text
    pub fn message_key(self) -> &'static str {
        match self {
            Notice::EmptyIngredients => "notice-empty-ingredients",
            Notice::DemoDataUnavailable => "error-demo-data",
            Notice::LookupFailed => "error-lookup-failed",
        }
    }

    fn for_error(err: &LookupError) -> Self {
        if err.is_demo_data_failure() {
            Notice::DemoDataUnavailable
        } else {
            Notice::LookupFailed
        }
    }
}

/// Where lookup progress and results are shown
#[async_trait]
pub trait ResultsView: Send {
    async fn show_loading(&mut self) -> Result<()>;

    /// Must not fail: it runs on every exit path once loading was shown
    async fn hide_loading(&mut self);

    async fn notify(&mut self, notice: Notice) -> Result<()>;

    /// Show the "no recipes found" hint in the exact panel and empty the partial panel
    async fn show_no_results(&mut self) -> Result<()>;

    /// Replace both panels with the classified recipes.
    ///
    /// On error nothing of the new panels may remain on screen.
    async fn render_panels(&mut self, recipes: &ClassifiedRecipeSet) -> Result<()>;
}

/// Recipe lookup pipeline bound to one recipe source
#[derive(Clone)]
pub struct RecipeLookup {
    source: Arc<dyn RecipeSource>,
    result_limit: u32,
    detail_concurrency: usize,
}

impl RecipeLookup {
    pub fn new(source: Arc<dyn RecipeSource>, config: &LookupConfig) -> Self {
        Self {
            source,
            result_limit: config.result_limit,
            detail_concurrency: config.detail_concurrency.max(1),
        }
    }

    pub fn mode_name(&self) -> &'static str {
        self.source.mode_name()
    }

    /// Find, enrich and classify recipes for the given ingredients
    ///
    /// # Errors
    ///
    /// `EmptyIngredients` when `ingredients` is empty, otherwise whatever the
    /// find request failed with. Detail failures never surface here.
    pub async fn lookup_recipes(&self, ingredients: &[String]) -> Result<LookupOutcome, LookupError> {
        if ingredients.is_empty() {
            return Err(LookupError::EmptyIngredients);
        }

        let candidates = self
            .source
            .find_by_ingredients(ingredients, self.result_limit)
            .await?;
        if candidates.is_empty() {
            info!(mode = self.mode_name(), "No recipe candidates found");
            return Ok(LookupOutcome::NoCandidates);
        }

        let recipes = self.enrich(candidates).await;
        let classified = ClassifiedRecipeSet::classify(recipes);
        info!(
            mode = self.mode_name(),
            exact = classified.exact.len(),
            partial = classified.partial.len(),
            fallback = classified.has_fallback(),
            "Recipes classified"
        );
        Ok(LookupOutcome::Classified(classified))
    }

    /// Fetch details with bounded concurrency; output order follows input order
    async fn enrich(&self, candidates: Vec<RecipeCandidate>) -> Vec<EnrichedRecipe> {
        stream::iter(candidates)
            .map(|candidate| async move {
                let details = match self.source.recipe_details(candidate.id).await {
                    Ok(details) => Some(details),
                    Err(e) => {
                        warn!(recipe_id = candidate.id, error = %e, "Recipe details unavailable, using search fields only");
                        None
                    }
                };
                EnrichedRecipe::from_candidate(candidate, details)
            })
            .buffered(self.detail_concurrency)
            .collect()
            .await
    }

    /// Run a lookup end to end against a view.
    ///
    /// The loading indicator is hidden on every path once shown. Lookup
    /// failures and failed renders become notices; only a failing notice or
    /// loading indicator is returned as an error.
    pub async fn run<V: ResultsView>(
        &self,
        ingredients: &IngredientSet,
        view: &mut V,
    ) -> Result<Option<LookupOutcome>> {
        if ingredients.is_empty() {
            view.notify(Notice::EmptyIngredients).await?;
            return Ok(None);
        }

        view.show_loading().await?;
        let result = self.lookup_recipes(ingredients.list()).await;
        view.hide_loading().await;

        let rendered = match result {
            Ok(LookupOutcome::NoCandidates) => view
                .show_no_results()
                .await
                .map(|()| LookupOutcome::NoCandidates),
            Ok(LookupOutcome::Classified(recipes)) => {
                let shown = view.render_panels(&recipes).await;
                shown.map(|()| LookupOutcome::Classified(recipes))
            }
            Err(e) => {
                error!(mode = self.mode_name(), error = %e, "Recipe lookup failed");
                view.notify(Notice::for_error(&e)).await?;
                return Ok(None);
            }
        };

        match rendered {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                // the view has removed whatever it managed to show
                error!(mode = self.mode_name(), error = %e, "Rendering recipes failed");
                view.notify(Notice::LookupFailed).await?;
                Ok(None)
            }
        }
    }
}

//! # Recipe Model Module
//!
//! Data types exchanged with the recipe sources and the classification rule
//! that splits enriched recipes into exact and partial matches.
//!
//! ## Wire shapes
//!
//! - [`RecipeCandidate`]: one element of a findByIngredients response
//! - [`RecipeDetails`]: the fields used from a recipe information response
//!
//! Both are parsed leniently: absent or `null` fields fall back to defaults
//! instead of failing the whole lookup.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lookup_errors::LookupError;

/// Preparation time shown when a recipe does not report one
pub const DEFAULT_READY_IN_MINUTES: u32 = 15;

pub const FALLBACK_TITLE: &str = "🥞 Classic Pancakes (Suggested)";
pub const FALLBACK_IMAGE: &str = "https://spoonacular.com/recipeImages/605213-556x370.jpg";
pub const FALLBACK_READY_IN_MINUTES: u32 = 20;
pub const FALLBACK_INSTRUCTIONS: &str =
    "Mix eggs, milk, flour, and sugar. Pour onto a hot pan. Flip when bubbles form. Serve with syrup!";

/// An ingredient the recipe needs but the user did not list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedIngredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl MissedIngredient {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// A recipe returned by a find-by-ingredients query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCandidate {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default)]
    pub missed_ingredient_count: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub missed_ingredients: Vec<MissedIngredient>,
}

/// Detail fields fetched per candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dish_types: Vec<String>,
}

impl RecipeDetails {
    /// The record every candidate gets in demo mode
    pub fn demo() -> Self {
        Self {
            instructions: Some(
                "This is a demo recipe. Add a Spoonacular API key to see the real instructions."
                    .to_string(),
            ),
            ready_in_minutes: Some(DEFAULT_READY_IN_MINUTES),
            dish_types: vec!["lunch".to_string()],
        }
    }
}

/// A candidate merged with its details, ready for classification and rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecipe {
    /// `None` only for the synthetic fallback recipe
    pub id: Option<u64>,
    pub title: String,
    pub image: String,
    pub missed_ingredient_count: u32,
    pub missed_ingredients: Vec<MissedIngredient>,
    pub instructions: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub dish_types: Vec<String>,
}

impl EnrichedRecipe {
    /// Merge a candidate with its details.
    ///
    /// Without details (the detail fetch failed) only the candidate fields are
    /// used and rendering substitutes the defaults.
    pub fn from_candidate(candidate: RecipeCandidate, details: Option<RecipeDetails>) -> Self {
        let details = details.unwrap_or_default();
        Self {
            id: Some(candidate.id),
            title: candidate.title,
            image: candidate.image,
            missed_ingredient_count: candidate.missed_ingredient_count.unwrap_or(0),
            missed_ingredients: candidate.missed_ingredients,
            instructions: details.instructions,
            ready_in_minutes: details.ready_in_minutes,
            dish_types: details.dish_types,
        }
    }

    /// The fixed suggestion shown when nothing matches exactly
    pub fn fallback() -> Self {
        Self {
            id: None,
            title: FALLBACK_TITLE.to_string(),
            image: FALLBACK_IMAGE.to_string(),
            missed_ingredient_count: 0,
            missed_ingredients: Vec::new(),
            instructions: Some(FALLBACK_INSTRUCTIONS.to_string()),
            ready_in_minutes: Some(FALLBACK_READY_IN_MINUTES),
            dish_types: vec!["breakfast".to_string()],
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.id.is_none() && self.title == FALLBACK_TITLE
    }

    pub fn is_exact_match(&self) -> bool {
        self.missed_ingredient_count == 0
    }

    pub fn prep_minutes(&self) -> u32 {
        self.ready_in_minutes.unwrap_or(DEFAULT_READY_IN_MINUTES)
    }

    pub fn primary_dish_type(&self) -> Option<&str> {
        self.dish_types.first().map(String::as_str)
    }

    /// Instructions with blank values treated as missing
    pub fn instructions_text(&self) -> Option<&str> {
        self.instructions
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Exact and partial matches of one lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedRecipeSet {
    pub exact: Vec<EnrichedRecipe>,
    pub partial: Vec<EnrichedRecipe>,
}

impl ClassifiedRecipeSet {
    /// Partition recipes by missing-ingredient count, keeping their order.
    ///
    /// When no recipe matches exactly, the fallback recipe is appended to
    /// `exact` so that panel is never left without an explanation.
    pub fn classify(recipes: Vec<EnrichedRecipe>) -> Self {
        let (mut exact, partial): (Vec<_>, Vec<_>) =
            recipes.into_iter().partition(EnrichedRecipe::is_exact_match);

        if exact.is_empty() {
            exact.push(EnrichedRecipe::fallback());
        }

        Self { exact, partial }
    }

    pub fn has_fallback(&self) -> bool {
        self.exact.iter().any(EnrichedRecipe::is_fallback)
    }
}

/// Parse a findByIngredients body into candidates.
///
/// Anything that is not a JSON array counts as "no candidates"; a malformed
/// element fails the whole response.
pub fn parse_candidates(body: Value) -> Result<Vec<RecipeCandidate>, LookupError> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| LookupError::Decode(format!("invalid recipe candidate: {e}")))
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Spoonacular mostly sends integers, but hand-written fixtures may not
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|minutes| u32::try_from(minutes).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }))
}

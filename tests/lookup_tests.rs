//! # Lookup Pipeline Tests
//!
//! This module tests the recipe lookup pipeline against an in-memory recipe
//! source and a view that records what it was asked to show.

use anyhow::Result;
use async_trait::async_trait;
use recipe_finder::ingredient_set::IngredientSet;
use recipe_finder::lookup::{LookupOutcome, Notice, RecipeLookup, ResultsView};
use recipe_finder::lookup_config::LookupConfig;
use recipe_finder::lookup_errors::LookupError;
use recipe_finder::recipe_model::{
    parse_candidates, ClassifiedRecipeSet, RecipeCandidate, RecipeDetails, DEFAULT_READY_IN_MINUTES,
};
use recipe_finder::recipe_source::RecipeSource;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    /// Recipe source serving canned responses
    struct InMemorySource {
        candidates: Result<Vec<RecipeCandidate>, LookupError>,
        details: HashMap<u64, Result<RecipeDetails, LookupError>>,
        find_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        mode: &'static str,
    }

    impl InMemorySource {
        fn new(body: Value) -> Self {
            Self {
                candidates: parse_candidates(body),
                details: HashMap::new(),
                find_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
                mode: "live",
            }
        }

        fn failing(err: LookupError) -> Self {
            Self {
                candidates: Err(err),
                ..Self::new(json!([]))
            }
        }

        fn with_details(mut self, id: u64, details: Result<RecipeDetails, LookupError>) -> Self {
            self.details.insert(id, details);
            self
        }
    }

    #[async_trait]
    impl RecipeSource for InMemorySource {
        fn mode_name(&self) -> &'static str {
            self.mode
        }

        async fn find_by_ingredients(
            &self,
            _ingredients: &[String],
            limit: u32,
        ) -> Result<Vec<RecipeCandidate>, LookupError> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(limit, 5);
            self.candidates.clone()
        }

        async fn recipe_details(&self, id: u64) -> Result<RecipeDetails, LookupError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            // later ids answer first, so ordering bugs would show up
            tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(id * 5))).await;
            self.details
                .get(&id)
                .cloned()
                .unwrap_or_else(|| Ok(RecipeDetails::default()))
        }
    }

    #[derive(Debug, PartialEq)]
    enum ViewEvent {
        Loading,
        LoadingHidden,
        Notice(Notice),
        NoResults,
        Panels { exact: Vec<String>, partial: Vec<String> },
    }

    #[derive(Default)]
    struct RecordingView {
        events: Vec<ViewEvent>,
        fail_render: bool,
    }

    #[async_trait]
    impl ResultsView for RecordingView {
        async fn show_loading(&mut self) -> Result<()> {
            self.events.push(ViewEvent::Loading);
            Ok(())
        }

        async fn hide_loading(&mut self) {
            self.events.push(ViewEvent::LoadingHidden);
        }

        async fn notify(&mut self, notice: Notice) -> Result<()> {
            self.events.push(ViewEvent::Notice(notice));
            Ok(())
        }

        async fn show_no_results(&mut self) -> Result<()> {
            if self.fail_render {
                anyhow::bail!("chat unavailable");
            }
            self.events.push(ViewEvent::NoResults);
            Ok(())
        }

        async fn render_panels(&mut self, recipes: &ClassifiedRecipeSet) -> Result<()> {
            if self.fail_render {
                anyhow::bail!("message could not be sent");
            }
            self.events.push(ViewEvent::Panels {
                exact: recipes.exact.iter().map(|r| r.title.clone()).collect(),
                partial: recipes.partial.iter().map(|r| r.title.clone()).collect(),
            });
            Ok(())
        }
    }

    fn lookup_with(source: Arc<InMemorySource>) -> RecipeLookup {
        RecipeLookup::new(source, &LookupConfig::default())
    }

    fn ingredients(names: &str) -> IngredientSet {
        let mut set = IngredientSet::new();
        set.add_entries(names);
        set
    }

    fn candidate(id: u64, title: &str, missing: &[&str]) -> Value {
        json!({
            "id": id,
            "title": title,
            "image": format!("https://img.example.com/{id}.jpg"),
            "missedIngredientCount": missing.len(),
            "missedIngredients": missing.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        })
    }

    #[tokio::test]
    async fn test_end_to_end_example() {
        let source = Arc::new(
            InMemorySource::new(json!([{ "id": 1, "title": "Omelette", "missedIngredientCount": 0, "missedIngredients": [] }]))
                .with_details(
                    1,
                    Ok(RecipeDetails {
                        instructions: Some("Whisk and fry.".to_string()),
                        ready_in_minutes: Some(10),
                        dish_types: vec!["breakfast".to_string()],
                    }),
                ),
        );
        let lookup = lookup_with(source);

        let outcome = lookup
            .lookup_recipes(&["eggs".to_string(), "milk".to_string()])
            .await
            .unwrap();

        let LookupOutcome::Classified(set) = outcome else {
            panic!("expected classified recipes");
        };
        assert_eq!(set.exact.len(), 1);
        assert!(set.partial.is_empty());
        let omelette = &set.exact[0];
        assert_eq!(omelette.title, "Omelette");
        assert_eq!(omelette.prep_minutes(), 10);
        assert_eq!(omelette.instructions_text(), Some("Whisk and fry."));
        assert_eq!(omelette.primary_dish_type(), Some("breakfast"));
        assert!(!set.has_fallback());
    }

    #[tokio::test]
    async fn test_exact_and_partial_counts() {
        let body = json!([
            candidate(1, "Pancakes", &[]),
            candidate(2, "Crepes", &["butter"]),
            candidate(3, "French Toast", &[]),
            candidate(4, "Waffles", &["yeast", "butter"]),
        ]);
        let lookup = lookup_with(Arc::new(InMemorySource::new(body)));

        let LookupOutcome::Classified(set) = lookup.lookup_recipes(&["eggs".to_string()]).await.unwrap() else {
            panic!("expected classified recipes");
        };

        let exact: Vec<&str> = set.exact.iter().map(|r| r.title.as_str()).collect();
        let partial: Vec<&str> = set.partial.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(exact, vec!["Pancakes", "French Toast"]);
        assert_eq!(partial, vec!["Crepes", "Waffles"]);
        assert!(!set.has_fallback());
    }

    #[tokio::test]
    async fn test_no_exact_match_injects_single_fallback() {
        let body = json!([candidate(1, "Crepes", &["butter"]), candidate(2, "Waffles", &["yeast"])]);
        let lookup = lookup_with(Arc::new(InMemorySource::new(body)));

        let LookupOutcome::Classified(set) = lookup.lookup_recipes(&["eggs".to_string()]).await.unwrap() else {
            panic!("expected classified recipes");
        };

        assert_eq!(set.exact.len(), 1);
        assert!(set.exact[0].is_fallback());
        assert_eq!(set.partial.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_response_skips_classification() {
        let source = Arc::new(InMemorySource::new(json!([])));
        let lookup = lookup_with(source.clone());
        let mut view = RecordingView::default();

        let outcome = lookup.run(&ingredients("eggs"), &mut view).await.unwrap();

        assert_eq!(outcome, Some(LookupOutcome::NoCandidates));
        assert_eq!(
            view.events,
            vec![ViewEvent::Loading, ViewEvent::LoadingHidden, ViewEvent::NoResults]
        );
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_list_response_counts_as_no_candidates() {
        let lookup = lookup_with(Arc::new(InMemorySource::new(json!({ "status": "ok" }))));

        let outcome = lookup.lookup_recipes(&["eggs".to_string()]).await.unwrap();

        assert_eq!(outcome, LookupOutcome::NoCandidates);
    }

    #[tokio::test]
    async fn test_empty_ingredients_makes_no_request() {
        let source = Arc::new(InMemorySource::new(json!([candidate(1, "Omelette", &[])])));
        let lookup = lookup_with(source.clone());
        let mut view = RecordingView::default();

        let outcome = lookup.run(&IngredientSet::new(), &mut view).await.unwrap();

        assert_eq!(outcome, None);
        assert_eq!(view.events, vec![ViewEvent::Notice(Notice::EmptyIngredients)]);
        assert_eq!(source.find_calls.load(Ordering::SeqCst), 0);
        assert_eq!(lookup.lookup_recipes(&[]).await, Err(LookupError::EmptyIngredients));
    }

    #[tokio::test]
    async fn test_detail_failure_is_isolated() {
        let body = json!([candidate(1, "Omelette", &[]), candidate(2, "Crepes", &["butter"])]);
        let source = Arc::new(
            InMemorySource::new(body)
                .with_details(1, Err(LookupError::Timeout("slow".to_string())))
                .with_details(
                    2,
                    Ok(RecipeDetails {
                        instructions: Some("Mix and pour.".to_string()),
                        ready_in_minutes: Some(25),
                        dish_types: vec!["dessert".to_string()],
                    }),
                ),
        );
        let lookup = lookup_with(source.clone());

        let LookupOutcome::Classified(set) = lookup.lookup_recipes(&["eggs".to_string()]).await.unwrap() else {
            panic!("expected classified recipes");
        };

        let omelette = &set.exact[0];
        assert_eq!(omelette.title, "Omelette");
        assert_eq!(omelette.instructions_text(), None);
        assert_eq!(omelette.prep_minutes(), DEFAULT_READY_IN_MINUTES);
        assert!(omelette.dish_types.is_empty());

        let crepes = &set.partial[0];
        assert_eq!(crepes.prep_minutes(), 25);
        assert_eq!(crepes.missed_ingredients[0].name, "butter");
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_enrichment_preserves_candidate_order() {
        let body = json!([
            candidate(1, "First", &["a"]),
            candidate(2, "Second", &["b"]),
            candidate(3, "Third", &["c"]),
        ]);
        let lookup = lookup_with(Arc::new(InMemorySource::new(body)));

        let LookupOutcome::Classified(set) = lookup.lookup_recipes(&["eggs".to_string()]).await.unwrap() else {
            panic!("expected classified recipes");
        };

        let partial: Vec<&str> = set.partial.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(partial, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_find_failure_shows_generic_notice() {
        let source = Arc::new(InMemorySource::failing(LookupError::Api {
            status: 401,
            message: "invalid key".to_string(),
        }));
        let lookup = lookup_with(source);
        let mut view = RecordingView::default();

        let outcome = lookup.run(&ingredients("eggs"), &mut view).await.unwrap();

        assert_eq!(outcome, None);
        assert_eq!(
            view.events,
            vec![
                ViewEvent::Loading,
                ViewEvent::LoadingHidden,
                ViewEvent::Notice(Notice::LookupFailed)
            ]
        );
    }

    #[tokio::test]
    async fn test_demo_failure_has_distinct_notice() {
        let mut source = InMemorySource::failing(LookupError::Fixture("missing file".to_string()));
        source.mode = "demo";
        let lookup = lookup_with(Arc::new(source));
        let mut view = RecordingView::default();

        lookup.run(&ingredients("eggs"), &mut view).await.unwrap();

        assert_eq!(view.events.last(), Some(&ViewEvent::Notice(Notice::DemoDataUnavailable)));
        assert!(view.events.contains(&ViewEvent::LoadingHidden));
        assert_eq!(lookup.mode_name(), "demo");
    }

    #[tokio::test]
    async fn test_successful_run_renders_both_panels() {
        let body = json!([candidate(1, "Crepes", &["butter"])]);
        let lookup = lookup_with(Arc::new(InMemorySource::new(body)));
        let mut view = RecordingView::default();

        lookup.run(&ingredients("eggs, milk"), &mut view).await.unwrap();

        assert_eq!(view.events.len(), 3);
        assert_eq!(view.events[1], ViewEvent::LoadingHidden);
        match &view.events[2] {
            ViewEvent::Panels { exact, partial } => {
                assert_eq!(exact, &vec!["🥞 Classic Pancakes (Suggested)".to_string()]);
                assert_eq!(partial, &vec!["Crepes".to_string()]);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_render_becomes_notice() {
        let body = json!([candidate(1, "Omelette", &[])]);
        let lookup = lookup_with(Arc::new(InMemorySource::new(body)));
        let mut view = RecordingView {
            fail_render: true,
            ..Default::default()
        };

        let outcome = lookup.run(&ingredients("eggs"), &mut view).await.unwrap();

        assert_eq!(outcome, None);
        assert_eq!(
            view.events,
            vec![
                ViewEvent::Loading,
                ViewEvent::LoadingHidden,
                ViewEvent::Notice(Notice::LookupFailed)
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_no_results_message_becomes_notice() {
        let lookup = lookup_with(Arc::new(InMemorySource::new(json!([]))));
        let mut view = RecordingView {
            fail_render: true,
            ..Default::default()
        };

        let outcome = lookup.run(&ingredients("eggs"), &mut view).await.unwrap();

        assert_eq!(outcome, None);
        assert_eq!(view.events.last(), Some(&ViewEvent::Notice(Notice::LookupFailed)));
    }

    #[test]
    fn test_notice_keys() {
        assert_eq!(Notice::EmptyIngredients.message_key(), "notice-empty-ingredients");
        assert_eq!(Notice::DemoDataUnavailable.message_key(), "error-demo-data");
        assert_eq!(Notice::LookupFailed.message_key(), "error-lookup-failed");
    }
}

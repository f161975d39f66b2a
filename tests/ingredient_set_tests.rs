//! # Ingredient Set Tests
//!
//! This module tests the ingredient collection: normalization, duplicate
//! handling, removal, clearing and the suggested list.

use recipe_finder::ingredient_set::{IngredientSet, SUGGESTED_INGREDIENTS};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent_under_normalization() {
        let mut set = IngredientSet::new();

        assert!(set.add("Eggs"));
        assert!(!set.add("  eggs "));
        assert!(!set.add("EGGS"));

        assert_eq!(set.list().to_vec(), vec!["eggs".to_string()]);
    }

    #[test]
    fn test_add_ignores_empty_input() {
        let mut set = IngredientSet::new();

        assert!(!set.add(""));
        assert!(!set.add("   \t"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut set = IngredientSet::new();
        set.add("milk");
        set.add("flour");
        set.add("eggs");

        let names: Vec<&str> = set.iter().collect();
        assert_eq!(names, vec!["milk", "flour", "eggs"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = IngredientSet::new();
        set.add("milk");
        let before = set.clone();

        assert!(!set.remove("butter"));
        assert_eq!(set, before);
    }

    #[test]
    fn test_remove_after_add_restores_previous_state() {
        let mut set = IngredientSet::new();
        set.add("milk");
        set.add("flour");
        let before = set.clone();

        set.add("Butter");
        assert!(set.remove(" BUTTER"));

        assert_eq!(set, before);
    }

    #[test]
    fn test_clear_always_empties() {
        let mut set = IngredientSet::new();
        set.clear();
        assert!(set.is_empty());

        set.add_entries("eggs, milk, flour");
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_suggest_replaces_collection() {
        let mut set = IngredientSet::new();
        set.add("chocolate");
        set.suggest();

        let expected: Vec<String> = SUGGESTED_INGREDIENTS.iter().map(|s| s.to_string()).collect();
        assert_eq!(set.list().to_vec(), expected);
        assert!(!set.contains("chocolate"));
    }

    #[test]
    fn test_entry_with_separators() {
        let mut set = IngredientSet::new();

        let added = set.add_entries("Eggs, milk\n  flour ,eggs,");

        assert_eq!(added, 3);
        assert_eq!(set.joined(), "eggs,milk,flour");
        assert!(set.iter().all(|name| !name.contains(',')));
    }

    #[test]
    fn test_contains_normalizes() {
        let mut set = IngredientSet::new();
        set.add("brown sugar");
        assert!(set.contains(" Brown Sugar "));
        assert!(!set.contains(""));
    }
}

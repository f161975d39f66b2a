//! # Ingredient Set Module
//!
//! This module owns the list of ingredients a user has entered during a chat
//! session. Names are normalized on the way in so that "Eggs", " eggs " and
//! "EGGS" all end up as the single entry `eggs`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest ingredient name kept, in bytes.
///
/// The remove button carries `rm:<name>` as callback data, which Telegram
/// limits to 64 bytes.
pub const MAX_INGREDIENT_BYTES: usize = 60;

/// One-click example list for first-time users
pub const SUGGESTED_INGREDIENTS: [&str; 4] = ["eggs", "milk", "flour", "sugar"];

lazy_static! {
    // Enter (a new line) or a comma commits an entry
    static ref ENTRY_SEPARATORS: Regex = Regex::new(r"[,\r\n]+").expect("Entry separator pattern should be valid");
}

/// Normalize raw user text into an ingredient name.
///
/// Returns `None` when nothing is left after trimming.
///
/// # Examples
///
/// ```rust
/// use recipe_finder::ingredient_set::normalize_ingredient;
///
/// assert_eq!(normalize_ingredient("  Brown Sugar "), Some("brown sugar".to_string()));
/// assert_eq!(normalize_ingredient("   "), None);
/// ```
pub fn normalize_ingredient(raw: &str) -> Option<String> {
    let mut name = raw.trim().to_lowercase();
    if name.len() > MAX_INGREDIENT_BYTES {
        let mut cut = MAX_INGREDIENT_BYTES;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
        name = name.trim_end().to_string();
    }

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Split a committed chat entry into individual ingredient entries.
///
/// Separators never become part of an entry; empty pieces are dropped.
pub fn split_entries(text: &str) -> Vec<&str> {
    ENTRY_SEPARATORS
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Ordered collection of unique, normalized ingredient names
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSet {
    items: Vec<String>,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ingredient, returning whether the set changed.
    ///
    /// Empty input and names already present are silently ignored.
    pub fn add(&mut self, raw: &str) -> bool {
        let Some(name) = normalize_ingredient(raw) else {
            return false;
        };
        if self.items.contains(&name) {
            debug!(ingredient = %name, "Ignoring duplicate ingredient");
            return false;
        }
        self.items.push(name);
        true
    }

    /// Add every entry of a committed chat message, returning how many were new
    pub fn add_entries(&mut self, text: &str) -> usize {
        split_entries(text)
            .into_iter()
            .filter(|entry| self.add(entry))
            .count()
    }

    /// Remove an ingredient, returning whether it was present
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(name) = normalize_ingredient(name) else {
            return false;
        };
        match self.items.iter().position(|item| *item == name) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the whole collection with the demonstration grocery list
    pub fn suggest(&mut self) {
        self.items = SUGGESTED_INGREDIENTS.iter().map(|s| (*s).to_string()).collect();
    }

    pub fn list(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        normalize_ingredient(name).is_some_and(|name| self.items.contains(&name))
    }

    /// Comma-joined form used by the findByIngredients query
    pub fn joined(&self) -> String {
        self.items.join(",")
    }
}

//! UI Builder module for creating keyboards and callback payloads

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// Import localization
use crate::localization::t_lang;

// Import ingredient types
use crate::ingredient_set::IngredientSet;

use crate::render::toggle_label;

const REMOVE_PREFIX: &str = "rm:";
const TOGGLE: &str = "toggle";
const FIND: &str = "find";
const SUGGEST: &str = "suggest";
const CLEAR: &str = "clear";

/// Actions carried by inline keyboard buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Remove the named ingredient
    Remove(String),
    /// Flip the instructions of the card the button is attached to
    ToggleInstructions,
    FindRecipes,
    Suggest,
    Clear,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(name) = data.strip_prefix(REMOVE_PREFIX) {
            return Some(CallbackAction::Remove(name.to_string()));
        }
        match data {
            TOGGLE => Some(CallbackAction::ToggleInstructions),
            FIND => Some(CallbackAction::FindRecipes),
            SUGGEST => Some(CallbackAction::Suggest),
            CLEAR => Some(CallbackAction::Clear),
            _ => None,
        }
    }

    pub fn to_data(&self) -> String {
        match self {
            CallbackAction::Remove(name) => format!("{REMOVE_PREFIX}{name}"),
            CallbackAction::ToggleInstructions => TOGGLE.to_string(),
            CallbackAction::FindRecipes => FIND.to_string(),
            CallbackAction::Suggest => SUGGEST.to_string(),
            CallbackAction::Clear => CLEAR.to_string(),
        }
    }
}

/// Create the keyboard under the ingredient pills: one remove button per
/// ingredient (two per row) and the action row
pub fn create_pills_keyboard(
    ingredients: &IngredientSet,
    language_code: Option<&str>,
) -> InlineKeyboardMarkup {
    let pills: Vec<InlineKeyboardButton> = ingredients
        .iter()
        .map(|name| {
            InlineKeyboardButton::callback(
                format!("{name} ✕"),
                CallbackAction::Remove(name.to_string()).to_data(),
            )
        })
        .collect();

    let mut rows: Vec<Vec<InlineKeyboardButton>> =
        pills.chunks(2).map(<[InlineKeyboardButton]>::to_vec).collect();

    rows.push(vec![
        InlineKeyboardButton::callback(
            t_lang("button-find", language_code),
            CallbackAction::FindRecipes.to_data(),
        ),
        InlineKeyboardButton::callback(
            t_lang("button-suggest", language_code),
            CallbackAction::Suggest.to_data(),
        ),
        InlineKeyboardButton::callback(
            t_lang("button-clear", language_code),
            CallbackAction::Clear.to_data(),
        ),
    ]);

    InlineKeyboardMarkup::new(rows)
}

/// Create the single-button keyboard of a recipe card
pub fn create_toggle_keyboard(expanded: bool, language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        toggle_label(expanded, language_code),
        CallbackAction::ToggleInstructions.to_data(),
    )]])
}

//! Per-chat session state kept in the dialogue storage.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::ingredient_set::IngredientSet;
use crate::recipe_model::EnrichedRecipe;

/// A recipe card message and the state of its instructions toggle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedCard {
    pub message_id: i32,
    pub recipe: EnrichedRecipe,
    pub expanded: bool,
}

/// Messages making up the rendered exact and partial panels
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPanels {
    /// Panel headers and placeholders
    pub panel_message_ids: Vec<i32>,
    pub cards: Vec<RenderedCard>,
}

impl ResultPanels {
    pub fn is_empty(&self) -> bool {
        self.panel_message_ids.is_empty() && self.cards.is_empty()
    }

    /// Every message id, in the order the messages were sent
    pub fn message_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self
            .panel_message_ids
            .iter()
            .copied()
            .chain(self.cards.iter().map(|card| card.message_id))
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Flip a card's instructions between collapsed and expanded
    pub fn toggle(&mut self, message_id: i32) -> Option<&RenderedCard> {
        let card = self.cards.iter_mut().find(|card| card.message_id == message_id)?;
        card.expanded = !card.expanded;
        Some(&*card)
    }
}

/// Everything the bot remembers about one chat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSession {
    pub ingredients: IngredientSet,
    /// The message showing the ingredient pills, edited in place on refresh
    pub pills_message_id: Option<i32>,
    pub results: ResultPanels,
}

impl WidgetSession {
    /// Empty the ingredients and drop both result panels.
    ///
    /// Returns the ids of the result messages that have to be deleted.
    pub fn clear(&mut self) -> Vec<i32> {
        self.ingredients.clear();
        self.take_results().message_ids()
    }

    /// Detach the current result panels, leaving the session without results
    pub fn take_results(&mut self) -> ResultPanels {
        std::mem::take(&mut self.results)
    }

    /// Store the panels of a finished lookup.
    ///
    /// `replaced_ids` are the result messages the lookup itself removed. Any
    /// other result message in the session came from an overlapping lookup;
    /// its id is returned for deletion. Ingredients are left untouched.
    pub fn install_results(&mut self, rendered: ResultPanels, replaced_ids: &[i32]) -> Vec<i32> {
        let stale = self
            .take_results()
            .message_ids()
            .into_iter()
            .filter(|id| !replaced_ids.contains(id))
            .collect();
        self.results = rendered;
        stale
    }
}

/// Type alias for the per-chat session dialogue
pub type WidgetDialogue = Dialogue<WidgetSession, InMemStorage<WidgetSession>>;

//! # Rendering Module
//!
//! Turns ingredients and recipes into Telegram HTML. Every piece of text that
//! comes from the user or from the recipe source is escaped before it is put
//! into markup: `&`, `<` and `>` in body text, plus `"` inside attributes.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use crate::ingredient_set::IngredientSet;
use crate::localization::{t_args_lang, t_lang};
use crate::recipe_model::EnrichedRecipe;

/// Instructions longer than this are cut to stay under Telegram's message limit
pub const MAX_INSTRUCTIONS_CHARS: usize = 3000;

pub const DEFAULT_DISH_EMOJI: &str = "🍽️";

lazy_static! {
    static ref BREAK_TAGS: Regex =
        Regex::new(r"(?i)<\s*(?:br\s*/?|/\s*(?:li|p|div|ol|ul|h\d))\s*>").expect("Break tag pattern should be valid");
    // a bare "<" or ">" in prose is text, not a tag
    static ref ANY_TAG: Regex = Regex::new(r"</?[A-Za-z][^<>]*>").expect("Tag pattern should be valid");
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").expect("Blank line pattern should be valid");
}

/// Escape text placed between tags
pub fn escape_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Escape text placed inside a double-quoted attribute value
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

/// Emoji for a recipe's primary dish type
pub fn dish_emoji(dish_type: Option<&str>) -> &'static str {
    match dish_type.map(str::to_lowercase).as_deref() {
        Some("breakfast") => "🍳",
        Some("lunch") => "🥪",
        Some("dinner") => "🍽️",
        Some("dessert") => "🍰",
        Some("appetizer" | "salad") => "🥗",
        Some("soup") => "🍲",
        Some("snack") => "🍿",
        _ => DEFAULT_DISH_EMOJI,
    }
}

/// Flatten instruction markup from the API into plain text.
///
/// List items and breaks become new lines, other tags are dropped and
/// entities decoded. The result still has to be escaped before rendering.
pub fn plain_instructions(raw: &str) -> String {
    let with_breaks = BREAK_TAGS.replace_all(raw, "\n");
    let without_tags = ANY_TAG.replace_all(&with_breaks, "");
    let decoded = html_escape::decode_html_entities(&without_tags);

    let lines: Vec<&str> = decoded.lines().map(str::trim).collect();
    let text = BLANK_LINES.replace_all(lines.join("\n").trim(), "\n\n").into_owned();

    if text.chars().count() > MAX_INSTRUCTIONS_CHARS {
        let mut cut: String = text.chars().take(MAX_INSTRUCTIONS_CHARS).collect();
        cut.push('…');
        cut
    } else {
        text
    }
}

/// Label of the instructions toggle button
pub fn toggle_label(expanded: bool, language_code: Option<&str>) -> String {
    if expanded {
        t_lang("toggle-hide", language_code)
    } else {
        t_lang("toggle-show", language_code)
    }
}

fn missing_ingredients_text(recipe: &EnrichedRecipe, language_code: Option<&str>) -> String {
    let names: Vec<String> = recipe
        .missed_ingredients
        .iter()
        .map(|ingredient| ingredient.name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| escape_text(name).into_owned())
        .collect();

    if names.is_empty() {
        t_lang("card-missing-none", language_code)
    } else {
        names.join(", ")
    }
}

/// Render one recipe card.
///
/// Collapsed cards leave the instructions out; expanded cards append them
/// in a block quote.
pub fn render_card(recipe: &EnrichedRecipe, expanded: bool, language_code: Option<&str>) -> String {
    let emoji = dish_emoji(recipe.primary_dish_type());
    let minutes = recipe.prep_minutes().to_string();

    let mut card = format!(
        "<b>{emoji} {title}</b>\n<b>{cook_time}</b> {minutes}\n<b>{missing}</b> {missing_list}",
        title = escape_text(&recipe.title),
        cook_time = t_lang("card-cook-time", language_code),
        minutes = t_args_lang("card-minutes", &[("minutes", minutes.as_str())], language_code),
        missing = t_lang("card-missing", language_code),
        missing_list = missing_ingredients_text(recipe, language_code),
    );

    if !recipe.image.trim().is_empty() {
        card.push_str(&format!(
            "\n<a href=\"{href}\">{label}</a>",
            href = escape_attribute(recipe.image.trim()),
            label = t_lang("card-image", language_code),
        ));
    }

    if expanded {
        let instructions = recipe
            .instructions_text()
            .map(plain_instructions)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| t_lang("card-no-instructions", language_code));
        card.push_str(&format!("\n\n<blockquote>{}</blockquote>", escape_text(&instructions)));
    }

    card
}

/// The two result panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Exact,
    Partial,
}

impl PanelKind {
    fn title_key(self) -> &'static str {
        match self {
            PanelKind::Exact => "panel-exact-title",
            PanelKind::Partial => "panel-partial-title",
        }
    }
}

/// Markup of one result panel: a header message followed by card messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMarkup {
    pub kind: PanelKind,
    pub header: String,
    /// Collapsed cards, one per recipe in panel order
    pub cards: Vec<String>,
}

/// Render a panel; an empty recipe list gets the "no recipes found" placeholder
pub fn render_panel(
    kind: PanelKind,
    recipes: &[EnrichedRecipe],
    language_code: Option<&str>,
) -> PanelMarkup {
    let title = t_lang(kind.title_key(), language_code);
    let header = if recipes.is_empty() {
        format!("<b>{title}</b>\n{}", t_lang("no-recipes-found", language_code))
    } else {
        format!("<b>{title}</b>")
    };

    PanelMarkup {
        kind,
        header,
        cards: recipes
            .iter()
            .map(|recipe| render_card(recipe, false, language_code))
            .collect(),
    }
}

/// Exact panel content when the source returned no candidates at all
pub fn render_no_results(language_code: Option<&str>) -> String {
    format!(
        "<b>{}</b>\n{}",
        t_lang(PanelKind::Exact.title_key(), language_code),
        t_lang("no-recipes-hint", language_code)
    )
}

/// Render the ingredient pills message
pub fn render_pills(ingredients: &IngredientSet, language_code: Option<&str>) -> String {
    if ingredients.is_empty() {
        return t_lang("pills-empty", language_code);
    }

    let pills: Vec<String> = ingredients
        .iter()
        .map(|name| format!("<code>{}</code>", escape_text(name)))
        .collect();
    format!("<b>{}</b>\n{}", t_lang("pills-title", language_code), pills.join(" "))
}

//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, error};

use crate::lookup::RecipeLookup;
use crate::render::render_card;
use crate::session::WidgetDialogue;

use super::results_view::{delete_messages, refresh_pills, spawn_find_recipes};

// Import UI builder functions
use super::ui_builder::{create_toggle_keyboard, CallbackAction};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: WidgetDialogue,
    lookup: Arc<RecipeLookup>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    let language_code = q.from.language_code.as_deref();
    let action = q.data.as_deref().and_then(CallbackAction::parse);

    if let (Some(action), Some(msg)) = (action, &q.message) {
        let chat_id = msg.chat().id;
        let message_id = msg.id();

        match action {
            CallbackAction::Remove(name) => {
                let mut session = dialogue.get_or_default().await?;
                if session.ingredients.remove(&name) {
                    refresh_pills(&bot, chat_id, &mut session, language_code, false).await?;
                    dialogue.update(session).await?;
                }
            }
            CallbackAction::Suggest => {
                let mut session = dialogue.get_or_default().await?;
                session.ingredients.suggest();
                refresh_pills(&bot, chat_id, &mut session, language_code, false).await?;
                dialogue.update(session).await?;
            }
            CallbackAction::Clear => {
                let mut session = dialogue.get_or_default().await?;
                let result_ids = session.clear();
                delete_messages(&bot, chat_id, &result_ids).await;
                refresh_pills(&bot, chat_id, &mut session, language_code, false).await?;
                dialogue.update(session).await?;
            }
            CallbackAction::FindRecipes => {
                spawn_find_recipes(
                    bot.clone(),
                    chat_id,
                    dialogue.clone(),
                    Arc::clone(&lookup),
                    language_code.map(str::to_string),
                );
            }
            CallbackAction::ToggleInstructions => {
                let mut session = dialogue.get_or_default().await?;
                if let Some(card) = session.results.toggle(message_id.0) {
                    let text = render_card(&card.recipe, card.expanded, language_code);
                    let keyboard = create_toggle_keyboard(card.expanded, language_code);
                    if let Err(e) = bot
                        .edit_message_text(chat_id, message_id, text)
                        .parse_mode(ParseMode::Html)
                        .reply_markup(keyboard)
                        .await
                    {
                        error!(user_id = %q.from.id, error = %e, "Failed to toggle recipe instructions");
                    }
                    dialogue.update(session).await?;
                } else {
                    debug!(user_id = %q.from.id, message_id = message_id.0, "Toggle on a card that is no longer tracked");
                }
            }
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

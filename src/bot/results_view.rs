//! Telegram side of the lookup: loading message, notices, result panels,
//! and the ingredient pills message.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, MessageId, ParseMode};
use teloxide::{ApiError, RequestError};
use tracing::{debug, error, info, warn};

// Import localization
use crate::localization::t_lang;

use crate::lookup::{Notice, RecipeLookup, ResultsView};
use crate::recipe_model::ClassifiedRecipeSet;
use crate::render::{render_no_results, render_panel, render_pills, PanelKind};
use crate::session::{RenderedCard, ResultPanels, WidgetDialogue, WidgetSession};

// Import UI builder functions
use super::ui_builder::{create_pills_keyboard, create_toggle_keyboard};

/// Delete messages, logging failures (they may already be gone)
pub async fn delete_messages(bot: &Bot, chat_id: ChatId, message_ids: &[i32]) {
    for &message_id in message_ids {
        if let Err(e) = bot.delete_message(chat_id, MessageId(message_id)).await {
            debug!(user_id = %chat_id, message_id, error = %e, "Could not delete message");
        }
    }
}

/// Re-render the ingredient pills.
///
/// With `resend` the old pills message is replaced by a new one at the
/// bottom of the chat; otherwise it is edited in place.
pub async fn refresh_pills(
    bot: &Bot,
    chat_id: ChatId,
    session: &mut WidgetSession,
    language_code: Option<&str>,
    resend: bool,
) -> Result<()> {
    let text = render_pills(&session.ingredients, language_code);
    let keyboard = create_pills_keyboard(&session.ingredients, language_code);

    if let (Some(message_id), false) = (session.pills_message_id, resend) {
        match bot
            .edit_message_text(chat_id, MessageId(message_id), &text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard.clone())
            .await
        {
            Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => return Ok(()),
            Err(e) => {
                debug!(user_id = %chat_id, error = %e, "Pills message not editable, sending a new one");
            }
        }
    }

    if let Some(old_message_id) = session.pills_message_id.take() {
        delete_messages(bot, chat_id, &[old_message_id]).await;
    }

    let sent = bot
        .send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    session.pills_message_id = Some(sent.id.0);
    Ok(())
}

/// Results view writing into a Telegram chat
pub struct TelegramResultsView {
    bot: Bot,
    chat_id: ChatId,
    language_code: Option<String>,
    /// Panels currently on screen, replaced by the next render
    previous: ResultPanels,
    rendered: Option<ResultPanels>,
    loading_message: Option<MessageId>,
}

impl TelegramResultsView {
    pub fn new(bot: Bot, chat_id: ChatId, language_code: Option<&str>, previous: ResultPanels) -> Self {
        Self {
            bot,
            chat_id,
            language_code: language_code.map(str::to_string),
            previous,
            rendered: None,
            loading_message: None,
        }
    }

    fn lang(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    /// Panels rendered by this view, if the lookup got that far
    pub fn into_rendered(self) -> Option<ResultPanels> {
        self.rendered
    }

    async fn send_html(&self, text: String) -> Result<Message> {
        Ok(self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?)
    }

    /// Delete the panels on screen. From here on the chat shows no results
    /// until a render completes.
    async fn clear_previous(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        delete_messages(&self.bot, self.chat_id, &previous.message_ids()).await;
        self.rendered = Some(ResultPanels::default());
    }

    async fn send_panels(&self, recipes: &ClassifiedRecipeSet, panels: &mut ResultPanels) -> Result<()> {
        for (kind, list) in [
            (PanelKind::Exact, &recipes.exact),
            (PanelKind::Partial, &recipes.partial),
        ] {
            let markup = render_panel(kind, list, self.lang());
            let header = self.send_html(markup.header).await?;
            panels.panel_message_ids.push(header.id.0);

            for (recipe, card) in list.iter().zip(markup.cards) {
                let sent = self
                    .bot
                    .send_message(self.chat_id, card)
                    .parse_mode(ParseMode::Html)
                    .reply_markup(create_toggle_keyboard(false, self.lang()))
                    .await?;
                panels.cards.push(RenderedCard {
                    message_id: sent.id.0,
                    recipe: recipe.clone(),
                    expanded: false,
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ResultsView for TelegramResultsView {
    async fn show_loading(&mut self) -> Result<()> {
        if let Err(e) = self.bot.send_chat_action(self.chat_id, ChatAction::Typing).await {
            debug!(user_id = %self.chat_id, error = %e, "Could not send typing action");
        }
        let sent = self
            .bot
            .send_message(self.chat_id, t_lang("loading", self.lang()))
            .await?;
        self.loading_message = Some(sent.id);
        Ok(())
    }

    async fn hide_loading(&mut self) {
        if let Some(message_id) = self.loading_message.take() {
            delete_messages(&self.bot, self.chat_id, &[message_id.0]).await;
        }
    }

    async fn notify(&mut self, notice: Notice) -> Result<()> {
        self.bot
            .send_message(self.chat_id, t_lang(notice.message_key(), self.lang()))
            .await?;
        Ok(())
    }

    async fn show_no_results(&mut self) -> Result<()> {
        self.clear_previous().await;
        let sent = self.send_html(render_no_results(self.lang())).await?;
        self.rendered = Some(ResultPanels {
            panel_message_ids: vec![sent.id.0],
            cards: Vec::new(),
        });
        Ok(())
    }

    async fn render_panels(&mut self, recipes: &ClassifiedRecipeSet) -> Result<()> {
        self.clear_previous().await;
        let mut panels = ResultPanels::default();

        if let Err(e) = self.send_panels(recipes, &mut panels).await {
            // a half-rendered result list is removed rather than left untracked
            delete_messages(&self.bot, self.chat_id, &panels.message_ids()).await;
            return Err(e);
        }

        self.rendered = Some(panels);
        Ok(())
    }
}

/// Run a lookup for the chat and store the rendered panels in the session
pub async fn find_recipes(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &WidgetDialogue,
    lookup: &RecipeLookup,
    language_code: Option<&str>,
) -> Result<()> {
    let session = dialogue.get_or_default().await?;
    let replaced_ids = session.results.message_ids();
    info!(user_id = %chat_id, mode = lookup.mode_name(), ingredients = session.ingredients.len(), "Starting recipe lookup");

    let mut view = TelegramResultsView::new(bot.clone(), chat_id, language_code, session.results.clone());
    lookup.run(&session.ingredients, &mut view).await?;

    let Some(rendered) = view.into_rendered() else {
        return Ok(());
    };

    // The session may have changed while the lookup was running
    let mut latest = dialogue.get_or_default().await?;
    let stale = latest.install_results(rendered, &replaced_ids);
    if !stale.is_empty() {
        warn!(user_id = %chat_id, messages = stale.len(), "Replacing results of an overlapping lookup");
        delete_messages(bot, chat_id, &stale).await;
    }

    dialogue.update(latest).await?;
    Ok(())
}

/// Start a lookup in the background so the chat stays responsive.
///
/// Updates of one chat are handled one at a time, so awaiting the lookup in
/// the handler would hold back every button press until it finished.
pub fn spawn_find_recipes(
    bot: Bot,
    chat_id: ChatId,
    dialogue: WidgetDialogue,
    lookup: Arc<RecipeLookup>,
    language_code: Option<String>,
) {
    tokio::spawn(async move {
        if let Err(e) = find_recipes(&bot, chat_id, &dialogue, &lookup, language_code.as_deref()).await {
            error!(user_id = %chat_id, error = %e, "Recipe lookup task failed");
        }
    });
}

//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

// Import localization
use crate::localization::t_lang;

use crate::lookup::RecipeLookup;
use crate::session::WidgetDialogue;

use super::results_view::{delete_messages, refresh_pills, spawn_find_recipes};

/// Split "/command@BotName argument" into the command and its argument.
///
/// Returns `None` for plain text.
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, argument) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let command = head.split('@').next().unwrap_or(head);
    Some((command, argument.trim()))
}

fn language_code_of(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_deref())
}

async fn send_welcome(bot: &Bot, msg: &Message, lookup: &RecipeLookup, language_code: Option<&str>) -> Result<()> {
    let mut lines = vec![
        format!("👋 {}", t_lang("welcome-title", language_code)),
        t_lang("welcome-description", language_code),
        t_lang("welcome-usage", language_code),
    ];
    if lookup.mode_name() == "demo" {
        lines.push(t_lang("welcome-demo-mode", language_code));
    }
    bot.send_message(msg.chat.id, lines.join("\n\n")).await?;
    Ok(())
}

async fn send_help(bot: &Bot, msg: &Message, language_code: Option<&str>) -> Result<()> {
    let help_message = [
        "help-title",
        "help-step1",
        "help-step2",
        "help-step3",
        "help-step4",
        "help-commands",
    ]
    .iter()
    .map(|key| t_lang(key, language_code))
    .collect::<Vec<_>>()
    .join("\n\n");
    bot.send_message(msg.chat.id, help_message).await?;
    Ok(())
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    dialogue: &WidgetDialogue,
    lookup: &Arc<RecipeLookup>,
    command: &str,
    argument: &str,
) -> Result<()> {
    let language_code = language_code_of(msg);
    let chat_id = msg.chat.id;
    debug!(user_id = %chat_id, command, "Received command from user");

    match command {
        "start" => {
            send_welcome(bot, msg, lookup, language_code).await?;
            let mut session = dialogue.get_or_default().await?;
            refresh_pills(bot, chat_id, &mut session, language_code, true).await?;
            dialogue.update(session).await?;
        }
        "recipes" | "find" => {
            spawn_find_recipes(
                bot.clone(),
                chat_id,
                dialogue.clone(),
                Arc::clone(lookup),
                language_code.map(str::to_string),
            );
        }
        "suggest" => {
            let mut session = dialogue.get_or_default().await?;
            session.ingredients.suggest();
            refresh_pills(bot, chat_id, &mut session, language_code, true).await?;
            dialogue.update(session).await?;
        }
        "clear" => {
            let mut session = dialogue.get_or_default().await?;
            let result_ids = session.clear();
            delete_messages(bot, chat_id, &result_ids).await;
            refresh_pills(bot, chat_id, &mut session, language_code, true).await?;
            dialogue.update(session).await?;
        }
        "remove" if argument.is_empty() => {
            bot.send_message(chat_id, t_lang("remove-usage", language_code))
                .await?;
        }
        "remove" => {
            let mut session = dialogue.get_or_default().await?;
            if session.ingredients.remove(argument) {
                refresh_pills(bot, chat_id, &mut session, language_code, true).await?;
                dialogue.update(session).await?;
            }
        }
        _ => send_help(bot, msg, language_code).await?,
    }
    Ok(())
}

async fn handle_ingredient_entry(
    bot: &Bot,
    msg: &Message,
    dialogue: &WidgetDialogue,
    text: &str,
) -> Result<()> {
    let language_code = language_code_of(msg);
    let mut session = dialogue.get_or_default().await?;

    let added = session.ingredients.add_entries(text);
    debug!(user_id = %msg.chat.id, added, total = session.ingredients.len(), "Processed ingredient entry");
    if added == 0 {
        return Ok(());
    }

    refresh_pills(bot, msg.chat.id, &mut session, language_code, true).await?;
    dialogue.update(session).await?;
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: WidgetDialogue,
    lookup: Arc<RecipeLookup>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(user_id = %msg.chat.id, "Ignoring non-text message");
        return send_help(&bot, &msg, language_code_of(&msg)).await;
    };

    match parse_command(text) {
        Some((command, argument)) => {
            handle_command(&bot, &msg, &dialogue, &lookup, command, argument).await
        }
        None => handle_ingredient_entry(&bot, &msg, &dialogue, text).await,
    }
}

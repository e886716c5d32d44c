//! Telegram wiring: maps platform updates to dispatcher events and sends
//! the replies back.
//!
//! Uses the explicit Dispatcher pattern with a dptree handler tree for
//! reliable long polling. Handler errors are logged by teloxide's error
//! handler; the polling loop itself never crashes on a bad update.

use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use causerie_core::dispatcher::{messages, Event, MenuAction, Reply};
use causerie_types::identity;

use crate::state::AppState;

/// Run the long-polling loop until the process is stopped.
pub async fn run(bot: Bot, state: AppState) {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::debug!("unhandled update: {:?}", upd);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "error in update handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

/// Text and voice messages.
async fn message_handler(bot: Bot, msg: Message, state: AppState) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        // Channel posts and service messages have no sender to key
        // credentials on.
        return Ok(());
    };
    let user = identity::UserId(from.id.0 as i64);
    let chat = identity::ChatId(msg.chat.id.0);

    let event = if let Some(voice) = msg.voice() {
        tracing::info!(%user, %chat, "voice message ({} bytes)", voice.file.size);
        let file = bot.get_file(&voice.file.id).await?;
        let mut audio = Vec::with_capacity(voice.file.size as usize);
        bot.download_file(&file.path, &mut audio).await?;
        Some(Event::VoiceMessage { audio })
    } else {
        msg.text().and_then(parse_text)
    };

    let Some(event) = event else {
        return Ok(());
    };

    let replies = state.dispatcher.handle(user, chat, event).await;
    send_replies(&bot, msg.chat.id, replies).await
}

/// Inline keyboard button presses.
async fn callback_handler(bot: Bot, query: CallbackQuery, state: AppState) -> ResponseResult<()> {
    bot.answer_callback_query(&query.id).await?;

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    let Some(message) = query.message.as_ref() else {
        return Ok(());
    };
    let chat = message.chat().id;
    let user = identity::UserId(query.from.id.0 as i64);

    let replies = match MenuAction::parse(data) {
        Some(MenuAction::Start) => {
            state
                .dispatcher
                .handle(user, identity::ChatId(chat.0), Event::Start)
                .await
        }
        Some(MenuAction::BeginConversation) => {
            state
                .dispatcher
                .handle(user, identity::ChatId(chat.0), Event::BeginConversation)
                .await
        }
        // Keys are registered with /setapikey; the button only points there.
        Some(MenuAction::SetApiKey) => vec![Reply::Text(messages::SET_KEY_HINT.to_string())],
        None => {
            tracing::debug!("unknown callback payload: {data}");
            return Ok(());
        }
    };

    send_replies(&bot, chat, replies).await
}

/// Map an inbound text message to a dispatcher event.
///
/// Unknown slash commands are dropped rather than treated as questions.
fn parse_text(text: &str) -> Option<Event> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed.starts_with('/') {
        return Some(Event::TextQuestion {
            text: trimmed.to_string(),
        });
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let args = parts.next().unwrap_or("").trim();

    // Commands may arrive as "/start@botname" in group chats.
    match command.split('@').next().unwrap_or_default() {
        "/start" => Some(Event::Start),
        "/groq" => Some(Event::BeginConversation),
        "/setapikey" => Some(Event::SetCredential {
            key: args.to_string(),
        }),
        _ => None,
    }
}

async fn send_replies(
    bot: &Bot,
    chat: teloxide::types::ChatId,
    replies: Vec<Reply>,
) -> ResponseResult<()> {
    for reply in replies {
        match reply {
            Reply::Text(text) => {
                bot.send_message(chat, text).await?;
            }
            Reply::Menu { text, actions } => {
                bot.send_message(chat, text)
                    .reply_markup(menu_keyboard(&actions))
                    .await?;
            }
        }
    }
    Ok(())
}

/// One button per row.
fn menu_keyboard(actions: &[MenuAction]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        actions
            .iter()
            .map(|action| vec![InlineKeyboardButton::callback(action.label(), action.data())]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_commands() {
        assert!(matches!(parse_text("/start"), Some(Event::Start)));
        assert!(matches!(
            parse_text("/groq"),
            Some(Event::BeginConversation)
        ));
        assert!(matches!(
            parse_text("/start@causerie_bot"),
            Some(Event::Start)
        ));
    }

    #[test]
    fn test_parse_text_setapikey_joins_args() {
        match parse_text("/setapikey  gsk_abc123  ") {
            Some(Event::SetCredential { key }) => assert_eq!(key, "gsk_abc123"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_text_setapikey_without_args_is_empty_key() {
        // Validation happens in the dispatcher, which answers with the
        // re-prompt message.
        match parse_text("/setapikey") {
            Some(Event::SetCredential { key }) => assert!(key.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_text_plain_message_is_a_question() {
        match parse_text("  Quelle est la capitale de la France?  ") {
            Some(Event::TextQuestion { text }) => {
                assert_eq!(text, "Quelle est la capitale de la France?");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_parse_text_unknown_command_is_dropped() {
        assert!(parse_text("/unknown").is_none());
        assert!(parse_text("").is_none());
        assert!(parse_text("   ").is_none());
    }

    #[test]
    fn test_menu_keyboard_one_button_per_row() {
        let keyboard = menu_keyboard(&MenuAction::ALL);
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Start");
        assert_eq!(keyboard.inline_keyboard[1][0].text, "Set API Key");
        assert_eq!(keyboard.inline_keyboard[2][0].text, "Groq");
    }
}

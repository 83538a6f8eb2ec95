use crate::commands::{self, Command, CommandContext};
use crate::config::Config;
use crate::delivery::TextFormat;
use crate::languages::LanguageRegistry;
use crate::pagination::{Navigation, SessionStore};
use crate::telegram::{
    navigation_keyboard, CallbackQuery, Message, ReplyTarget, TelegramClient, Update,
};
use crate::translate::{GoogleTranslator, ReferencedMessage, TranslationService};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Long-lived bot state shared by every update handler.
pub struct Bot {
    config: Config,
    registry: &'static LanguageRegistry,
    telegram: TelegramClient,
    translator: Arc<dyn TranslationService>,
    sessions: SessionStore,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        let translator = Arc::new(GoogleTranslator::new(&config));
        Self::with_translator(config, translator)
    }

    pub fn with_translator(config: Config, translator: Arc<dyn TranslationService>) -> Self {
        Self {
            registry: LanguageRegistry::get(),
            telegram: TelegramClient::new(&config),
            sessions: SessionStore::new(config.max_pagination_sessions),
            translator,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn telegram(&self) -> &TelegramClient {
        &self.telegram
    }

    /// Handle one webhook update. Failures are logged, never returned.
    pub async fn handle_update(&self, update: Update) {
        if let Some(message) = update.message {
            self.handle_message(message).await;
        } else if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await;
        } else {
            debug!("Ignoring update {} with no message or callback", update.update_id);
        }
    }

    async fn handle_message(&self, message: Message) {
        if message.from.as_ref().is_some_and(|user| user.is_bot) {
            return;
        }
        let Some(text) = message.content() else {
            return;
        };
        let Some(command) = Command::parse(text, &self.config.command_prefix) else {
            return;
        };

        let chat_id = message.chat.id;
        // Anonymous group admins and channel posts carry no sender
        let requester = message.from.as_ref().map_or(chat_id, |user| user.id);
        info!("Command {} from {} in chat {}", command.name(), requester, chat_id);

        let referenced = message.reply_to_message.as_deref().map(|replied| ReferencedMessage {
            author_id: replied.from.as_ref().map(|user| user.id),
            text: replied.content().unwrap_or_default().to_string(),
        });

        let ctx = CommandContext {
            registry: self.registry,
            translator: self.translator.as_ref(),
            sessions: &self.sessions,
            bot_id: self.config.bot_id,
            prefix: &self.config.command_prefix,
            chat_id,
            requester,
            referenced,
        };
        let sink = ReplyTarget::new(&self.telegram, chat_id, message.message_id);

        commands::run(&command, &ctx, &sink).await;
    }

    /// Turn a listing page if the press is a valid navigation by the
    /// listing's requester, then acknowledge the press either way.
    async fn handle_callback(&self, callback: CallbackQuery) {
        let navigation = callback.data.as_deref().and_then(Navigation::from_callback);

        if let (Some(navigation), Some(message)) = (navigation, &callback.message) {
            let key = (message.chat.id, message.message_id);
            let turn = self.sessions.navigate(key, callback.from.id, navigation).await;

            // The turn is held across the edit so pages land in cursor order
            if let Some(turn) = turn {
                if let Err(e) = self
                    .telegram
                    .edit_message_text(
                        key.0,
                        key.1,
                        turn.page(),
                        Some(&navigation_keyboard()),
                        TextFormat::Markdown,
                    )
                    .await
                {
                    warn!("Failed to turn page of listing {:?}: {:#}", key, e);
                }
            }
        }

        if let Err(e) = self.telegram.answer_callback_query(&callback.id).await {
            warn!("Failed to answer callback {}: {:#}", callback.id, e);
        }
    }
}

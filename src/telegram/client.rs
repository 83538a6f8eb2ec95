use super::types::{InlineKeyboardButton, InlineKeyboardMarkup, SentMessage, TgResponse};
use crate::config::Config;
use crate::delivery::{MessageSink, TextFormat};
use crate::pagination::{NEXT_CALLBACK, NEXT_LABEL, PREVIOUS_CALLBACK, PREVIOUS_LABEL};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

/// HTTP client for the Telegram Bot API.
pub struct TelegramClient {
    client: reqwest::Client,
    /// `{api_url}/bot{token}`
    base_url: String,
}

impl TelegramClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!(
                "{}/bot{}",
                config.telegram_api_url.trim_end_matches('/'),
                config.bot_token
            ),
        }
    }

    /// Call `method` and unwrap the `{ok, result, description}` envelope.
    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {method} request to Telegram API"))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let envelope: TgResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                anyhow::bail!("Telegram API error ({}) on {}: {}", status, method, text)
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Unexpected {method} response: {text}"))
            }
        };

        if !status.is_success() || !envelope.ok {
            anyhow::bail!(
                "Telegram API error ({}) on {}: {}",
                status,
                method,
                envelope.description.unwrap_or_default()
            );
        }

        envelope
            .result
            .with_context(|| format!("Telegram {method} response has no result"))
    }

    /// Send `text` to `chat_id`, optionally as a reply and with buttons.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to: Option<i64>,
        markup: Option<&InlineKeyboardMarkup>,
        format: TextFormat,
    ) -> Result<SentMessage> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(message_id) = reply_to {
            body["reply_parameters"] = json!({
                "message_id": message_id,
                "allow_sending_without_reply": true,
            });
        }
        apply_options(&mut body, markup, format)?;

        debug!("sendMessage to chat {} ({} chars)", chat_id, text.chars().count());
        self.call("sendMessage", &body).await
    }

    /// Replace the text of a message the bot sent earlier.
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
        format: TextFormat,
    ) -> Result<()> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        apply_options(&mut body, markup, format)?;

        // Result is the edited Message, or `true` for inline messages
        self.call::<Value>("editMessageText", &body).await?;
        Ok(())
    }

    /// Acknowledge a button press so the client stops showing it as pending.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        let body = json!({ "callback_query_id": callback_query_id });
        self.call::<bool>("answerCallbackQuery", &body).await?;
        Ok(())
    }

    /// Point Telegram at our webhook endpoint.
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret_token {
            body["secret_token"] = json!(secret);
        }

        self.call::<bool>("setWebhook", &body).await?;
        Ok(())
    }
}

fn apply_options(
    body: &mut Value,
    markup: Option<&InlineKeyboardMarkup>,
    format: TextFormat,
) -> Result<()> {
    if let Some(markup) = markup {
        body["reply_markup"] =
            serde_json::to_value(markup).context("Failed to serialize reply markup")?;
    }
    if format == TextFormat::Markdown {
        body["parse_mode"] = json!("Markdown");
    }
    Ok(())
}

/// The previous/next button row shown under a paged listing.
pub fn navigation_keyboard() -> InlineKeyboardMarkup {
    let button = |text: &str, data: &str| InlineKeyboardButton {
        text: text.to_string(),
        callback_data: data.to_string(),
    };

    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![
            button(PREVIOUS_LABEL, PREVIOUS_CALLBACK),
            button(NEXT_LABEL, NEXT_CALLBACK),
        ]],
    }
}

/// The conversation a command was issued in, bound to the triggering message.
pub struct ReplyTarget<'a> {
    client: &'a TelegramClient,
    chat_id: i64,
    message_id: i64,
}

impl<'a> ReplyTarget<'a> {
    pub fn new(client: &'a TelegramClient, chat_id: i64, message_id: i64) -> Self {
        Self {
            client,
            chat_id,
            message_id,
        }
    }
}

#[async_trait]
impl MessageSink for ReplyTarget<'_> {
    async fn reply(&self, text: &str, format: TextFormat) -> Result<()> {
        self.client
            .send_message(self.chat_id, text, Some(self.message_id), None, format)
            .await?;
        Ok(())
    }

    async fn follow_up(&self, text: &str, format: TextFormat) -> Result<()> {
        self.client
            .send_message(self.chat_id, text, None, None, format)
            .await?;
        Ok(())
    }

    async fn reply_with_navigation(&self, text: &str, format: TextFormat) -> Result<i64> {
        let sent = self
            .client
            .send_message(
                self.chat_id,
                text,
                Some(self.message_id),
                Some(&navigation_keyboard()),
                format,
            )
            .await?;
        Ok(sent.message_id)
    }
}

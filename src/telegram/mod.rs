//! Telegram Bot API: wire types and the HTTP client the bot replies through.

mod client;
mod types;

pub use client::{navigation_keyboard, ReplyTarget, TelegramClient};
pub use types::{
    CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Message, SentMessage,
    TgResponse, Update, User,
};

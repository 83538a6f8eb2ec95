//! Translation of replied-to messages.
//!
//! - `google`: HTTP client for language detection and Google translation
//! - `pipeline`: the per-invocation translate flow and its reply formatting

mod google;
mod pipeline;

pub use google::{GoogleTranslator, ServiceError, MAX_TRANSLATION_CHARS};
pub use pipeline::{
    format_translation, ReferencedMessage, TranslateError, TranslationContext,
    TranslationPipeline,
};

#[cfg(test)]
pub(crate) use pipeline::testing;

use anyhow::Result;
use async_trait::async_trait;

/// External language detection and translation.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Detect the language of `text`, returning the service's language code.
    async fn detect(&self, text: &str) -> Result<String>;

    /// Translate `text` from `source` to `target` (both service codes).
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

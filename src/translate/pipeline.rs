use super::TranslationService;
use crate::languages::{LanguageRegistry, SIMPLIFIED_CHINESE};
use thiserror::Error;
use tracing::{debug, info};

/// The message a translate command replies to.
#[derive(Debug, Clone)]
pub struct ReferencedMessage {
    /// Author's user id, when the platform reports one
    pub author_id: Option<i64>,
    /// Text or media caption
    pub text: String,
}

/// Values gathered during one translate invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationContext {
    pub source_text: String,
    pub dest_code: &'static str,
    pub source_code: &'static str,
    pub result_text: String,
}

/// Why a translation stopped. The first failing step ends the invocation.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("no replied-to message")]
    NoReferencedMessage,

    #[error("`{0}` is not a valid language")]
    InvalidLanguage(String),

    #[error("replied-to message has no text")]
    EmptyMessage,

    #[error("`{0}` is not a supported source language")]
    UnsupportedSource(String),

    #[error("translation service returned no text")]
    EmptyTranslation,

    #[error("translation service failed: {0:#}")]
    Service(#[from] anyhow::Error),
}

/// Translate-a-reply flow: resolve the destination, clean the replied-to
/// text, detect its language, translate.
pub struct TranslationPipeline<'a> {
    registry: &'a LanguageRegistry,
    service: &'a dyn TranslationService,
    /// Messages by this author get their trailing "(A -> B)" annotations removed
    bot_id: i64,
}

impl<'a> TranslationPipeline<'a> {
    pub fn new(
        registry: &'a LanguageRegistry,
        service: &'a dyn TranslationService,
        bot_id: i64,
    ) -> Self {
        Self {
            registry,
            service,
            bot_id,
        }
    }

    pub async fn run(
        &self,
        referenced: Option<&ReferencedMessage>,
        requested_dest: &str,
    ) -> Result<TranslationContext, TranslateError> {
        let referenced = referenced.ok_or(TranslateError::NoReferencedMessage)?;

        let dest_code = self
            .registry
            .resolve_code(requested_dest)
            .ok_or_else(|| TranslateError::InvalidLanguage(requested_dest.to_string()))?;

        let source_text = self.extract_text(referenced);
        if source_text.is_empty() {
            return Err(TranslateError::EmptyMessage);
        }

        let detected = self.service.detect(&source_text).await?;
        let source_code = self.vet_detected(&detected)?;

        debug!(
            "Translating {} chars {} -> {}",
            source_text.chars().count(),
            source_code,
            dest_code
        );

        let result_text = self
            .service
            .translate(&source_text, source_code, dest_code)
            .await?;
        if result_text.trim().is_empty() {
            return Err(TranslateError::EmptyTranslation);
        }

        info!("Translated message {} -> {}", source_code, dest_code);

        Ok(TranslationContext {
            source_text,
            dest_code,
            source_code,
            result_text,
        })
    }

    /// Referenced text without emphasis markers, and without our own
    /// annotation when re-translating one of the bot's translations.
    fn extract_text(&self, referenced: &ReferencedMessage) -> String {
        let text = referenced.text.trim().replace('*', "");

        if referenced.author_id == Some(self.bot_id) {
            self.registry.strip_annotation(&text)
        } else {
            text
        }
    }

    /// Map a detected code onto a code the translator accepts.
    ///
    /// The detector reports Chinese as plain `zh`, the translator wants `zh-CN`.
    fn vet_detected(&self, detected: &str) -> Result<&'static str, TranslateError> {
        let detected = if detected == "zh" {
            SIMPLIFIED_CHINESE
        } else {
            detected
        };

        self.registry
            .canonical_code(detected)
            .ok_or_else(|| TranslateError::UnsupportedSource(detected.to_string()))
    }
}

/// `**<translation>** (<Source> -> <Dest>)` with title-cased language names.
pub fn format_translation(context: &TranslationContext, registry: &LanguageRegistry) -> String {
    let title = |code: &str| {
        registry
            .display_title_for(code)
            .unwrap_or_else(|| code.to_uppercase())
    };

    format!(
        "**{}** ({} -> {})",
        context.result_text,
        title(context.source_code),
        title(context.dest_code)
    )
}

//! Chat commands: parsing, the five handlers and the fault boundary that
//! turns their errors into replies.

use crate::calc::{self, EvalError};
use crate::delivery::{deliver, MessageSink, TextFormat};
use crate::error::CommandError;
use crate::languages::LanguageRegistry;
use crate::pagination::{build_pages, PaginationSession, SessionStore, PAGE_SIZE};
use crate::translate::{
    format_translation, ReferencedMessage, TranslateError, TranslationPipeline,
    TranslationService,
};
use anyhow::anyhow;
use tracing::{debug, error, info, warn};

/// Destination language when `t` is given none.
pub const DEFAULT_DESTINATION: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Destination as typed by the user, if any
    Translate(Option<String>),
    Languages,
    /// Expression with its words joined by single spaces
    Calculate(String),
    /// Text with its words joined by single spaces
    Echo(String),
}

impl Command {
    /// Parse `text` as a command under `prefix`.
    ///
    /// Returns `None` for anything that is not one of the five commands. A
    /// Telegram `@botname` suffix on the command word is ignored.
    pub fn parse(text: &str, prefix: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix(prefix)?;
        let mut words = rest.split_whitespace();

        let word = words.next()?;
        let name = word.split_once('@').map_or(word, |(name, _)| name);
        let args = words.collect::<Vec<_>>().join(" ");

        match name {
            "h" => Some(Command::Help),
            "t" => Some(Command::Translate((!args.is_empty()).then_some(args))),
            "l" => Some(Command::Languages),
            "c" => Some(Command::Calculate(args)),
            "e" => Some(Command::Echo(args)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Translate(_) => "translate",
            Command::Languages => "languages",
            Command::Calculate(_) => "calculate",
            Command::Echo(_) => "echo",
        }
    }

    /// Reply for a failure with no specific message.
    fn generic_error(&self, prefix: &str) -> String {
        match self {
            Command::Translate(_) => format!("Error: Unknown.{}", translate_usage(prefix)),
            Command::Calculate(_) => format!("Unknown Error:\nUsage: `{prefix}c <equation>`"),
            Command::Echo(_) => format!("Unknown Error\nUsage: `{prefix}e <string>`"),
            Command::Help | Command::Languages => "Error: Unknown.".to_string(),
        }
    }
}

fn translate_usage(prefix: &str) -> String {
    format!("\nUsage: Reply to a message with `{prefix}t <language>`.")
}

/// The command table shown by `h`.
pub fn help_text(prefix: &str) -> String {
    let rows = [
        ("Help", "h", "h", "Print this message"),
        (
            "Translate",
            "t <translate_to>",
            "",
            "Translate a message",
        ),
        ("Languages", "l", "l", "Prints a list of supported languages"),
        (
            "Calculate",
            "c <equation>",
            "c <equation>",
            "Calculate an arithmetic equation",
        ),
        ("Echo", "e <string>", "e <string>", "Echo a message"),
    ];

    let mut text = String::from(
        "```\nLIST OF COMMANDS:\n\
         ==========================================================================================================\n\
         | Name      | Command           | Usage                           | Description                          |\n\
         |========================================================================================================|\n",
    );
    for (name, command, usage, description) in rows {
        let usage = if usage.is_empty() {
            "Use while replying to a message".to_string()
        } else {
            format!("{prefix}{usage}")
        };
        text.push_str(&format!(
            "| {:<9} | {:<17} | {:<31} | {:<36} |\n",
            name,
            format!("{prefix}{command}"),
            usage,
            description
        ));
    }
    text.push_str("```");
    text
}

/// Everything a handler may touch for one invocation.
pub struct CommandContext<'a> {
    pub registry: &'a LanguageRegistry,
    pub translator: &'a dyn TranslationService,
    pub sessions: &'a SessionStore,
    pub bot_id: i64,
    pub prefix: &'a str,
    pub chat_id: i64,
    /// User who issued the command
    pub requester: i64,
    /// The message the command replied to, if any
    pub referenced: Option<ReferencedMessage>,
}

/// Run `command` and report any failure back to the chat.
///
/// Never returns an error: failures become replies, and a reply that
/// cannot be sent is logged.
pub async fn run(command: &Command, ctx: &CommandContext<'_>, sink: &dyn MessageSink) {
    let result = match command {
        Command::Help => help(ctx, sink).await,
        Command::Translate(language) => translate(ctx, sink, language.as_deref()).await,
        Command::Languages => languages(ctx, sink).await,
        Command::Calculate(expression) => calculate(ctx, sink, expression).await,
        Command::Echo(text) => echo(ctx, sink, text).await,
    };

    let Err(err) = result else {
        return;
    };

    match &err {
        CommandError::UserInput(message) => {
            debug!("{} rejected input: {}", command.name(), message)
        }
        CommandError::Domain => debug!("{} result undefined", command.name()),
        CommandError::Service(message) => warn!("{} service failure: {}", command.name(), message),
        CommandError::Unexpected(e) => error!("{} failed: {:#}", command.name(), e),
    }

    let reply = err.user_message(&command.generic_error(ctx.prefix));
    if let Err(e) = deliver(sink, &reply, TextFormat::Plain).await {
        error!("Failed to send {} error reply: {:#}", command.name(), e);
    }
}

async fn help(ctx: &CommandContext<'_>, sink: &dyn MessageSink) -> Result<(), CommandError> {
    deliver(sink, &help_text(ctx.prefix), TextFormat::Markdown).await?;
    Ok(())
}

async fn translate(
    ctx: &CommandContext<'_>,
    sink: &dyn MessageSink,
    language: Option<&str>,
) -> Result<(), CommandError> {
    let destination = language.unwrap_or(DEFAULT_DESTINATION);
    let usage = translate_usage(ctx.prefix);

    let pipeline = TranslationPipeline::new(ctx.registry, ctx.translator, ctx.bot_id);
    let context = pipeline
        .run(ctx.referenced.as_ref(), destination)
        .await
        .map_err(|e| match e {
            TranslateError::NoReferencedMessage | TranslateError::EmptyMessage => {
                CommandError::UserInput(format!("Error: No Message Found.{usage}"))
            }
            TranslateError::InvalidLanguage(input) => {
                CommandError::UserInput(format!("Error: `{input}` is not a valid language.{usage}"))
            }
            TranslateError::UnsupportedSource(code) => CommandError::UserInput(format!(
                "Error: `{code}` is not a supported source language.{usage}"
            )),
            TranslateError::EmptyTranslation => {
                CommandError::Service(format!("Error: Translation failed.{usage}"))
            }
            TranslateError::Service(e) => CommandError::Unexpected(e),
        })?;

    let reply = format_translation(&context, ctx.registry);
    deliver(sink, &reply, TextFormat::Plain).await?;
    Ok(())
}

async fn languages(ctx: &CommandContext<'_>, sink: &dyn MessageSink) -> Result<(), CommandError> {
    let pages = build_pages(ctx.registry.entries(), PAGE_SIZE);
    let Some(first) = pages.first() else {
        return Err(anyhow!("language table is empty").into());
    };

    if pages.len() == 1 {
        deliver(sink, first, TextFormat::Markdown).await?;
        return Ok(());
    }

    let message_id = sink
        .reply_with_navigation(first, TextFormat::Markdown)
        .await?;
    let page_count = pages.len();
    ctx.sessions
        .insert(
            (ctx.chat_id, message_id),
            PaginationSession::new(pages, ctx.requester),
        )
        .await;

    info!(
        "Listing {} ({} pages) opened for user {}",
        message_id, page_count, ctx.requester
    );
    Ok(())
}

async fn calculate(
    ctx: &CommandContext<'_>,
    sink: &dyn MessageSink,
    expression: &str,
) -> Result<(), CommandError> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(CommandError::UserInput(format!(
            "Error: No Equation Found.\nUsage: `{}c <equation>`",
            ctx.prefix
        )));
    }

    let value = calc::evaluate(expression).map_err(|e| match e {
        EvalError::Domain => CommandError::Domain,
        EvalError::UnknownFunction(name) => {
            CommandError::UserInput(format!("Unknown Function: \"{name}\""))
        }
        EvalError::Invalid(reason) => {
            CommandError::Unexpected(anyhow!("cannot evaluate {expression:?}: {reason}"))
        }
    })?;

    let reply = format!("Total: **{}**", calc::format_number(value));
    deliver(sink, &reply, TextFormat::Plain).await?;
    Ok(())
}

async fn echo(
    ctx: &CommandContext<'_>,
    sink: &dyn MessageSink,
    text: &str,
) -> Result<(), CommandError> {
    if text.trim().is_empty() {
        return Err(CommandError::UserInput(format!(
            "Error: Invalid String\nUsage: `{}e <string>`",
            ctx.prefix
        )));
    }

    deliver(sink, text, TextFormat::Plain).await?;
    Ok(())
}

//! Outgoing message delivery under the platform's message-size limit.

use anyhow::Result;
use async_trait::async_trait;

/// Maximum characters in a single outgoing chat message.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// How the platform should render outgoing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Shown verbatim
    Plain,
    /// Markdown, used for code-block tables
    Markdown,
}

/// Where a command's output goes: a reply to the triggering message, then
/// plain follow-up messages in the same conversation.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send `text` as a reply to the triggering message.
    async fn reply(&self, text: &str, format: TextFormat) -> Result<()>;

    /// Send `text` as an independent message after the reply.
    async fn follow_up(&self, text: &str, format: TextFormat) -> Result<()>;

    /// Send `text` as a reply carrying previous/next page buttons.
    /// Returns the id of the sent message.
    async fn reply_with_navigation(&self, text: &str, format: TextFormat) -> Result<i64>;
}

/// Split `content` into consecutive chunks of at most `limit` characters.
///
/// Splits on character boundaries, never inside a code point. Empty content
/// yields a single empty chunk.
pub fn split_chunks(content: &str, limit: usize) -> Vec<&str> {
    assert!(limit > 0, "chunk limit must be positive");

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (index, _) in content.char_indices() {
        if count == limit {
            chunks.push(&content[start..index]);
            start = index;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&content[start..]);

    chunks
}

/// Deliver `content` in order: the first chunk as a reply, the rest as
/// follow-ups. The first failed send aborts delivery and is returned.
pub async fn deliver(sink: &dyn MessageSink, content: &str, format: TextFormat) -> Result<()> {
    let mut chunks = split_chunks(content, MAX_MESSAGE_LENGTH).into_iter();

    if let Some(first) = chunks.next() {
        sink.reply(first, format).await?;
    }
    for chunk in chunks {
        sink.follow_up(chunk, format).await?;
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingSink, Sent};
    use super::*;
    use proptest::prelude::*;

    // ==================== split_chunks Tests ====================

    #[test]
    fn test_split_short_content_single_chunk() {
        assert_eq!(split_chunks("hello", 2000), vec!["hello"]);
    }

    #[test]
    fn test_split_empty_content_single_empty_chunk() {
        assert_eq!(split_chunks("", 2000), vec![""]);
    }

    #[test]
    fn test_split_exact_limit_single_chunk() {
        let content = "a".repeat(2000);
        assert_eq!(split_chunks(&content, 2000).len(), 1);
    }

    #[test]
    fn test_split_4500_chars() {
        let content = "x".repeat(4500);
        let lengths: Vec<usize> = split_chunks(&content, 2000)
            .iter()
            .map(|c| c.chars().count())
            .collect();
        assert_eq!(lengths, vec![2000, 2000, 500]);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let content = "é".repeat(3);
        assert_eq!(split_chunks(&content, 2), vec!["éé", "é"]);
    }

    // ==================== deliver Tests ====================

    #[tokio::test]
    async fn test_deliver_short_message_is_single_reply() {
        let sink = RecordingSink::default();
        deliver(&sink, "hi", TextFormat::Plain).await.unwrap();
        assert_eq!(sink.sent().await, vec![Sent::Reply("hi".to_string())]);
    }

    #[tokio::test]
    async fn test_deliver_long_message_reply_then_follow_ups() {
        let content = format!("{}{}{}", "a".repeat(2000), "b".repeat(2000), "c".repeat(500));
        let sink = RecordingSink::default();

        deliver(&sink, &content, TextFormat::Plain).await.unwrap();

        assert_eq!(
            sink.sent().await,
            vec![
                Sent::Reply("a".repeat(2000)),
                Sent::FollowUp("b".repeat(2000)),
                Sent::FollowUp("c".repeat(500)),
            ]
        );
    }

    #[tokio::test]
    async fn test_deliver_empty_content_still_sent() {
        let sink = RecordingSink::default();
        deliver(&sink, "", TextFormat::Plain).await.unwrap();
        assert_eq!(sink.sent().await, vec![Sent::Reply(String::new())]);
    }

    #[tokio::test]
    async fn test_deliver_keeps_format_on_every_chunk() {
        let content = "m".repeat(2500);
        let sink = RecordingSink::default();

        deliver(&sink, &content, TextFormat::Markdown).await.unwrap();

        assert_eq!(
            sink.formats().await,
            vec![TextFormat::Markdown, TextFormat::Markdown]
        );
    }

    #[tokio::test]
    async fn test_deliver_stops_at_first_failure() {
        let content = "z".repeat(6000);
        let sink = RecordingSink {
            fail_at: Some(1),
            ..Default::default()
        };

        let result = deliver(&sink, &content, TextFormat::Plain).await;

        assert!(result.is_err());
        assert_eq!(sink.sent().await, vec![Sent::Reply("z".repeat(2000))]);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_chunks_reassemble_and_respect_limit(content in ".{0,300}", limit in 1usize..50) {
            let chunks = split_chunks(&content, limit);
            prop_assert_eq!(chunks.concat(), content.clone());
            prop_assert!(chunks.iter().all(|c| c.chars().count() <= limit));
            prop_assert_eq!(chunks.len(), content.chars().count().div_ceil(limit).max(1));
        }
    }
}

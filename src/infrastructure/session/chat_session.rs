//! In-process chat session state

use tokio::sync::RwLock;

use crate::domain::{stream_messages, ChatMessage, StreamMessages, StreamOptions};

/// A chat session shared by every consumer that acquired it
#[derive(Debug)]
pub struct ChatSession {
    session_id: String,
    messages: RwLock<Vec<ChatMessage>>,
}

impl ChatSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_messages(session_id, Vec::new())
    }

    pub fn with_messages(session_id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: RwLock::new(messages),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn append(&self, message: ChatMessage) {
        self.messages.write().await.push(message);
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    /// Progressive replay of the transcript as it stands now
    pub async fn playback(&self, options: StreamOptions) -> StreamMessages {
        stream_messages(self.messages().await, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_and_read_messages() {
        let session = ChatSession::new("s1");
        assert!(session.is_empty().await);

        session.append(ChatMessage::user("hi")).await;
        session.append(ChatMessage::assistant("hello")).await;

        assert_eq!(session.session_id(), "s1");
        assert_eq!(session.len().await, 2);
        assert_eq!(session.messages().await[1].content, "hello");
    }

    #[tokio::test]
    async fn test_playback_replays_current_transcript() {
        let session = ChatSession::with_messages("s1", vec![ChatMessage::assistant("ok")]);
        let last = session
            .playback(StreamOptions::default())
            .await
            .last()
            .unwrap();

        assert_eq!(last[0].content, "ok");
    }
}

//! Registry sharing chat sessions between concurrent consumers

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::ChatSession;
use crate::domain::{DomainError, RefCountRegistry, RefCountRegistryConfig};

#[derive(Debug)]
struct SessionsState {
    sessions: RefCountRegistry<String, Arc<ChatSession>>,
    active_id: Option<String>,
}

/// Shared, ref-counted chat sessions plus the currently active session id
///
/// Every `acquire` must be paired with one `release`. A released session stays
/// cached for a quick re-acquire until capacity pressure evicts it.
#[derive(Debug)]
pub struct ChatSessionRegistry {
    state: RwLock<SessionsState>,
}

impl Default for ChatSessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSessionRegistry {
    /// Create a registry that never evicts idle sessions
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionsState {
                sessions: RefCountRegistry::new(),
                active_id: None,
            }),
        }
    }

    pub fn with_config(config: RefCountRegistryConfig) -> Result<Self, DomainError> {
        Ok(Self {
            state: RwLock::new(SessionsState {
                sessions: RefCountRegistry::with_config(config)?,
                active_id: None,
            }),
        })
    }

    /// Get the shared session, building it with `factory` on first use
    pub async fn acquire<F>(&self, session_id: &str, factory: F) -> Arc<ChatSession>
    where
        F: FnOnce() -> ChatSession,
    {
        self.state
            .write()
            .await
            .sessions
            .acquire(session_id.to_string(), || Arc::new(factory()))
    }

    /// Acquire a session and mark it as the active one
    pub async fn open<F>(&self, session_id: &str, factory: F) -> Arc<ChatSession>
    where
        F: FnOnce() -> ChatSession,
    {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .acquire(session_id.to_string(), || Arc::new(factory()));
        state.active_id = Some(session_id.to_string());

        session
    }

    /// Drop one reference; clears the active id when the session goes idle
    pub async fn release(&self, session_id: &str) {
        let mut state = self.state.write().await;
        let SessionsState {
            sessions,
            active_id,
        } = &mut *state;

        sessions.release_with(session_id, |_| {
            if active_id.as_deref() == Some(session_id) {
                *active_id = None;
                info!(session_id, "Active session released by its last consumer");
            }
        });
    }

    pub async fn set_active(&self, session_id: Option<String>) {
        self.state.write().await.active_id = session_id;
    }

    pub async fn active_id(&self) -> Option<String> {
        self.state.read().await.active_id.clone()
    }

    pub async fn get(&self, session_id: &str) -> Option<Arc<ChatSession>> {
        self.state.read().await.sessions.get(session_id).cloned()
    }

    pub async fn get_required(&self, session_id: &str) -> Result<Arc<ChatSession>, DomainError> {
        self.get(session_id)
            .await
            .ok_or_else(|| DomainError::not_found(format!("Session '{}' not found", session_id)))
    }

    pub async fn ref_count(&self, session_id: &str) -> Option<usize> {
        self.state.read().await.sessions.ref_count(session_id)
    }

    /// Session ids from least to most recently touched
    pub async fn list(&self) -> Vec<String> {
        self.state.read().await.sessions.list().cloned().collect()
    }
}

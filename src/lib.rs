//! chat-lifecycle
//!
//! Resource lifetime management for chat sessions:
//! - A capacity-bounded LRU cache with eviction callbacks
//! - A reference-counted registry sharing live objects across consumers
//! - A progressive reconstructor replaying finished transcripts snapshot by snapshot

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    merge_content, merge_stream_objects, stream_messages, ChatMessage, DomainError, LruCache,
    MessageRole, RefCountRegistry, RefCountRegistryConfig, Snapshot, StreamMessages,
    StreamObject, StreamOptions,
};
pub use infrastructure::{
    spawn_playback, ChatSession, ChatSessionRegistry, LanguageCache, LanguageLoader,
    PlaybackConfig, PlaybackEvent,
};

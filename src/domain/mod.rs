//! Domain layer - Core lifecycle primitives and chat models

pub mod cache;
pub mod chat;
pub mod error;
pub mod ref_count;
pub mod stream;

pub use cache::{EvictionListener, LruCache};
pub use chat::{merge_content, merge_stream_objects, ChatMessage, MessageRole, StreamObject};
pub use error::DomainError;
pub use ref_count::{RefCountRegistry, RefCountRegistryConfig, RefEntry};
pub use stream::{stream_messages, Snapshot, StreamMessages, StreamOptions};

//! Chat transcript models shared with the copilot backend

mod merge;
mod message;

pub use merge::{merge_content, merge_stream_objects};
pub use message::{ChatMessage, MessageRole, StreamObject};

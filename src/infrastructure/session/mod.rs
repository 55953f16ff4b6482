//! Chat session management

mod chat_session;
mod registry;

pub use chat_session::ChatSession;
pub use registry::ChatSessionRegistry;

//! Infrastructure layer - Runtime services built on the domain primitives

pub mod highlight;
pub mod logging;
pub mod playback;
pub mod session;

pub use highlight::{LanguageCache, LanguageLoad, LanguageLoader};
pub use playback::{spawn_playback, PlaybackConfig, PlaybackEvent, PlaybackStream};
pub use session::{ChatSession, ChatSessionRegistry};

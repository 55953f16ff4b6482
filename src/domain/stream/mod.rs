//! Stream domain - progressive transcript reconstruction

mod reconstructor;

pub use reconstructor::{stream_messages, Snapshot, StreamMessages, StreamOptions};

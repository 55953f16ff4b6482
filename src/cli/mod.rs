//! CLI module for chat-lifecycle
//!
//! Provides subcommands working on recorded chat transcripts:
//! - `replay`: progressively plays a transcript back as JSON lines
//! - `inspect`: prints each message with its stream objects merged

pub mod inspect;
pub mod replay;

use std::io::ErrorKind;
use std::path::Path;

use clap::{Parser, Subcommand};

use crate::domain::{ChatMessage, DomainError};

/// chat-lifecycle - cache and shared-resource lifecycle tooling for chat transcripts
#[derive(Parser)]
#[command(name = "chat-lifecycle")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replay a finished transcript the way it was streamed
    Replay(replay::ReplayArgs),

    /// Print merged stream objects and content of each message
    Inspect(inspect::InspectArgs),
}

/// Read a JSON array of chat messages from `path`
pub async fn read_transcript(path: &Path) -> Result<Vec<ChatMessage>, DomainError> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        let message = format!("Cannot read transcript '{}': {}", path.display(), e);
        match e.kind() {
            ErrorKind::NotFound => DomainError::not_found(message),
            _ => DomainError::internal(message),
        }
    })?;

    Ok(serde_json::from_str(&raw)?)
}

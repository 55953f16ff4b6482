//! Replay command - plays a transcript back frame by frame

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use futures::StreamExt;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::{spawn_playback, ChatSession, ChatSessionRegistry, PlaybackEvent};

/// Arguments for the replay command
#[derive(Args, Clone)]
pub struct ReplayArgs {
    /// Path to a JSON array of chat messages
    pub file: PathBuf,

    /// Characters revealed per frame (overrides config)
    #[arg(long)]
    pub char_chunk: Option<usize>,

    /// Delay between frames in milliseconds (overrides config)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Print the final transcript at once
    #[arg(long)]
    pub skip: bool,
}

/// Run the replay
pub async fn run(args: ReplayArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);
    config.validate()?;

    let session_id = args.file.display().to_string();
    let messages = super::read_transcript(&args.file).await?;
    let sessions = ChatSessionRegistry::with_config(config.registry_config())?;
    let session = sessions
        .open(&session_id, || ChatSession::with_messages(&session_id, messages))
        .await;

    let mut playback = config.playback_config();
    if let Some(char_chunk) = args.char_chunk {
        playback = playback.with_char_chunk(char_chunk);
    }
    if let Some(interval_ms) = args.interval_ms {
        playback = playback.with_frame_interval(Duration::from_millis(interval_ms));
    }
    if args.skip {
        playback = playback.with_skip(true);
    }

    let mut events = spawn_playback(session.messages().await, playback);

    while let Some(event) = events.next().await {
        match event {
            PlaybackEvent::Started => info!(session_id = %session_id, "Replay started"),
            PlaybackEvent::Frame(snapshot) => {
                if let Some(message) = snapshot.last() {
                    println!("{}", serde_json::to_string(message.as_ref())?);
                }
            }
            PlaybackEvent::Progress { current, total } => {
                info!(current, total, "Replay progress");
            }
            PlaybackEvent::Finished => info!(session_id = %session_id, "Replay finished"),
        }
    }

    sessions.release(&session_id).await;

    Ok(())
}

//! Timed playback of a finished transcript
//!
//! A background task pulls snapshots from the reconstructor at a fixed frame
//! interval and forwards them as events. Dropping the returned stream stops
//! the task at its next send.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use crate::domain::{merge_stream_objects, stream_messages, ChatMessage, Snapshot, StreamOptions};

/// Default delay between two frames
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(24);

/// Configuration for a playback run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Delay between frames; zero emits frames back to back
    pub frame_interval: Duration,
    /// Characters revealed per frame
    pub char_chunk: usize,
    /// Show the final transcript at once instead of revealing it
    pub skip: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            char_chunk: 1,
            skip: false,
        }
    }
}

impl PlaybackConfig {
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn with_char_chunk(mut self, char_chunk: usize) -> Self {
        self.char_chunk = char_chunk;
        self
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }
}

/// Events emitted while a transcript plays back
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    Started,
    Frame(Snapshot),
    /// Emitted whenever the number of visible messages changes
    Progress { current: usize, total: usize },
    Finished,
}

pub type PlaybackStream = ReceiverStream<PlaybackEvent>;

/// Spawn a playback task for `messages`
pub fn spawn_playback(messages: Vec<ChatMessage>, config: PlaybackConfig) -> PlaybackStream {
    let (tx, rx) = mpsc::channel::<PlaybackEvent>(32);

    tokio::spawn(async move {
        if run_playback(messages, config, tx).await.is_err() {
            debug!("Playback consumer went away, stopping");
        }
    });

    ReceiverStream::new(rx)
}

async fn run_playback(
    messages: Vec<ChatMessage>,
    config: PlaybackConfig,
    tx: mpsc::Sender<PlaybackEvent>,
) -> Result<(), mpsc::error::SendError<PlaybackEvent>> {
    let total = messages.len();

    if config.skip {
        let snapshot: Snapshot = messages.into_iter().map(merged).map(Arc::new).collect();

        tx.send(PlaybackEvent::Started).await?;
        tx.send(PlaybackEvent::Frame(snapshot)).await?;
        tx.send(PlaybackEvent::Progress {
            current: total,
            total,
        })
        .await?;
        tx.send(PlaybackEvent::Finished).await?;

        return Ok(());
    }

    let options = StreamOptions::default().with_char_chunk(config.char_chunk);
    let mut ticker = (!config.frame_interval.is_zero()).then(|| {
        let mut ticker = interval(config.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    let mut started = false;
    let mut visible = 0;

    info!(total, char_chunk = config.char_chunk, "Starting transcript playback");

    for snapshot in stream_messages(messages, options) {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }

        if !started {
            started = true;
            tx.send(PlaybackEvent::Started).await?;
        }

        let count = snapshot.len();
        tx.send(PlaybackEvent::Frame(snapshot)).await?;

        if count != visible {
            visible = count;
            tx.send(PlaybackEvent::Progress {
                current: visible,
                total,
            })
            .await?;
        }
    }

    tx.send(PlaybackEvent::Finished).await?;
    info!(total, "Transcript playback finished");

    Ok(())
}

/// A message with its stream objects in canonical form
fn merged(mut message: ChatMessage) -> ChatMessage {
    if let Some(objects) = message.stream_objects.take() {
        message.stream_objects = Some(merge_stream_objects(objects));
    }
    message
}

//! Progressive replay of a finished chat transcript

use std::iter::FusedIterator;
use std::sync::Arc;

use crate::domain::chat::{merge_stream_objects, ChatMessage, StreamObject};

/// One point-in-time view of the transcript
///
/// Each snapshot is a fresh vector. Messages untouched since the previous
/// snapshot are shared with it; the message being revealed is copied on write.
pub type Snapshot = Vec<Arc<ChatMessage>>;

/// Options controlling how fast text is revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Characters revealed per snapshot; values below 1 are treated as 1
    pub char_chunk: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self { char_chunk: 1 }
    }
}

impl StreamOptions {
    pub fn with_char_chunk(mut self, char_chunk: usize) -> Self {
        self.char_chunk = char_chunk;
        self
    }

    fn chunk(&self) -> usize {
        self.char_chunk.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NextMessage,
    Content { offset: usize },
    Objects { object: usize, offset: usize },
    Done,
}

/// Lazy iterator of snapshots emulating live delivery of `messages`
///
/// Messages are revealed in order. User messages appear whole. Other
/// messages first appear as an empty placeholder, then either their stream
/// objects are appended one by one (`text-delta` text a chunk at a time,
/// everything else atomically) or their plain content is revealed a chunk
/// at a time. Stream objects are merge-coalesced before every snapshot.
///
/// The iterator cannot be restarted; build a new one for another pass.
#[derive(Debug)]
pub struct StreamMessages {
    source: Vec<ChatMessage>,
    index: usize,
    phase: Phase,
    chunk: usize,
    timeline: Vec<Arc<ChatMessage>>,
}

/// Starts a progressive replay of `messages`
pub fn stream_messages(messages: Vec<ChatMessage>, options: StreamOptions) -> StreamMessages {
    StreamMessages::new(messages, options)
}

impl StreamMessages {
    pub fn new(messages: Vec<ChatMessage>, options: StreamOptions) -> Self {
        Self {
            timeline: Vec::with_capacity(messages.len()),
            source: messages,
            index: 0,
            phase: Phase::NextMessage,
            chunk: options.chunk(),
        }
    }

    /// Number of messages in the final transcript
    pub fn total_messages(&self) -> usize {
        self.source.len()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    fn snapshot(&self) -> Snapshot {
        self.timeline.clone()
    }

    fn finish_message(&mut self) {
        self.index += 1;
        self.phase = Phase::NextMessage;
    }

    fn trailing_mut(&mut self) -> Option<&mut ChatMessage> {
        self.timeline.last_mut().map(Arc::make_mut)
    }

    fn start_message(&mut self) -> Option<Snapshot> {
        let Some(message) = self.source.get(self.index) else {
            self.phase = Phase::Done;
            return None;
        };

        if message.is_user() {
            self.timeline.push(Arc::new(message.clone()));
            self.finish_message();
            return Some(self.snapshot());
        }

        let mut placeholder = message.clone();

        if message.has_stream_objects() {
            placeholder.stream_objects = Some(Vec::new());
            self.phase = Phase::Objects {
                object: 0,
                offset: 0,
            };
        } else {
            placeholder.content.clear();
            self.phase = Phase::Content { offset: 0 };
        }

        self.timeline.push(Arc::new(placeholder));
        Some(self.snapshot())
    }

    /// Reveals the next content slice, or `None` once the content is complete
    fn reveal_content(&mut self, offset: usize) -> Option<Snapshot> {
        let full = &self.source[self.index].content;
        let end = next_boundary(full, offset, self.chunk)?;
        let slice = full[offset..end].to_owned();

        self.phase = Phase::Content { offset: end };
        if let Some(message) = self.trailing_mut() {
            message.content.push_str(&slice);
        }

        Some(self.snapshot())
    }

    /// Emits the next step of the current object; `None` once all objects are out
    fn reveal_object(&mut self, object: usize, offset: usize) -> Option<Option<Snapshot>> {
        let current = self.source[self.index].stream_objects().get(object)?;

        match current {
            StreamObject::TextDelta { text_delta } => {
                let Some(end) = next_boundary(text_delta, offset, self.chunk) else {
                    self.phase = Phase::Objects {
                        object: object + 1,
                        offset: 0,
                    };
                    return Some(None);
                };
                let slice = text_delta[offset..end].to_owned();

                self.phase = Phase::Objects {
                    object,
                    offset: end,
                };
                self.append_text(slice, offset == 0);
            }
            other => {
                let other = other.clone();

                self.phase = Phase::Objects {
                    object: object + 1,
                    offset: 0,
                };
                self.append_object(other);
            }
        }

        Some(Some(self.snapshot()))
    }

    fn append_text(&mut self, slice: String, starts_object: bool) {
        let Some(message) = self.trailing_mut() else {
            return;
        };
        let objects = message.stream_objects.get_or_insert_with(Vec::new);

        if starts_object {
            objects.push(StreamObject::text_delta(slice));
            *objects = merge_stream_objects(std::mem::take(objects));
        } else if let Some(StreamObject::TextDelta { text_delta }) = objects.last_mut() {
            text_delta.push_str(&slice);
        }
    }

    fn append_object(&mut self, object: StreamObject) {
        let Some(message) = self.trailing_mut() else {
            return;
        };
        let objects = message.stream_objects.get_or_insert_with(Vec::new);

        objects.push(object);
        *objects = merge_stream_objects(std::mem::take(objects));
    }
}

impl Iterator for StreamMessages {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Snapshot> {
        loop {
            match self.phase {
                Phase::Done => return None,
                Phase::NextMessage => return self.start_message(),
                Phase::Content { offset } => match self.reveal_content(offset) {
                    Some(snapshot) => return Some(snapshot),
                    None => self.finish_message(),
                },
                Phase::Objects { object, offset } => match self.reveal_object(object, offset) {
                    Some(Some(snapshot)) => return Some(snapshot),
                    Some(None) => continue,
                    None => self.finish_message(),
                },
            }
        }
    }
}

impl FusedIterator for StreamMessages {}

/// Byte offset `chunk` characters past `offset`, or `None` when nothing is left
///
/// Slicing is per Unicode scalar value; grapheme clusters may be split.
fn next_boundary(text: &str, offset: usize, chunk: usize) -> Option<usize> {
    if offset >= text.len() {
        return None;
    }

    let end = text[offset..]
        .char_indices()
        .nth(chunk)
        .map_or(text.len(), |(index, _)| offset + index);

    Some(end)
}

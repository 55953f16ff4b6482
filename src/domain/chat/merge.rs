//! Coalescing of stream objects into their canonical form

use super::StreamObject;

/// Collapses stream objects that logically form one unit
///
/// - adjacent `text-delta` objects become one growing string
/// - adjacent `reasoning` objects likewise
/// - a `tool-result` replaces the earlier `tool-call` it answers
pub fn merge_stream_objects(objects: Vec<StreamObject>) -> Vec<StreamObject> {
    let mut merged: Vec<StreamObject> = Vec::with_capacity(objects.len());

    for object in objects {
        match object {
            StreamObject::TextDelta { text_delta } => match merged.last_mut() {
                Some(StreamObject::TextDelta { text_delta: prev }) => prev.push_str(&text_delta),
                _ => merged.push(StreamObject::TextDelta { text_delta }),
            },
            StreamObject::Reasoning { text_delta } => match merged.last_mut() {
                Some(StreamObject::Reasoning { text_delta: prev }) => prev.push_str(&text_delta),
                _ => merged.push(StreamObject::Reasoning { text_delta }),
            },
            result @ StreamObject::ToolResult { .. } => {
                match merged.iter().position(|prev| prev.is_call_answered_by(&result)) {
                    Some(index) => merged[index] = result,
                    None => merged.push(result),
                }
            }
            call @ StreamObject::ToolCall { .. } => merged.push(call),
        }
    }

    merged
}

/// Concatenated `text-delta` text of a message
pub fn merge_content(objects: &[StreamObject]) -> String {
    objects
        .iter()
        .filter_map(|object| match object {
            StreamObject::TextDelta { text_delta } => Some(text_delta.as_str()),
            _ => None,
        })
        .collect()
}

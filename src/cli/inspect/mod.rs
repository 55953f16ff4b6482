//! Inspect command - shows each message in its merged form

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::config::AppConfig;
use crate::domain::{merge_content, merge_stream_objects, ChatMessage};
use crate::infrastructure::logging;

/// Arguments for the inspect command
#[derive(Args, Clone)]
pub struct InspectArgs {
    /// Path to a JSON array of chat messages
    pub file: PathBuf,
}

/// Run the inspection
pub async fn run(args: InspectArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let messages = super::read_transcript(&args.file).await?;
    tracing::info!(count = messages.len(), "Inspecting transcript");

    for message in &messages {
        println!("{}", serde_json::to_string(&merged_view(message))?);
    }

    Ok(())
}

fn merged_view(message: &ChatMessage) -> serde_json::Value {
    let objects = merge_stream_objects(message.stream_objects().to_vec());
    let content = if objects.is_empty() {
        message.content.clone()
    } else {
        merge_content(&objects)
    };

    json!({
        "id": message.id,
        "role": message.role,
        "content": content,
        "streamObjects": objects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StreamObject;

    #[test]
    fn test_merged_view_joins_text_deltas() {
        let message = ChatMessage::assistant("").with_stream_objects(vec![
            StreamObject::text_delta("Hel"),
            StreamObject::text_delta("lo"),
        ]);
        let view = merged_view(&message);

        assert_eq!(view["content"], "Hello");
        assert_eq!(view["streamObjects"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_merged_view_plain_message() {
        let view = merged_view(&ChatMessage::user("hi"));

        assert_eq!(view["content"], "hi");
        assert_eq!(view["role"], "user");
    }
}

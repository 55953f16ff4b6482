use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A discrete unit of incrementally-delivered model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StreamObject {
    TextDelta {
        #[serde(rename = "textDelta")]
        text_delta: String,
    },
    Reasoning {
        #[serde(rename = "textDelta")]
        text_delta: String,
    },
    ToolCall {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: String,
        #[serde(default)]
        args: Value,
    },
    ToolResult {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolName")]
        tool_name: String,
        #[serde(default)]
        args: Value,
        #[serde(default)]
        result: Value,
    },
}

impl StreamObject {
    pub fn text_delta(text: impl Into<String>) -> Self {
        Self::TextDelta {
            text_delta: text.into(),
        }
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::Reasoning {
            text_delta: text.into(),
        }
    }

    pub fn tool_call(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        args: Value,
    ) -> Self {
        Self::ToolCall {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
        }
    }

    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        args: Value,
        result: Value,
    ) -> Self {
        Self::ToolResult {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
            result,
        }
    }

    /// Wire tag of this object
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TextDelta { .. } => "text-delta",
            Self::Reasoning { .. } => "reasoning",
            Self::ToolCall { .. } => "tool-call",
            Self::ToolResult { .. } => "tool-result",
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::TextDelta { text_delta } | Self::Reasoning { text_delta } => Some(text_delta),
            Self::ToolCall { .. } | Self::ToolResult { .. } => None,
        }
    }

    /// True when `self` is the tool call that `result` answers
    pub fn is_call_answered_by(&self, result: &StreamObject) -> bool {
        match (self, result) {
            (
                Self::ToolCall {
                    tool_call_id,
                    tool_name,
                    ..
                },
                Self::ToolResult {
                    tool_call_id: result_call_id,
                    tool_name: result_tool_name,
                    ..
                },
            ) => tool_call_id == result_call_id && tool_name == result_tool_name,
            _ => false,
        }
    }
}

/// A chat message as produced by the copilot backend
///
/// Fields this crate does not interpret are kept in `extra` and round-trip
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub role: MessageRole,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_objects: Option<Vec<StreamObject>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            created_at: None,
            stream_objects: None,
            extra: Map::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_stream_objects(mut self, objects: Vec<StreamObject>) -> Self {
        self.stream_objects = Some(objects);
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn stream_objects(&self) -> &[StreamObject] {
        self.stream_objects.as_deref().unwrap_or_default()
    }

    pub fn has_stream_objects(&self) -> bool {
        !self.stream_objects().is_empty()
    }
}

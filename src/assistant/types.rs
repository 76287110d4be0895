//! Wire types for the assistant service (threads, messages, runs)

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reply used when the latest assistant turn carries no usable text
pub const NO_CONTENT_FALLBACK: &str = "No response.";

/// Reply used when the transcript holds no assistant turn at all
pub const NO_REPLY_FALLBACK: &str = "No response received.";

/// A server-side conversation
#[derive(Debug, Clone, Deserialize)]
pub struct Thread {
    pub id: String,
}

/// Body for appending a turn to a thread
#[derive(Debug, Serialize)]
pub struct NewMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// Body for starting a run
#[derive(Debug, Serialize)]
pub struct NewRun<'a> {
    pub assistant_id: &'a str,
}

/// An assistant-generation job attached to a thread
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: String,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

/// Failure details the service attaches to a failed run
#[derive(Debug, Clone, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Run lifecycle status as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Succeeded,
    Incomplete,
    Expired,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Coarse classification of a run status for polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Pending,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn phase(self) -> RunPhase {
        match self {
            RunStatus::Completed | RunStatus::Succeeded => RunPhase::Succeeded,
            RunStatus::Failed | RunStatus::Expired | RunStatus::Cancelled | RunStatus::Incomplete => {
                RunPhase::Failed
            }
            RunStatus::Queued
            | RunStatus::InProgress
            | RunStatus::RequiresAction
            | RunStatus::Cancelling
            | RunStatus::Unknown => RunPhase::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Succeeded => "succeeded",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turn role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[default]
    #[serde(other)]
    Other,
}

/// One turn in a thread
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub content: Option<MessageBody>,
}

/// Message content as the service may return it.
///
/// Decoding never fails: shapes that are not understood end up as
/// [`MessageBody::Other`] or [`ContentPart::Unsupported`] and carry no text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Blocks(#[serde(deserialize_with = "lenient_parts")] Vec<ContentPart>),
    Plain(String),
    Other(Value),
}

/// One block of structured message content
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        #[serde(default)]
        text: Option<TextField>,
    },
    /// Images, files, refusals, malformed blocks and anything newer
    #[serde(other)]
    Unsupported,
}

/// The `text` field of a text block
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Annotated { value: String },
    Plain(String),
    Other(Value),
}

/// Decode each block on its own so one bad block cannot sink the rest
fn lenient_parts<'de, D>(deserializer: D) -> Result<Vec<ContentPart>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|block| ContentPart::deserialize(block).unwrap_or(ContentPart::Unsupported))
        .collect())
}

impl TextField {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TextField::Annotated { value } | TextField::Plain(value) => Some(value),
            TextField::Other(_) => None,
        }
    }
}

impl MessageBody {
    /// Text carried by this body, `None` if there is nothing to show
    pub fn text(&self) -> Option<String> {
        match self {
            MessageBody::Blocks(parts) => {
                let texts: Vec<&str> = parts
                    .iter()
                    .filter_map(|part| match part {
                        ContentPart::Text { text: Some(text) } => text.as_str(),
                        ContentPart::Text { text: None } | ContentPart::Unsupported => None,
                    })
                    .filter(|text| !text.is_empty())
                    .collect();
                if texts.is_empty() {
                    None
                } else {
                    Some(texts.join("\n"))
                }
            }
            MessageBody::Plain(text) if !text.is_empty() => Some(text.clone()),
            MessageBody::Plain(_) | MessageBody::Other(_) => None,
        }
    }
}

impl ThreadMessage {
    /// Text of this turn, falling back to [`NO_CONTENT_FALLBACK`]
    pub fn reply_text(&self) -> String {
        self.content
            .as_ref()
            .and_then(MessageBody::text)
            .unwrap_or_else(|| NO_CONTENT_FALLBACK.to_string())
    }
}

/// Paged message listing
#[derive(Debug, Clone, Deserialize)]
pub struct MessageList {
    pub data: Vec<ThreadMessage>,
}

/// Pick the most recently created assistant turn.
///
/// Ties on `created_at` go to the earlier entry in `messages`, which is the
/// newer one when the listing is in descending order.
pub fn latest_assistant_message(messages: &[ThreadMessage]) -> Option<&ThreadMessage> {
    messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .reduce(|best, m| if m.created_at > best.created_at { m } else { best })
}

/// Reply text for the caller, with both fallbacks applied
pub fn latest_assistant_reply(messages: &[ThreadMessage]) -> String {
    latest_assistant_message(messages)
        .map_or_else(|| NO_REPLY_FALLBACK.to_string(), ThreadMessage::reply_text)
}

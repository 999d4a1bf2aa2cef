//! # Prompt
//!
//! Chat message types and the templates that make up the agent's system prompt.
//!
//! ## Layout of the system prompt
//!
//! - **Prefix**: [`PERSONALITY_PROMPT`] with the persona text substituted for `{personality}`
//! - **Format instructions**: [`FORMAT_INSTRUCTIONS`] with the available tool names substituted for `{tool_names}`
//! - **Suffix**: [`SUFFIX`]
//!
//! ## External interactions
//!
//! - **AI models**: output is sent as the first `system` message of an OpenAI chat request.

use serde::{Deserialize, Serialize};

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// Human message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "System",
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }

    /// Inverse of [`MessageRole::as_str`]; `None` for unknown labels.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "System" => Some(MessageRole::System),
            "User" => Some(MessageRole::User),
            "Assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Persona prefix. `{personality}` is replaced by the persona's rendered profile.
pub const PERSONALITY_PROMPT: &str = "You are {personality}

You are talking to a human over Telegram. Stay in character at all times: never say you are \
an AI, a language model or an assistant. Keep messages short and casual, the way people text \
each other. Remember what the human told you earlier in the conversation and refer back to it.";

/// Tool usage guidance. `{tool_names}` is replaced by a comma-separated list of tool names.
pub const FORMAT_INSTRUCTIONS: &str = "TOOLS:
------

You can call these tools when they help: {tool_names}.

Only call a tool when the human asks for something the tool provides (fresh facts from the web, \
a picture of you, an image). When a tool returns an image URL, do not paste the URL into your \
reply; the image is delivered to the human separately. Describe it in one short sentence instead.
If a tool fails, do not mention the error details; answer as well as you can without it.";

/// Closing instructions appended after the format instructions.
pub const SUFFIX: &str = "Begin! Reply only with the message you want to send to the human, \
in plain text without Markdown.";

/// Placeholder substituted by [`format_personality_prompt`].
pub const PERSONALITY_PLACEHOLDER: &str = "{personality}";

/// Placeholder substituted by [`format_instructions`].
pub const TOOL_NAMES_PLACEHOLDER: &str = "{tool_names}";

/// Fills [`PERSONALITY_PROMPT`] with the given persona text.
pub fn format_personality_prompt(personality: &str) -> String {
    PERSONALITY_PROMPT.replace(PERSONALITY_PLACEHOLDER, personality.trim())
}

/// Fills [`FORMAT_INSTRUCTIONS`] with the given tool names. With no tools the section is omitted.
pub fn format_instructions<I, S>(tool_names: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = tool_names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(FORMAT_INSTRUCTIONS.replace(TOOL_NAMES_PLACEHOLDER, &names.join(", ")))
}

/// Builds the full system prompt: prefix, optional format instructions, suffix, separated by blank lines.
///
/// # Arguments
///
/// * `prefix` - Persona prefix, usually from [`format_personality_prompt`]
/// * `tool_names` - Names of the tools the agent may call, in registry order
pub fn build_system_prompt<I, S>(prefix: &str, tool_names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from(prefix.trim_end());
    if let Some(instructions) = format_instructions(tool_names) {
        out.push_str("\n\n");
        out.push_str(&instructions);
    }
    out.push_str("\n\n");
    out.push_str(SUFFIX);
    out
}

//! Chat-completion request and response types.

use serde::{Deserialize, Serialize};

use crate::tool::{ToolCall, ToolDefinition};

// =============================================================================
// Messages
// =============================================================================

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// =============================================================================
// Function Calling
// =============================================================================

/// How the model may use the supplied tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolChoice {
    /// `"auto"`, `"none"` or `"required"`
    Mode(String),

    /// Force a call to one named function.
    Function {
        #[serde(rename = "type")]
        kind: String,
        function: FunctionName,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionName {
    pub name: String,
}

impl ToolChoice {
    pub fn auto() -> Self {
        ToolChoice::Mode("auto".to_string())
    }

    /// Require the model to call `name` and nothing else.
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function {
            kind: "function".to_string(),
            function: FunctionName { name: name.into() },
        }
    }
}

/// Function calling request.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionRequest {
    /// Model identifier as the gateway names it (e.g. "google/gemini-2.5-flash")
    pub model: String,

    pub messages: Vec<Message>,

    /// Tool definitions in wire format
    pub tools: Vec<serde_json::Value>,

    pub tool_choice: ToolChoice,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl FunctionRequest {
    /// Create a request with auto tool choice and no tools.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            tools: Vec::new(),
            tool_choice: ToolChoice::auto(),
            temperature: None,
        }
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn tool(mut self, definition: &ToolDefinition) -> Self {
        self.tools.push(definition.to_wire_format());
        self
    }

    /// Add `definition` and force the model to call it.
    pub fn force_tool(mut self, definition: &ToolDefinition) -> Self {
        self.tool_choice = ToolChoice::function(&definition.name);
        self.tool(definition)
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Function calling response.
#[derive(Debug, Clone)]
pub struct FunctionResponse {
    /// Plain assistant text, when the model answered in prose
    pub content: Option<String>,

    pub tool_calls: Vec<ToolCall>,

    pub usage: Option<Usage>,
}

impl FunctionResponse {
    /// First call to the tool named `name`, if the model made one.
    pub fn tool_call(&self, name: &str) -> Option<&ToolCall> {
        self.tool_calls.iter().find(|call| call.name == name)
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

// Raw response shapes (internal parsing only)

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionRaw {
    pub choices: Vec<ChoiceRaw>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceRaw {
    pub message: AssistantMessageRaw,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssistantMessageRaw {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCallRaw>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToolCallRaw {
    #[serde(default)]
    pub id: String,
    pub function: FunctionCallRaw,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FunctionCallRaw {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl From<CompletionRaw> for FunctionResponse {
    fn from(raw: CompletionRaw) -> Self {
        let message = raw.choices.into_iter().next().map(|choice| choice.message);

        let (content, tool_calls) = match message {
            Some(message) => (
                message.content,
                message
                    .tool_calls
                    .unwrap_or_default()
                    .into_iter()
                    .map(|call| ToolCall {
                        id: call.id,
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        FunctionResponse {
            content,
            tool_calls,
            usage: raw.usage,
        }
    }
}

// =============================================================================
// Utilities
// =============================================================================

/// Truncate a string to at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

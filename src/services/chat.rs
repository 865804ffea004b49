//! Chat companion flows: the tool-calling reply loop and the greeting.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::db::{ChatStore, MoodStore};
use crate::models::chat::ConversationMessage;
use crate::models::trend::TimeRange;
use crate::services::llm::{
    ClaudeClient, Content, ContentBlock, LlmError, Message, MessagesRequest, ToolDefinition,
};
use crate::services::trends::analyze_mood_trends;

pub const MOOD_TOOL_NAME: &str = "getUserMoodAnalysis";
pub const MAX_TOOL_ROUNDS: usize = 4;
const GREETING_HISTORY: u32 = 3;

/// Who the companion is talking to.
#[derive(Debug, Clone, Copy)]
pub struct Speaker<'a> {
    pub user_id: &'a str,
    pub user_name: Option<&'a str>,
}

pub fn mood_tool() -> ToolDefinition {
    ToolDefinition {
        name: MOOD_TOOL_NAME,
        description: "Fetches and analyzes the current user's mood trends for a period \
            ('last7days' or 'last30days'). Use this to discuss mood patterns, averages, or how \
            the user has been feeling when they ask about it or it seems relevant. If the result \
            has is_empty: true, no mood data was found for that period.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "timeRange": {
                    "type": "string",
                    "enum": ["last7days", "last30days"],
                    "description": "The trailing window to analyze."
                }
            },
            "required": ["timeRange"]
        }),
    }
}

pub fn system_prompt(speaker: Speaker<'_>, history: &[ConversationMessage]) -> String {
    let mut prompt = String::from(
        "You are Mindful Chat, a supportive mental health AI assistant. Be kind, empathetic, \
         and understanding. Your responses should be helpful and considerate.\n\n",
    );

    match speaker.user_name {
        Some(name) => prompt.push_str(&format!("You are speaking with {name}.\n")),
        None => prompt.push_str("You are speaking with a returning user.\n"),
    }
    prompt.push_str(&format!(
        "If they ask about their mood trends or how they've been feeling, you can use the \
         '{MOOD_TOOL_NAME}' tool with a 'timeRange' of 'last7days' or 'last30days'. When you \
         get the analysis, discuss it with them. If it reports no data, tell them gently. Do not \
         use the tool unless they are asking about their mood data or trends.\n"
    ));

    if !history.is_empty() {
        prompt.push_str("\nConversation so far:\n");
        for turn in history {
            prompt.push_str(&format!("{}: {}\n", turn.role.as_str(), turn.content));
        }
    }

    prompt.push_str("\nRespond to the user's latest message.");
    prompt
}

async fn run_mood_tool(
    moods: &dyn MoodStore,
    user_id: &str,
    input: &serde_json::Value,
    today: NaiveDate,
) -> String {
    let failure = |reason: String| {
        json!({ "is_empty": true, "summary": format!("Error analyzing mood trends: {reason}") })
            .to_string()
    };

    let range = match input.get("timeRange") {
        None => return failure("timeRange is required".into()),
        Some(raw) => match TimeRange::deserialize(raw) {
            Ok(range) => range,
            Err(_) => {
                tracing::warn!(user_id = %user_id, time_range = %raw, "Mood analysis tool got an unknown range");
                return failure(format!("invalid timeRange {raw}"));
            }
        },
    };

    tracing::info!(user_id = %user_id, range = ?range, "Chat invoked mood analysis tool");

    match analyze_mood_trends(moods, user_id, range, today).await {
        Ok(analysis) => {
            serde_json::to_string(&analysis).unwrap_or_else(|e| failure(e.to_string()))
        }
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Mood analysis tool failed");
            failure(e.to_string())
        }
    }
}

/// Produces the assistant's reply to `message`, letting the model call the
/// mood analysis tool (bound to the speaker's own id) as needed.
pub async fn respond(
    llm: &ClaudeClient,
    moods: &dyn MoodStore,
    speaker: Speaker<'_>,
    history: &[ConversationMessage],
    message: &str,
    today: NaiveDate,
) -> Result<String, LlmError> {
    let system = system_prompt(speaker, history);
    let mut messages = vec![Message {
        role: "user",
        content: Content::Text(message.to_string()),
    }];

    for round in 0..MAX_TOOL_ROUNDS {
        let request = MessagesRequest {
            model: llm.model().to_string(),
            max_tokens: 1024,
            system: Some(system.clone()),
            messages: messages.clone(),
            tools: vec![mood_tool()],
        };
        let response = llm.send(&request).await?;
        let calls = response.tool_calls();

        if calls.is_empty() {
            return response.text().ok_or(LlmError::EmptyResponse);
        }

        tracing::debug!(round, calls = calls.len(), "Model requested tools");
        messages.push(Message {
            role: "assistant",
            content: Content::Blocks(response.content.clone()),
        });

        let mut results = Vec::with_capacity(calls.len());
        for (id, name, input) in calls {
            let content = if name == MOOD_TOOL_NAME {
                run_mood_tool(moods, speaker.user_id, &input, today).await
            } else {
                json!({ "error": format!("Unknown tool '{name}'") }).to_string()
            };
            results.push(ContentBlock::ToolResult { tool_use_id: id, content });
        }
        messages.push(Message {
            role: "user",
            content: Content::Blocks(results),
        });
    }

    Err(LlmError::TooManyRounds(MAX_TOOL_ROUNDS))
}

pub fn fallback_greeting(user_name: Option<&str>) -> String {
    let name = user_name.map(|n| format!(", {n}")).unwrap_or_default();
    format!("Hello{name}! I'm here to listen. How can I help you today?")
}

fn greeting_prompt(user_name: Option<&str>, last_messages: &[ConversationMessage]) -> String {
    let name = user_name.unwrap_or("there");
    let mut prompt = format!(
        "You are a friendly and empathetic AI assistant for Mindful Chat. Your only task is to \
         generate a short, welcoming greeting (1-2 sentences). The user's name is {name}.\n"
    );
    if last_messages.is_empty() {
        prompt.push_str(
            "This is the user's first time chatting or there's no recent history. Generate a \
             simple, warm, and inviting greeting.\n",
        );
    } else {
        prompt.push_str("This is the end of your previous conversation with them:\n");
        for turn in last_messages {
            prompt.push_str(&format!("{}: {}\n", turn.role.as_str(), turn.content));
        }
        prompt.push_str(
            "Briefly acknowledge the main topic and ask if they'd like to continue discussing it \
             or talk about something new. Address them by name. Do not ask multiple follow-up \
             questions.\n",
        );
    }
    prompt.push_str("Output only the greeting.");
    prompt
}

/// Greeting for the chat screen. Never fails: history and model errors fall
/// back to a fixed greeting.
pub async fn greeting(
    llm: Option<&ClaudeClient>,
    chats: &dyn ChatStore,
    speaker: Speaker<'_>,
) -> String {
    let Some(llm) = llm else {
        return fallback_greeting(speaker.user_name);
    };

    let last_messages: Vec<ConversationMessage> =
        match chats.recent(speaker.user_id, GREETING_HISTORY).await {
            Ok(entries) => entries.iter().map(ConversationMessage::from).collect(),
            Err(e) => {
                tracing::warn!(user_id = %speaker.user_id, error = %e, "Could not load chat history for greeting");
                Vec::new()
            }
        };

    let request = MessagesRequest {
        model: llm.model().to_string(),
        max_tokens: 256,
        system: None,
        messages: vec![Message {
            role: "user",
            content: Content::Text(greeting_prompt(speaker.user_name, &last_messages)),
        }],
        tools: Vec::new(),
    };

    match llm.send(&request).await {
        Ok(response) => response
            .text()
            .unwrap_or_else(|| fallback_greeting(speaker.user_name)),
        Err(e) => {
            tracing::warn!(user_id = %speaker.user_id, error = %e, "Greeting generation failed");
            fallback_greeting(speaker.user_name)
        }
    }
}

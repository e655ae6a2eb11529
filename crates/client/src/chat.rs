//! Conversational course assistant over `/ask_question`.

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, SecondsFormat, Utc};
use coursefind_core::Clock;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::api::{ApiError, SearchClient};

/// Entries kept in the conversation history.
pub const HISTORY_LIMIT: usize = 20;

pub const GENERIC_CHAT_ERROR: &str = "Sorry, I encountered an error while processing your question. Please try again.";

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Remove HTML tags, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One history entry as sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

/// What to show for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Answer as returned, possibly containing markup; or an error message.
    pub text: String,
    pub relevant_courses: Vec<Value>,
    pub is_error: bool,
}

impl ChatReply {
    fn error(text: String) -> Self {
        Self { text, relevant_courses: Vec::new(), is_error: true }
    }

    /// Reply text without markup.
    pub fn plain_text(&self) -> String {
        strip_tags(&self.text)
    }
}

pub struct ChatSession {
    client: SearchClient,
    clock: Arc<dyn Clock>,
    history: VecDeque<ChatMessage>,
}

impl ChatSession {
    pub fn new(client: SearchClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock, history: VecDeque::with_capacity(HISTORY_LIMIT + 1) }
    }

    pub fn history(&self) -> impl Iterator<Item = &ChatMessage> {
        self.history.iter()
    }

    /// Ask a question. Blank questions are ignored.
    ///
    /// The request carries the history as it stood before this question.
    pub async fn ask(&mut self, question: &str) -> Option<ChatReply> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        let prior = match serde_json::to_value(&self.history) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("failed to encode chat history: {}", e);
                Value::Array(Vec::new())
            }
        };
        self.push(Role::User, question.to_string());

        let reply = match self.client.ask_question(question, prior).await {
            Ok(response) if response.is_success() => ChatReply {
                text: response.answer.unwrap_or_default(),
                relevant_courses: response.relevant_courses.unwrap_or_default(),
                is_error: false,
            },
            Ok(response) => ChatReply::error(format!(
                "Sorry, I encountered an error: {}",
                response.message.as_deref().unwrap_or("Unknown error")
            )),
            Err(e) => {
                tracing::warn!("ask_question failed: {}", e);
                ChatReply::error(transport_message(&e))
            }
        };

        self.push(Role::Assistant, strip_tags(&reply.text));
        Some(reply)
    }

    fn push(&mut self, role: Role, content: String) {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(self.clock.now_millis())
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        self.history.push_back(ChatMessage { role, content, timestamp });
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }
}

fn transport_message(err: &ApiError) -> String {
    match err {
        ApiError::HttpError { message: Some(message), .. } => format!("Error: {message}"),
        ApiError::HttpError { .. } => format!("Network error: {}", err.reason_phrase().unwrap_or("Unknown")),
        _ => GENERIC_CHAT_ERROR.to_string(),
    }
}

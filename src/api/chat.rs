//! Chat assistant proxy endpoint.
//!
//! Forwards visitor questions about a pet to the configured webhook and
//! returns the assistant reply. The webhook must answer with the documented
//! `{"reply": "..."}` schema; any other shape is an upstream error.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{effective_webhook_url, success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

/// A single prior message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

/// Request body for a chat message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub pet_name: String,
    /// Defaults to `"pet-{petName}"`.
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
}

/// Payload forwarded to the webhook.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    message: &'a str,
    pet_name: &'a str,
    chat_id: String,
    conversation_history: &'a [ChatTurn],
    timestamp: String,
}

/// The documented webhook response schema.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// POST /api/chat - Forward a message to the chat assistant webhook.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatReply> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message is required".to_string()));
    }
    if request.pet_name.trim().is_empty() {
        return Err(AppError::Validation("Pet name is required".to_string()));
    }

    let url = effective_webhook_url(&state).await?;
    let chat_id = request
        .chat_id
        .clone()
        .unwrap_or_else(|| format!("pet-{}", request.pet_name));

    let payload = WebhookPayload {
        message: &request.message,
        pet_name: &request.pet_name,
        chat_id,
        conversation_history: &request.conversation_history,
        timestamp: Utc::now().to_rfc3339(),
    };

    let response = state.http.post(&url).json(&payload).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Upstream(format!(
            "Webhook returned status {}",
            status
        )));
    }

    let reply: ChatReply = response.json().await.map_err(|e| {
        tracing::warn!("Unrecognized webhook response shape: {}", e);
        AppError::Upstream("Unrecognized webhook response shape".to_string())
    })?;

    success(reply)
}

//! Chat webhook configuration endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::AppState;

/// Settings key holding the chat webhook URL override.
pub const CHAT_WEBHOOK_URL_KEY: &str = "chat_webhook_url";

/// Chat webhook configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
}

/// The webhook URL in effect: the persisted override, or the configured default.
pub async fn effective_webhook_url(state: &AppState) -> Result<String, AppError> {
    Ok(state
        .repo
        .get_setting(CHAT_WEBHOOK_URL_KEY)
        .await?
        .unwrap_or_else(|| state.config.chat_webhook_url.clone()))
}

/// GET /api/admin/webhook - Read the effective chat webhook URL.
pub async fn get_webhook_config(State(state): State<AppState>) -> ApiResult<WebhookConfig> {
    let url = effective_webhook_url(&state).await?;
    success(WebhookConfig { url })
}

/// PUT /api/admin/webhook - Update the chat webhook URL.
pub async fn update_webhook_config(
    State(state): State<AppState>,
    Json(request): Json<WebhookConfig>,
) -> ApiResult<WebhookConfig> {
    let url = request.url.trim();

    let parsed = reqwest::Url::parse(url)
        .map_err(|_| AppError::Validation("A valid absolute URL is required".to_string()))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::Validation(
            "Webhook URL must use http or https".to_string(),
        ));
    }

    state.repo.set_setting(CHAT_WEBHOOK_URL_KEY, url).await?;
    tracing::info!("Chat webhook URL updated");

    success(WebhookConfig {
        url: url.to_string(),
    })
}

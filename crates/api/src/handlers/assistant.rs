//! Handler for `POST /weather-assistant`.

use axum::Json;
use serde::{Deserialize, Serialize};
use skycast_core::assistant::{respond, AssistantWeather};

use crate::error::AppResult;
use crate::extract::AppJson;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantRequest {
    pub message: Option<String>,
    pub weather_data: Option<AssistantWeather>,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub response: String,
}

/// POST /api/weather-assistant
///
/// Canned advice for a free-text question about the supplied conditions.
pub async fn ask(
    AppJson(input): AppJson<AssistantRequest>,
) -> AppResult<Json<AssistantResponse>> {
    let message = input.message.unwrap_or_default();
    let response = respond(&message, input.weather_data.as_ref());
    tracing::debug!(chars = message.len(), "Weather assistant answered");
    Ok(Json(AssistantResponse { response }))
}

//! Generation endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::generator::GenerateOptions;
use crate::message::MessageOverrides;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Named template parameters
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub send_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub skip_validation: bool,

    #[serde(default)]
    pub overrides: Option<MessageOverrides>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub handler: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HandlerListResponse {
    pub handlers: Vec<String>,
    pub total: usize,
}

/// POST /api/v1/handlers/{name}/generate - Generate mail for a registered handler
#[tracing::instrument(
    name = "http.generate",
    skip(state, request),
    fields(parameter_count = request.parameters.len())
)]
pub async fn generate_for_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>)> {
    let mut options = GenerateOptions::new();
    if let Some(send_date) = request.send_date {
        options = options.send_date(send_date);
    }
    if request.skip_validation {
        options = options.skip_validation();
    }
    if let Some(overrides) = request.overrides {
        options = options.overrides(overrides);
    }

    state
        .generator
        .generate_for_name(&name, request.parameters, options)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse {
            handler: name,
            timestamp: Utc::now(),
        }),
    ))
}

/// GET /api/v1/handlers - Registered handler names
pub async fn list_handlers(State(state): State<AppState>) -> Json<HandlerListResponse> {
    let handlers = state.generator.registry().names();
    let total = handlers.len();

    Json(HandlerListResponse { handlers, total })
}

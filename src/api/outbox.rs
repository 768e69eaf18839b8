//! Generated message inspection.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::message::EmailMessage;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct OutboxResponse {
    pub messages: Vec<EmailMessage>,
    pub total: usize,
}

/// GET /api/v1/outbox - Messages held by the in-memory queue
pub async fn list_outbox(State(state): State<AppState>) -> Json<OutboxResponse> {
    let messages = state.mail_queue.messages().await;
    let total = messages.len();

    Json(OutboxResponse { messages, total })
}

//! Template endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::server::AppState;
use crate::template::{CreateTemplateRequest, EmailTemplate, TemplateListResponse};

/// POST /api/v1/templates - Create a new template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(handler = %request.handler_name)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<EmailTemplate>)> {
    let created = state.template_store.insert(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/templates - List all templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<TemplateListResponse>> {
    let templates = state.template_store.list().await?;
    let total = templates.len();

    Ok(Json(TemplateListResponse { templates, total }))
}

/// GET /api/v1/templates/{id} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EmailTemplate>> {
    Ok(Json(state.template_store.get(id).await?))
}

/// DELETE /api/v1/templates/{id} - Delete a template
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.template_store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/handlers/{name}/templates - Enabled templates for a handler
#[tracing::instrument(name = "http.list_handler_templates", skip(state))]
pub async fn list_handler_templates(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<TemplateListResponse>> {
    let templates = state.generator.list_enabled_templates(&name).await?;
    let total = templates.len();

    Ok(Json(TemplateListResponse { templates, total }))
}

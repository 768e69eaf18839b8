use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::{
    create_template, delete_template, generate_for_handler, get_template, health,
    list_handler_templates, list_handlers, list_outbox, list_templates, prometheus_metrics,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Templates
                .route("/templates", post(create_template).get(list_templates))
                .route("/templates/{id}", get(get_template).delete(delete_template))
                // Handlers
                .route("/handlers", get(list_handlers))
                .route("/handlers/{name}/templates", get(list_handler_templates))
                .route("/handlers/{name}/generate", post(generate_for_handler))
                // Generated messages
                .route("/outbox", get(list_outbox)),
        )
}

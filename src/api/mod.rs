//! API layer - HTTP endpoint handlers organized by domain.

mod generate;
mod health;
mod metrics;
mod outbox;
mod routes;
mod template;

// Re-export all handlers for use in server/app.rs
pub use generate::{generate_for_handler, list_handlers, GenerateRequest, GenerateResponse};
pub use health::health;
pub use metrics::prometheus_metrics;
pub use outbox::{list_outbox, OutboxResponse};
pub use routes::api_routes;
pub use template::{
    create_template, delete_template, get_template, list_handler_templates, list_templates,
};

use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::delivery::{create_mail_queue, MemoryMailQueue, MemoryWriteScopes};
use crate::error::Result;
use crate::generator::EmailGenerator;
use crate::handler::HandlerRegistry;
use crate::template::{create_template_store, PlaceholderRenderer, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub template_store: Arc<dyn TemplateStore>,
    pub mail_queue: Arc<MemoryMailQueue>,
    pub write_scopes: MemoryWriteScopes,
    pub generator: Arc<EmailGenerator>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let registry = Arc::new(HandlerRegistry::from_config(&settings.handlers)?);
        tracing::info!(handlers = registry.len(), "Handler registry built");

        let template_store = create_template_store();
        let mail_queue = create_mail_queue(settings.delivery.queue_capacity);
        let write_scopes = MemoryWriteScopes::new();
        let renderer = Arc::new(PlaceholderRenderer::with_strict(
            settings.rendering.strict_placeholders,
        ));

        let generator = Arc::new(
            EmailGenerator::new(
                template_store.clone(),
                renderer,
                mail_queue.clone(),
                Arc::new(write_scopes.clone()),
            )
            .with_registry(registry),
        );

        Ok(Self {
            settings: Arc::new(settings),
            template_store,
            mail_queue,
            write_scopes,
            generator,
            started_at: Instant::now(),
        })
    }
}

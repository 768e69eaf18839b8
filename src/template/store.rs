//! Template storage abstraction and in-memory backend

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::types::{EmailTemplate, TemplateError, TemplateResult};

/// Predicate used to query the template store.
///
/// `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub handler_name: Option<String>,
    pub enabled: Option<bool>,
}

impl TemplateFilter {
    /// Enabled templates registered to one handler
    pub fn enabled_for(handler_name: impl Into<String>) -> Self {
        Self {
            handler_name: Some(handler_name.into()),
            enabled: Some(true),
        }
    }

    pub fn matches(&self, template: &EmailTemplate) -> bool {
        self.handler_name
            .as_deref()
            .map_or(true, |name| template.handler_name == name)
            && self.enabled.map_or(true, |enabled| template.enabled == enabled)
    }
}

/// Backend trait for template storage.
///
/// Implementations must be thread-safe (`Send + Sync`) and provide their own
/// isolation; callers perform no locking around these operations.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Return every template matching the filter, in no particular order.
    async fn query(&self, filter: &TemplateFilter) -> TemplateResult<Vec<EmailTemplate>>;

    /// Store a new template, assigning an id when it has none.
    async fn insert(&self, template: EmailTemplate) -> TemplateResult<EmailTemplate>;

    async fn get(&self, id: i64) -> TemplateResult<EmailTemplate>;

    async fn delete(&self, id: i64) -> TemplateResult<()>;

    async fn set_enabled(&self, id: i64, enabled: bool) -> TemplateResult<EmailTemplate>;

    async fn list(&self) -> TemplateResult<Vec<EmailTemplate>> {
        self.query(&TemplateFilter::default()).await
    }
}

/// Every enabled template registered to `handler_name`
pub async fn select_enabled(
    store: &dyn TemplateStore,
    handler_name: &str,
) -> TemplateResult<Vec<EmailTemplate>> {
    store.query(&TemplateFilter::enabled_for(handler_name)).await
}

/// In-memory template storage
pub struct MemoryTemplateStore {
    templates: DashMap<i64, EmailTemplate>,
    next_id: AtomicI64,
}

impl Default for MemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTemplateStore {
    /// Create a new template store
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn query(&self, filter: &TemplateFilter) -> TemplateResult<Vec<EmailTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert(&self, mut template: EmailTemplate) -> TemplateResult<EmailTemplate> {
        template.validate()?;

        if template.id < 0 || template.id == i64::MAX {
            return Err(TemplateError::InvalidTemplate(format!(
                "Template id {} is out of range",
                template.id
            )));
        }

        if template.id == 0 {
            template.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        } else {
            self.next_id
                .fetch_max(template.id.saturating_add(1), Ordering::Relaxed);
        }

        match self.templates.entry(template.id) {
            Entry::Occupied(_) => Err(TemplateError::AlreadyExists(template.id)),
            Entry::Vacant(slot) => {
                tracing::debug!(
                    template_id = template.id,
                    handler = %template.handler_name,
                    "Template stored"
                );
                slot.insert(template.clone());
                Ok(template)
            }
        }
    }

    async fn get(&self, id: i64) -> TemplateResult<EmailTemplate> {
        self.templates
            .get(&id)
            .map(|t| t.clone())
            .ok_or(TemplateError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> TemplateResult<()> {
        self.templates
            .remove(&id)
            .map(|_| ())
            .ok_or(TemplateError::NotFound(id))
    }

    async fn set_enabled(&self, id: i64, enabled: bool) -> TemplateResult<EmailTemplate> {
        let mut entry = self
            .templates
            .get_mut(&id)
            .ok_or(TemplateError::NotFound(id))?;

        entry.enabled = enabled;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}

/// Create an Arc-wrapped in-memory template store
pub fn create_template_store() -> Arc<dyn TemplateStore> {
    Arc::new(MemoryTemplateStore::new())
}

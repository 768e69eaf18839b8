//! Email template system.
//!
//! This module provides:
//! - The stored [`EmailTemplate`] entity and its renderable [`TemplateField`]s
//! - A storage abstraction with an in-memory backend and the enabled-template selector
//! - The field renderer collaborator with a `{{placeholder}}` implementation
//!
//! # Example
//!
//! ```ignore
//! let store = MemoryTemplateStore::new();
//!
//! store
//!     .insert(
//!         EmailTemplate::new("Welcome mail", "Welcome")
//!             .with_field(TemplateField::Subject, "Hi {{name}}"),
//!     )
//!     .await?;
//!
//! let templates = select_enabled(&store, "Welcome").await?;
//! ```

mod render;
mod store;
mod types;

pub use render::{PlaceholderRenderer, RenderError, TemplateRenderer};
pub use store::{
    create_template_store, select_enabled, MemoryTemplateStore, TemplateFilter, TemplateStore,
};
pub use types::{
    CreateTemplateRequest, EmailTemplate, TemplateError, TemplateField, TemplateListResponse,
    TemplateResult,
};

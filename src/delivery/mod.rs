//! Delivery collaborators.
//!
//! The generator hands every finished message to a [`MailQueue`] inside a
//! [`WriteScope`] opened for that message alone. In-memory implementations
//! of both are provided for running stand-alone and for tests.

mod queue;
mod scope;

use thiserror::Error;

pub use queue::{create_mail_queue, MailQueue, MemoryMailQueue};
pub use scope::{MemoryWriteScopes, ScopeStats, WriteScope, WriteScopeProvider};

/// Errors raised by delivery collaborators
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Mail queue full (size: {size})")]
    QueueFull { size: usize },

    #[error("Message rejected: {0}")]
    Rejected(String),

    #[error("Write scope failed: {0}")]
    Scope(String),

    #[error("Delivery backend unavailable: {0}")]
    Unavailable(String),
}

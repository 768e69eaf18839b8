//! Delivery collaborator and in-memory mail queue

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::message::EmailMessage;
use crate::metrics::DeliveryMetrics;

use super::DeliveryError;

/// Queues a finished message or sends it right away.
#[async_trait]
pub trait MailQueue: Send + Sync {
    async fn queue_or_send(&self, message: EmailMessage) -> Result<(), DeliveryError>;
}

/// In-memory mail queue.
///
/// Messages are kept in arrival order until drained; nothing is sent.
/// With a capacity set, messages beyond it are rejected.
#[derive(Default)]
pub struct MemoryMailQueue {
    messages: RwLock<Vec<EmailMessage>>,
    capacity: Option<usize>,
}

impl MemoryMailQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            capacity: Some(capacity),
        }
    }

    /// Snapshot of the queued messages
    pub async fn messages(&self) -> Vec<EmailMessage> {
        self.messages.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }

    /// Remove and return every queued message
    pub async fn drain(&self) -> Vec<EmailMessage> {
        std::mem::take(&mut *self.messages.write().await)
    }
}

#[async_trait]
impl MailQueue for MemoryMailQueue {
    async fn queue_or_send(&self, message: EmailMessage) -> Result<(), DeliveryError> {
        let mut messages = self.messages.write().await;

        if let Some(capacity) = self.capacity {
            if messages.len() >= capacity {
                DeliveryMetrics::record_rejected();
                return Err(DeliveryError::QueueFull { size: messages.len() });
            }
        }

        tracing::debug!(
            guid = %message.guid,
            label = %message.label,
            send_date = %message.send_date,
            queue_size = messages.len() + 1,
            "Message queued"
        );

        messages.push(message);
        DeliveryMetrics::record_queued();
        Ok(())
    }
}

/// Create an Arc-wrapped in-memory mail queue, bounded when a capacity is given
pub fn create_mail_queue(capacity: Option<usize>) -> Arc<MemoryMailQueue> {
    Arc::new(match capacity {
        Some(capacity) => MemoryMailQueue::with_capacity(capacity),
        None => MemoryMailQueue::new(),
    })
}

//! Scoped write boundary around each delivery

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::metrics::DeliveryMetrics;

use super::DeliveryError;

/// An open write boundary. Exactly one of `commit` or `rollback` closes it.
#[async_trait]
pub trait WriteScope: Send {
    async fn commit(self: Box<Self>) -> Result<(), DeliveryError>;

    async fn rollback(self: Box<Self>) -> Result<(), DeliveryError>;
}

/// Opens write boundaries on the underlying message store
#[async_trait]
pub trait WriteScopeProvider: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn WriteScope>, DeliveryError>;
}

/// Counts of scopes opened and closed by a [`MemoryWriteScopes`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScopeStats {
    pub begun: u64,
    pub committed: u64,
    pub rolled_back: u64,
}

impl ScopeStats {
    /// Scopes begun but not yet closed
    pub fn open(&self) -> u64 {
        self.begun
            .saturating_sub(self.committed)
            .saturating_sub(self.rolled_back)
    }
}

#[derive(Default)]
struct ScopeCounters {
    begun: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
}

/// Write scopes for in-memory stores.
///
/// There is nothing to make durable; scopes only track their lifecycle. A
/// scope dropped without being closed counts as rolled back.
#[derive(Clone, Default)]
pub struct MemoryWriteScopes {
    counters: Arc<ScopeCounters>,
}

impl MemoryWriteScopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ScopeStats {
        ScopeStats {
            begun: self.counters.begun.load(Ordering::Relaxed),
            committed: self.counters.committed.load(Ordering::Relaxed),
            rolled_back: self.counters.rolled_back.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl WriteScopeProvider for MemoryWriteScopes {
    async fn begin(&self) -> Result<Box<dyn WriteScope>, DeliveryError> {
        self.counters.begun.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(MemoryWriteScope {
            counters: self.counters.clone(),
            closed: false,
        }))
    }
}

struct MemoryWriteScope {
    counters: Arc<ScopeCounters>,
    closed: bool,
}

#[async_trait]
impl WriteScope for MemoryWriteScope {
    async fn commit(self: Box<Self>) -> Result<(), DeliveryError> {
        let mut this = self;
        this.closed = true;
        this.counters.committed.fetch_add(1, Ordering::Relaxed);
        DeliveryMetrics::record_scope("commit");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DeliveryError> {
        let mut this = self;
        this.closed = true;
        this.counters.rolled_back.fetch_add(1, Ordering::Relaxed);
        DeliveryMetrics::record_scope("rollback");
        Ok(())
    }
}

impl Drop for MemoryWriteScope {
    fn drop(&mut self) {
        if !self.closed {
            self.counters.rolled_back.fetch_add(1, Ordering::Relaxed);
            DeliveryMetrics::record_scope("rollback");
            tracing::warn!("Write scope dropped without commit, rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_and_rollback_are_counted() {
        let scopes = MemoryWriteScopes::new();

        scopes.begin().await.unwrap().commit().await.unwrap();
        scopes.begin().await.unwrap().rollback().await.unwrap();

        assert_eq!(
            scopes.stats(),
            ScopeStats {
                begun: 2,
                committed: 1,
                rolled_back: 1,
            }
        );
        assert_eq!(scopes.stats().open(), 0);
    }

    #[tokio::test]
    async fn test_dropped_scope_rolls_back() {
        let scopes = MemoryWriteScopes::new();

        let scope = scopes.begin().await.unwrap();
        assert_eq!(scopes.stats().open(), 1);
        drop(scope);

        let stats = scopes.stats();
        assert_eq!(stats.rolled_back, 1);
        assert_eq!(stats.open(), 0);
    }
}

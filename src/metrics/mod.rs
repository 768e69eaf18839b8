//! Prometheus metrics for the mail generation service.
//!
//! This module provides metrics for monitoring template mail generation:
//! - Generation request outcomes and error kinds
//! - Messages generated per handler
//! - Template render latency
//! - Delivery queue and write scope activity

mod helpers;

pub use helpers::{encode_metrics, DeliveryMetrics, GenerationMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "mailgen";

lazy_static! {
    // ============================================================================
    // Generation Metrics
    // ============================================================================

    /// Generation requests by outcome (success/failure)
    pub static ref GENERATION_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_generation_requests_total", METRIC_PREFIX),
        "Total template generation requests",
        &["outcome"]
    ).unwrap();

    /// Generation failures by error kind
    pub static ref GENERATION_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_generation_errors_total", METRIC_PREFIX),
        "Total template generation failures by kind",
        &["kind"]
    ).unwrap();

    /// Messages generated per handler
    pub static ref MESSAGES_GENERATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_messages_generated_total", METRIC_PREFIX),
        "Total messages generated from templates",
        &["handler"]
    ).unwrap();

    /// Time spent rendering one template into a message
    pub static ref TEMPLATE_RENDER_DURATION: Histogram = register_histogram!(
        format!("{}_template_render_duration_seconds", METRIC_PREFIX),
        "Template render duration in seconds",
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Messages accepted by the in-memory mail queue
    pub static ref QUEUE_ENQUEUED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_queue_enqueued_total", METRIC_PREFIX),
        "Total messages accepted by the mail queue"
    ).unwrap();

    /// Messages rejected by the in-memory mail queue
    pub static ref QUEUE_REJECTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_queue_rejected_total", METRIC_PREFIX),
        "Total messages rejected by the mail queue"
    ).unwrap();

    /// Closed write scopes by result (commit/rollback)
    pub static ref WRITE_SCOPES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_write_scopes_total", METRIC_PREFIX),
        "Total write scopes closed",
        &["result"]
    ).unwrap();
}

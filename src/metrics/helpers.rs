//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    GENERATION_ERRORS_TOTAL, GENERATION_REQUESTS_TOTAL, MESSAGES_GENERATED_TOTAL,
    QUEUE_ENQUEUED_TOTAL, QUEUE_REJECTED_TOTAL, TEMPLATE_RENDER_DURATION, WRITE_SCOPES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording generation metrics
pub struct GenerationMetrics;

impl GenerationMetrics {
    pub fn record_success() {
        GENERATION_REQUESTS_TOTAL.with_label_values(&["success"]).inc();
    }

    pub fn record_failure(kind: &str) {
        GENERATION_REQUESTS_TOTAL.with_label_values(&["failure"]).inc();
        GENERATION_ERRORS_TOTAL.with_label_values(&[kind]).inc();
    }

    pub fn record_generated(handler: &str) {
        MESSAGES_GENERATED_TOTAL.with_label_values(&[handler]).inc();
    }

    pub fn record_render(duration: Duration) {
        TEMPLATE_RENDER_DURATION.observe(duration.as_secs_f64());
    }
}

/// Helper struct for recording delivery metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    pub fn record_queued() {
        QUEUE_ENQUEUED_TOTAL.inc();
    }

    pub fn record_rejected() {
        QUEUE_REJECTED_TOTAL.inc();
    }

    /// `result` is "commit" or "rollback"
    pub fn record_scope(result: &str) {
        WRITE_SCOPES_TOTAL.with_label_values(&[result]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_includes_recorded_metrics() {
        GenerationMetrics::record_generated("MetricsTest");
        DeliveryMetrics::record_scope("commit");

        let output = encode_metrics().unwrap();
        assert!(output.contains("mailgen_messages_generated_total"));
        assert!(output.contains("handler=\"MetricsTest\""));
        assert!(output.contains("mailgen_write_scopes_total"));
    }
}

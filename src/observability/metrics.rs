//! Metrics collection.
//!
//! # Metrics
//! - `bridge_exchanges_total` (counter): exchanges by outcome
//! - `bridge_outbound_events_total` (counter): events sent, by type
//! - `bridge_send_failures_total` (counter): rejected gateway sends
//!
//! Counters go to whatever recorder is installed; without one they are no-ops.

use metrics::counter;

use crate::config::ObservabilityConfig;

/// Counter recording for one adapter, switched by `observability.metrics_enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeMetrics {
    enabled: bool,
}

impl BridgeMetrics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &ObservabilityConfig) -> Self {
        Self::new(config.metrics_enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an exchange outcome (`finished`, `disconnected`, `failed`).
    pub fn record_exchange(&self, outcome: &'static str) {
        if self.enabled {
            counter!("bridge_exchanges_total", "outcome" => outcome).increment(1);
        }
    }

    /// Record one outbound event delivered to the transport.
    pub fn record_outbound(&self, kind: &'static str) {
        if self.enabled {
            counter!("bridge_outbound_events_total", "type" => kind).increment(1);
        }
    }

    /// Record a failed gateway send.
    pub fn record_send_failure(&self) {
        if self.enabled {
            counter!("bridge_send_failures_total").increment(1);
        }
    }
}

impl Default for BridgeMetrics {
    fn default() -> Self {
        Self::new(true)
    }
}


#[cfg(test)]
mod tests {
    use super::recorder::CountingRecorder;
    use super::*;

    #[test]
    fn enabled_counters_are_recorded() {
        let recorder = CountingRecorder::default();
        ::metrics::with_local_recorder(&recorder, || {
            let metrics = BridgeMetrics::default();
            metrics.record_exchange("finished");
            metrics.record_exchange("finished");
            metrics.record_outbound("http.response.start");
            metrics.record_send_failure();
        });

        assert_eq!(recorder.get("bridge_exchanges_total{outcome=finished}"), 2);
        assert_eq!(
            recorder.get("bridge_outbound_events_total{type=http.response.start}"),
            1
        );
        assert_eq!(recorder.get("bridge_send_failures_total"), 1);
    }

    #[test]
    fn disabled_metrics_record_nothing() {
        let recorder = CountingRecorder::default();
        let config = ObservabilityConfig {
            metrics_enabled: false,
            ..ObservabilityConfig::default()
        };
        ::metrics::with_local_recorder(&recorder, || {
            let metrics = BridgeMetrics::from_config(&config);
            assert!(!metrics.is_enabled());
            metrics.record_exchange("failed");
            metrics.record_outbound("http.response.body");
            metrics.record_send_failure();
        });

        assert!(recorder.is_empty());
    }
}

//! In-process inference metrics with Prometheus text exposition.
//!
//! Accumulation is lock-free (atomics and a concurrent map); recording is
//! best-effort and never fails or blocks the inference path.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Histogram bucket upper bounds, in seconds.
pub const LATENCY_BUCKETS: [f64; 9] = [0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0];

/// Inference latency histogram plus per-class prediction counters.
pub struct InferenceMetrics {
    /// Non-cumulative cell counts; the +Inf cell is the last entry.
    latency_cells: [AtomicU64; LATENCY_BUCKETS.len() + 1],
    latency_count: AtomicU64,
    latency_sum_micros: AtomicU64,
    predictions: DashMap<String, u64>,
}

impl InferenceMetrics {
    pub fn new() -> Self {
        Self {
            latency_cells: std::array::from_fn(|_| AtomicU64::new(0)),
            latency_count: AtomicU64::new(0),
            latency_sum_micros: AtomicU64::new(0),
            predictions: DashMap::new(),
        }
    }

    /// Record one inference observation: latency plus the predicted label.
    pub fn observe_inference(&self, latency_seconds: f64, predicted_label: &str) {
        let cell = LATENCY_BUCKETS
            .iter()
            .position(|bound| latency_seconds <= *bound)
            .unwrap_or(LATENCY_BUCKETS.len());
        self.latency_cells[cell].fetch_add(1, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
        self.latency_sum_micros
            .fetch_add((latency_seconds * 1_000_000.0) as u64, Ordering::Relaxed);

        *self
            .predictions
            .entry(predicted_label.to_string())
            .or_insert(0) += 1;
    }

    pub fn prediction_count(&self, label: &str) -> u64 {
        self.predictions.get(label).map(|v| *v).unwrap_or(0)
    }

    pub fn total_observations(&self) -> u64 {
        self.latency_count.load(Ordering::Relaxed)
    }

    /// Export metrics in Prometheus text format.
    pub fn prometheus(&self, ready: bool, uptime_seconds: u64) -> String {
        let mut out = String::with_capacity(1024);

        out.push_str(&format!(
            r#"# HELP inferd_up Service readiness (1=model loaded, 0=unloaded)
# TYPE inferd_up gauge
inferd_up {}

# HELP inferd_uptime_seconds Uptime in seconds
# TYPE inferd_uptime_seconds counter
inferd_uptime_seconds {}

"#,
            if ready { 1 } else { 0 },
            uptime_seconds,
        ));

        out.push_str("# HELP model_inference_seconds Time spent in model inference\n");
        out.push_str("# TYPE model_inference_seconds histogram\n");
        let mut cumulative = 0u64;
        for (bound, cell) in LATENCY_BUCKETS.iter().zip(self.latency_cells.iter()) {
            cumulative += cell.load(Ordering::Relaxed);
            out.push_str(&format!(
                "model_inference_seconds_bucket{{le=\"{bound}\"}} {cumulative}\n"
            ));
        }
        let count = self.latency_count.load(Ordering::Relaxed);
        out.push_str(&format!(
            "model_inference_seconds_bucket{{le=\"+Inf\"}} {count}\n"
        ));
        out.push_str(&format!(
            "model_inference_seconds_sum {}\n",
            self.latency_sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
        ));
        out.push_str(&format!("model_inference_seconds_count {count}\n\n"));

        out.push_str("# HELP predictions_total Total predictions made\n");
        out.push_str("# TYPE predictions_total counter\n");
        let mut labels: Vec<(String, u64)> = self
            .predictions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        labels.sort();
        for (label, count) in labels {
            out.push_str(&format!(
                "predictions_total{{predicted_class=\"{label}\"}} {count}\n"
            ));
        }

        out
    }
}

impl Default for InferenceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_updates_counter_and_histogram() {
        let metrics = InferenceMetrics::new();
        metrics.observe_inference(0.003, "setosa");
        metrics.observe_inference(0.003, "setosa");
        metrics.observe_inference(0.2, "virginica");

        assert_eq!(metrics.prediction_count("setosa"), 2);
        assert_eq!(metrics.prediction_count("virginica"), 1);
        assert_eq!(metrics.prediction_count("versicolor"), 0);
        assert_eq!(metrics.total_observations(), 3);
    }

    #[test]
    fn exposition_is_cumulative_and_sorted() {
        let metrics = InferenceMetrics::new();
        metrics.observe_inference(0.0005, "b");
        metrics.observe_inference(0.02, "a");

        let text = metrics.prometheus(true, 42);
        assert!(text.contains("inferd_up 1"));
        assert!(text.contains("inferd_uptime_seconds 42"));
        // 0.0005 falls in the first bucket; both observations by 0.025.
        assert!(text.contains("model_inference_seconds_bucket{le=\"0.001\"} 1"));
        assert!(text.contains("model_inference_seconds_bucket{le=\"0.025\"} 2"));
        assert!(text.contains("model_inference_seconds_bucket{le=\"+Inf\"} 2"));
        assert!(text.contains("model_inference_seconds_count 2"));

        let a = text.find("predictions_total{predicted_class=\"a\"} 1").unwrap();
        let b = text.find("predictions_total{predicted_class=\"b\"} 1").unwrap();
        assert!(a < b);
    }

    #[test]
    fn over_range_latency_lands_in_inf_cell() {
        let metrics = InferenceMetrics::new();
        metrics.observe_inference(5.0, "slow");
        let text = metrics.prometheus(false, 0);
        assert!(text.contains("inferd_up 0"));
        assert!(text.contains("model_inference_seconds_bucket{le=\"1\"} 0"));
        assert!(text.contains("model_inference_seconds_bucket{le=\"+Inf\"} 1"));
    }
}

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::serving::{InferenceMetrics, ServiceState};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Current model artifact holder (readiness source of truth)
    pub service: Arc<ServiceState>,

    /// Inference metrics accumulators
    pub metrics: Arc<InferenceMetrics>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: Arc<ServiceState>, metrics: Arc<InferenceMetrics>) -> Self {
        Self {
            service,
            metrics,
            start_time: Utc::now(),
        }
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

use crate::models::load::LoadStatus;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub booking_operations_total: IntCounterVec,
    pub load_status_transitions_total: IntCounterVec,
    pub lifecycle_latency_seconds: HistogramVec,
    pub loads_by_status: IntGaugeVec,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let booking_operations_total = IntCounterVec::new(
            Opts::new(
                "booking_operations_total",
                "Booking mutations by operation and outcome",
            ),
            &["operation", "outcome"],
        )
        .expect("valid booking_operations_total metric");

        let load_status_transitions_total = IntCounterVec::new(
            Opts::new(
                "load_status_transitions_total",
                "Load status changes applied by the booking lifecycle",
            ),
            &["from", "to"],
        )
        .expect("valid load_status_transitions_total metric");

        let lifecycle_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "lifecycle_latency_seconds",
                "Latency of booking mutations including load recompute, in seconds",
            ),
            &["operation"],
        )
        .expect("valid lifecycle_latency_seconds metric");

        let loads_by_status = IntGaugeVec::new(
            Opts::new("loads_by_status", "Current number of loads per status"),
            &["status"],
        )
        .expect("valid loads_by_status metric");

        for status in LoadStatus::ALL {
            loads_by_status.with_label_values(&[status.as_str()]).set(0);
        }

        registry
            .register(Box::new(booking_operations_total.clone()))
            .expect("register booking_operations_total");
        registry
            .register(Box::new(load_status_transitions_total.clone()))
            .expect("register load_status_transitions_total");
        registry
            .register(Box::new(lifecycle_latency_seconds.clone()))
            .expect("register lifecycle_latency_seconds");
        registry
            .register(Box::new(loads_by_status.clone()))
            .expect("register loads_by_status");

        Self {
            registry,
            booking_operations_total,
            load_status_transitions_total,
            lifecycle_latency_seconds,
            loads_by_status,
        }
    }

    pub fn record_transition(&self, from: LoadStatus, to: LoadStatus) {
        if from == to {
            return;
        }

        self.load_status_transitions_total
            .with_label_values(&[from.as_str(), to.as_str()])
            .inc();
        self.loads_by_status
            .with_label_values(&[from.as_str()])
            .dec();
        self.loads_by_status.with_label_values(&[to.as_str()]).inc();
    }

    pub fn load_added(&self, status: LoadStatus) {
        self.loads_by_status
            .with_label_values(&[status.as_str()])
            .inc();
    }

    pub fn load_removed(&self, status: LoadStatus) {
        self.loads_by_status
            .with_label_values(&[status.as_str()])
            .dec();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

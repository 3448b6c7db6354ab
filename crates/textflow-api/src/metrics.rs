//! Prometheus counters exposed on `/metrics`.
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub requests: IntCounterVec,
    pub stage_failures: IntCounterVec,
    pub texts_processed: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("textflow_requests_total", "HTTP requests by endpoint"),
            &["endpoint"],
        )?;
        let stage_failures = IntCounterVec::new(
            Opts::new("textflow_stage_failures_total", "Failed stage runs by stage"),
            &["stage"],
        )?;
        let texts_processed = IntCounter::new(
            "textflow_texts_processed_total",
            "Texts that went through the pipeline",
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(stage_failures.clone()))?;
        registry.register(Box::new(texts_processed.clone()))?;

        Ok(Self {
            registry,
            requests,
            stage_failures,
            texts_processed,
        })
    }

    pub fn record_request(&self, endpoint: &str) {
        self.requests.with_label_values(&[endpoint]).inc();
    }

    pub fn record_stage_failures(&self, stages: &[String]) {
        for stage in stages {
            self.stage_failures.with_label_values(&[stage.as_str()]).inc();
        }
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

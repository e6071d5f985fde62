use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Central metrics registry for the service
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Identity Metrics
    pub auth_events_total: CounterVec,

    // Email Metrics
    pub email_deliveries_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("hazel"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("hazel")
                .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let auth_events_total = CounterVec::new(
            Opts::new("auth_events_total", "Identity operations by outcome").namespace("hazel"),
            &["event", "outcome"],
        )?;
        registry.register(Box::new(auth_events_total.clone()))?;

        let email_deliveries_total = CounterVec::new(
            Opts::new("email_deliveries_total", "Email deliveries by outcome").namespace("hazel"),
            &["template", "outcome"],
        )?;
        registry.register(Box::new(email_deliveries_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            auth_events_total,
            email_deliveries_total,
        }))
    }

    pub fn record_auth(&self, event: &str, outcome: &str) {
        self.auth_events_total
            .with_label_values(&[event, outcome])
            .inc();
    }

    pub fn record_email(&self, template: &str, outcome: &str) {
        self.email_deliveries_total
            .with_label_values(&[template, outcome])
            .inc();
    }

    pub fn email_count(&self, template: &str, outcome: &str) -> u64 {
        self.email_deliveries_total
            .with_label_values(&[template, outcome])
            .get() as u64
    }

    pub fn auth_count(&self, event: &str, outcome: &str) -> u64 {
        self.auth_events_total
            .with_label_values(&[event, outcome])
            .get() as u64
    }

    /// Prometheus text exposition of every registered family.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, route, status code
//! - `http_request_duration_seconds` (histogram): latency distribution, same labels
//! - `process_*` (CPU seconds, memory, open fds, threads, start time) via `metrics-process`
//! - `process_uptime_seconds`, `tokio_*` (gauges)
//!
//! Process and runtime metrics are refreshed by a background collector.
//!
//! # Design Decisions
//! - Each [`GatewayMetrics`] owns its Prometheus recorder; nothing is installed globally
//! - Buckets match the conventional Prometheus client defaults

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Label};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use metrics_process::Collector;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Content type of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// How often process metrics are refreshed.
pub const COLLECT_INTERVAL: Duration = Duration::from_secs(10);

const DURATION_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Error raised while building the recorder.
#[derive(Debug, Error)]
#[error("failed to build metrics recorder: {0}")]
pub struct MetricsError(#[from] BuildError);

/// Request metrics registry for one gateway.
#[derive(Clone)]
pub struct GatewayMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    process: Collector,
    started: Instant,
}

impl GatewayMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
                &DURATION_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        let metrics = Self {
            inner: Arc::new(Inner {
                recorder,
                handle,
                process: Collector::default(),
                started: Instant::now(),
            }),
        };

        metrics.with_recorder(|| {
            describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
            describe_histogram!(
                REQUEST_DURATION_SECONDS,
                "Duration of HTTP requests in seconds"
            );
            metrics.inner.process.describe();
            describe_gauge!("process_uptime_seconds", "Time since the process started");
            describe_gauge!("tokio_workers_count", "Number of runtime worker threads");
            describe_gauge!("tokio_alive_tasks", "Number of alive runtime tasks");
        });
        metrics.collect_process_metrics();

        Ok(metrics)
    }

    fn with_recorder<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.inner.recorder, f)
    }

    /// Record one completed request.
    pub fn record_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let labels = vec![
            Label::new("method", method.to_string()),
            Label::new("route", route.to_string()),
            Label::new("status_code", status.to_string()),
        ];

        self.with_recorder(|| {
            counter!(REQUESTS_TOTAL, labels.clone()).increment(1);
            histogram!(REQUEST_DURATION_SECONDS, labels).record(elapsed.as_secs_f64());
        });
    }

    /// Refresh process and runtime gauges.
    pub fn collect_process_metrics(&self) {
        self.with_recorder(|| {
            self.inner.process.collect();
            gauge!("process_uptime_seconds").set(self.inner.started.elapsed().as_secs_f64());

            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let runtime_metrics = runtime.metrics();
                gauge!("tokio_workers_count").set(runtime_metrics.num_workers() as f64);
                gauge!("tokio_alive_tasks").set(runtime_metrics.num_alive_tasks() as f64);
            }
        });
    }

    /// Render every registered metric in the text exposition format.
    pub fn render(&self) -> String {
        self.inner.handle.render()
    }

    /// Refresh process metrics and run exporter upkeep every `interval` until `shutdown`.
    pub fn spawn_collector(&self, interval: Duration, shutdown: Shutdown) -> JoinHandle<()> {
        let metrics = self.clone();
        tokio::spawn(async move {
            let stop = shutdown.signal();
            tokio::pin!(stop);
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    _ = ticker.tick() => {
                        metrics.collect_process_metrics();
                        metrics.inner.handle.run_upkeep();
                    }
                }
            }
            tracing::debug!("Metrics collector stopped");
        })
    }
}

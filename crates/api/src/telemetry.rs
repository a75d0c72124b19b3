//! Prometheus Metrics

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{debug, warn};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global recorder once and return its render handle.
///
/// Later calls (several test servers in one process) share the first
/// recorder.
pub fn install_recorder() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            match metrics::set_global_recorder(recorder) {
                Ok(()) => debug!("Prometheus recorder installed"),
                Err(e) => warn!("Metrics recorder already set: {}", e),
            }
            handle
        })
        .clone()
}

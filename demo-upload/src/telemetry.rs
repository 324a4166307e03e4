//! OTLP trace export, enabled by `OTEL_EXPORTER_OTLP_ENDPOINT`

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{ExporterBuildError, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{
    Resource,
    trace::{SdkTracer, SdkTracerProvider},
};

pub(crate) const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Batching tracer provider that ships spans to an OTLP/HTTP collector.
pub(crate) struct Telemetry {
    provider: SdkTracerProvider,
    endpoint: String,
}

impl Telemetry {
    /// `None` when the endpoint variable is unset or empty.
    pub(crate) fn from_env() -> Result<Option<Self>, ExporterBuildError> {
        let endpoint = std::env::var(OTLP_ENDPOINT_ENV).ok();
        Self::from_endpoint(endpoint.as_deref().filter(|e| !e.trim().is_empty()))
    }

    pub(crate) fn from_endpoint(endpoint: Option<&str>) -> Result<Option<Self>, ExporterBuildError> {
        let Some(endpoint) = endpoint else {
            return Ok(None);
        };
        let endpoint = traces_endpoint(endpoint);

        let exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(endpoint.clone())
            .build()?;
        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
            .build();

        Ok(Some(Self { provider, endpoint }))
    }

    pub(crate) fn tracer(&self) -> SdkTracer {
        self.provider.tracer(SERVICE_NAME)
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Flush buffered spans and stop the exporter.
    pub(crate) fn shutdown(self) {
        match self.provider.shutdown() {
            Ok(()) => tracing::info!("Trace exporter flushed"),
            Err(e) => tracing::warn!("Failed to flush trace exporter: {}", e),
        }
    }
}

/// Base collector URL to the OTLP/HTTP traces path.
fn traces_endpoint(base: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.ends_with("/v1/traces") {
        base.to_string()
    } else {
        format!("{base}/v1/traces")
    }
}

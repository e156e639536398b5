//! Observability hook for completed alt text calls.
//!
//! Every adapter reports its result to a [`ResultSink`] before returning.
//! The default sink emits one structured `tracing` event; tests and
//! embedding applications can inject their own.

use crate::providers::Provider;
use crate::types::AltTextResult;

/// Receives a diagnostic record for each successful call.
pub trait ResultSink: Send + Sync {
    fn record(&self, provider: Provider, result: &AltTextResult);
}

/// Logs each result as an `info` event under the `altai::result` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ResultSink for TracingSink {
    fn record(&self, provider: Provider, result: &AltTextResult) {
        let info = serde_json::to_string(&result.info).unwrap_or_default();
        tracing::info!(
            target: "altai::result",
            provider = provider.display_name(),
            model = %result.model,
            tokens = result.tokens,
            total_time_ms = result.total_time,
            image_transport = %result.image_transport,
            info = %info,
            "Alt text generated"
        );
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ResultSink for NoopSink {
    fn record(&self, _provider: Provider, _result: &AltTextResult) {}
}

impl<F> ResultSink for F
where
    F: Fn(Provider, &AltTextResult) + Send + Sync,
{
    fn record(&self, provider: Provider, result: &AltTextResult) {
        self(provider, result)
    }
}

use crate::api::transport::{tool_error, RemoteTransport};
use crate::cache::ResponseCache;
use crate::config::EngineConfig;
use crate::error::AppError;
use crate::rate_limit::CallPacer;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cached, paced access to the aggregator. Nothing else in the crate talks
/// to the transport directly.
pub struct OpggClient<T: RemoteTransport> {
    transport: T,
    cache: ResponseCache,
    pacer: CallPacer,
    call_timeout: Duration,
}

impl<T: RemoteTransport> OpggClient<T> {
    pub fn new(transport: T, config: &EngineConfig) -> Self {
        Self::with_cache(transport, ResponseCache::new(config.cache_ttl), config)
    }

    pub fn with_cache(transport: T, cache: ResponseCache, config: &EngineConfig) -> Self {
        OpggClient {
            transport,
            cache,
            pacer: CallPacer::new(config.min_call_spacing),
            call_timeout: config.call_timeout,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn min_call_spacing(&self) -> Duration {
        self.pacer.spacing()
    }

    /// Calls `endpoint` with `params`, waiting at most `timeout` (clamped to
    /// the per-call bound) including time spent queued behind the pacer.
    pub fn request(&mut self, endpoint: &str, params: &Value, timeout: Duration) -> Result<Value, AppError> {
        if let Some(payload) = self.cache.get(endpoint, params) {
            debug!(endpoint, "cache hit");
            return Ok(payload);
        }

        let budget = timeout.min(self.call_timeout);
        if budget.is_zero() {
            return Err(AppError::Timeout(endpoint.to_string()));
        }

        let started = Instant::now();
        self.pacer.wait_turn();
        let remaining = budget.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            return Err(AppError::Timeout(endpoint.to_string()));
        }

        let payload = self.transport.invoke(endpoint, params, remaining)?;
        // Tool-level failures come back as results; never memoize them
        if let Some(message) = tool_error(&payload) {
            return Err(AppError::TransportFailure(format!("{}: {}", endpoint, message)));
        }
        self.cache.insert(endpoint, params, payload.clone());
        Ok(payload)
    }
}

//! Endpoint selection, optionally through service discovery.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::ClientSettings;
use crate::error::{ConfigError, Result};

/// Trait for discovery backends that enumerate config server instances.
///
/// One polymorphic seam: implementations that need no extra context simply
/// ignore what they do not use. The lookup must be idempotent and
/// side-effect-free so the selector may retry it.
#[async_trait]
pub trait DiscoveryLookup: Send + Sync {
    /// Enumerate the base addresses registered under `service_id`.
    async fn instances(&self, service_id: &str) -> Result<Vec<String>>;
}

/// Retry policy for the discovery lookup.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Backoff before the second attempt.
    pub initial_backoff: Duration,
    /// Multiplier applied to the backoff after each attempt.
    pub multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            attempts: 6,
            initial_backoff: Duration::from_secs(1),
            multiplier: 1.1,
        }
    }
}

/// Normalize an instance address to a root-path base URI: whitespace and
/// trailing slashes are trimmed.
pub fn normalize_address(address: &str) -> String {
    address.trim().trim_end_matches('/').to_string()
}

/// Resolves the ordered candidate address list for a retrieval flow.
///
/// With discovery disabled the static list passes through unchanged. With
/// discovery enabled the lookup is resolved once at the top of the flow
/// (never per candidate attempt), retried on failure per [`RetrySettings`].
pub struct EndpointSelector {
    lookup: Option<Arc<dyn DiscoveryLookup>>,
    retry: RetrySettings,
}

impl EndpointSelector {
    /// Selector that only ever returns the static address list.
    pub fn static_only() -> Self {
        Self {
            lookup: None,
            retry: RetrySettings::default(),
        }
    }

    /// Selector backed by a discovery lookup.
    pub fn with_discovery(lookup: Arc<dyn DiscoveryLookup>) -> Self {
        Self {
            lookup: Some(lookup),
            retry: RetrySettings::default(),
        }
    }

    /// Override the retry policy for the discovery lookup.
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// Resolve the ordered candidate list for the given settings.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::NoInstancesFound`] when discovery is
    /// enabled and the lookup (after retries) yields no instances, or with
    /// [`ConfigError::ConfigurationConflict`] when discovery is enabled but
    /// no lookup was wired in.
    pub async fn select(&self, settings: &ClientSettings) -> Result<Vec<String>> {
        let discovery = match &settings.discovery {
            Some(discovery) if discovery.enabled => discovery,
            _ => return Ok(settings.uris.clone()),
        };
        let lookup = self.lookup.as_ref().ok_or_else(|| {
            ConfigError::ConfigurationConflict(
                "discovery is enabled but no discovery lookup is configured".to_string(),
            )
        })?;

        debug!(service_id = %discovery.service_id, "locating config server via discovery");
        let mut backoff = self.retry.initial_backoff;
        let mut last_err = None;
        for attempt in 1..=self.retry.attempts.max(1) {
            match lookup.instances(&discovery.service_id).await {
                Ok(instances) if !instances.is_empty() => {
                    debug!(
                        service_id = %discovery.service_id,
                        count = instances.len(),
                        "located config server instances via discovery"
                    );
                    return Ok(instances.iter().map(|a| normalize_address(a)).collect());
                }
                Ok(_) => {
                    last_err = Some(ConfigError::NoInstancesFound {
                        service_id: discovery.service_id.clone(),
                    });
                }
                Err(err) => {
                    last_err = Some(ConfigError::Discovery(err.to_string()));
                }
            }
            if attempt < self.retry.attempts {
                warn!(
                    service_id = %discovery.service_id,
                    attempt,
                    "discovery lookup failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.mul_f64(self.retry.multiplier);
            }
        }
        Err(last_err.unwrap_or(ConfigError::NoInstancesFound {
            service_id: discovery.service_id.clone(),
        }))
    }
}

//! Per-IP Rate Limiting
//!
//! GCRA quotas via tower_governor, keyed on the peer address. The server
//! must be started with `into_make_service_with_connect_info::<SocketAddr>()`
//! for the key extractor to see the client IP.

use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config that reports `x-ratelimit-*` headers
pub type IpGovernorConfig = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

#[derive(Debug, Error)]
#[error("Invalid rate limit: per_second={per_second}, burst_size={burst_size}")]
pub struct RateLimitError {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Seconds between quota replenishments
    pub per_second: u64,
    /// Requests allowed back to back before throttling
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 50,
        }
    }
}

/// Build the governor config for the API routes.
///
/// Zero values are rejected by the builder and reported as an error.
pub fn create_governor_config(
    config: &RateLimitConfig,
) -> Result<Arc<IpGovernorConfig>, RateLimitError> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
        .ok_or(RateLimitError {
            per_second: config.per_second,
            burst_size: config.burst_size,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.per_second, 1);
        assert_eq!(config.burst_size, 50);
    }

    #[test]
    fn test_create_governor_config() {
        assert!(create_governor_config(&RateLimitConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_burst_rejected() {
        let config = RateLimitConfig {
            burst_size: 0,
            ..RateLimitConfig::default()
        };
        assert!(create_governor_config(&config).is_err());
    }
}

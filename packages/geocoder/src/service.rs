//! Embedded geocoding service configuration.
//!
//! The service definition lives in a TOML file under `services/`,
//! embedded at compile time. The retry policy is part of the config so
//! the throttling behavior is data, not code.

use std::time::Duration;

use serde::Deserialize;

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g. `"geocoder_ca"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this service is active.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// API base URL.
    pub base_url: String,
    /// City context sent with every intersection lookup.
    pub city: String,
    /// Transport retry policy.
    pub retry: RetryPolicy,
}

/// When and how the transport retries a request.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryPolicy {
    /// Total request ceiling, including the first attempt.
    pub max_attempts: u32,
    /// Base delay multiplier in seconds.
    pub backoff_base_seconds: u64,
    /// HTTP statuses that trigger a retry.
    pub retryable_statuses: Vec<u16>,
    /// HTTP methods eligible for retry.
    pub retryable_methods: Vec<String>,
}

impl RetryPolicy {
    /// Whether a response with this method/status combination should be
    /// retried.
    #[must_use]
    pub fn is_retryable(&self, method: &str, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
            && self
                .retryable_methods
                .iter()
                .any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Delay before the retry that follows attempt number `attempt`
    /// (1-based): `backoff_base_seconds * 2^(attempt-1)`.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        Duration::from_secs(self.backoff_base_seconds.saturating_mul(1 << exponent))
    }
}

const fn default_true() -> bool {
    true
}

const SERVICE_TOML: &str = include_str!("../services/geocoder_ca.toml");

/// Returns the embedded geocoder.ca service configuration.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (a compile-time guarantee —
/// the config ships inside the binary).
#[must_use]
pub fn default_service() -> GeocodingService {
    toml::de::from_str(SERVICE_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse geocoding service config: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_embedded_service() {
        let service = default_service();
        assert_eq!(service.id, "geocoder_ca");
        assert!(service.enabled);
        assert!(!service.base_url.is_empty());
        assert_eq!(service.city, "toronto");
    }

    #[test]
    fn retry_policy_matches_throttle_statuses_only() {
        let policy = default_service().retry;
        assert!(policy.is_retryable("GET", 403));
        assert!(policy.is_retryable("get", 403));
        assert!(!policy.is_retryable("GET", 500));
        assert!(!policy.is_retryable("POST", 403));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = default_service().retry;
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(4), Duration::from_secs(8));
    }
}

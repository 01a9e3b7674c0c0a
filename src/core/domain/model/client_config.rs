//! Tunables of the HTTP transport.

use crate::core::domain::error::ValidationError;
use std::time::Duration;

/// Transport configuration shared by every request of a client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept self-signed or otherwise untrusted certificates.
    ///
    /// PVE nodes ship with a self-signed certificate, so this is on by default.
    pub accept_invalid_certs: bool,
    /// Optional client-side request throttling.
    pub rate_limit: Option<RateLimitConfig>,
    /// Spawn a background connectivity probe when the client is built.
    pub probe_on_build: bool,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout.is_zero() {
            return Err(ValidationError::Field {
                field: "timeout".to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        }
        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.validate()?;
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            accept_invalid_certs: true,
            rate_limit: None,
            probe_on_build: true,
        }
    }
}

/// Token bucket quota applied to outgoing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

impl RateLimitConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_second == 0 || self.burst_size == 0 {
            return Err(ValidationError::ConstraintViolation(
                "Rate limit quota and burst size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

use crate::core::domain::{
    error::ValidationError,
    value_object::{proxmox_host::ProxmoxHost, proxmox_port::ProxmoxPort},
};
use url::Url;

const API_ROOT: &str = "api2/json";
const MAX_URL_LENGTH: usize = 2083;

/// The validated base URL of a Proxmox API endpoint, e.g. `https://pve:8006/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUrl(String);

impl ProxmoxUrl {
    /// Builds the `https` base URL for a host and port.
    pub fn new(host: &ProxmoxHost, port: &ProxmoxPort) -> Result<Self, ValidationError> {
        let url = format!("https://{}:{}/", host.to_authority(), port.get());
        validate_url(&url)?;
        Ok(Self(url))
    }

    /// Creates a new URL without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(url: String) -> Self {
        Self(url)
    }

    /// Returns the base URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the full JSON API URL of an endpoint, e.g. `nodes/pve1/qemu`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.0.trim_end_matches('/'),
            API_ROOT,
            path.trim_start_matches('/')
        )
    }
}

/// Validates a base URL.
pub(crate) fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed =
        Url::parse(url).map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !matches!(parsed.scheme(), "https" | "http") {
        return Err(ValidationError::ConstraintViolation(
            "Invalid scheme. Must be one of: https, http".to_string(),
        ));
    }

    if parsed.path() != "/" {
        return Err(ValidationError::ConstraintViolation(
            "Base URL cannot carry a path".to_string(),
        ));
    }

    Ok(())
}

//! Internal HTTP transport that signs every request with the API token.

use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult, RequestError, ValidationError},
    model::{
        api_response::ApiResponse, client_config::ClientConfig,
        proxmox_connection::ProxmoxConnection,
    },
};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{
    Client, Method,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// The seam between fleet operations and the wire.
///
/// Implementations send one request to `/api2/json/{path}` and return the
/// unwrapped `data` payload of the response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Sends one request and returns the `data` member of the response envelope.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ProxmoxResult<Value>;

    /// Checks that the endpoint answers at all. Any HTTP response counts as reachable.
    async fn probe(&self) -> ProxmoxResult<()>;
}

/// reqwest-backed transport.
///
/// Adds `Authorization: PVEAPIToken=...` to each request, enforces the
/// per-request timeout, and optionally throttles through a token bucket.
#[derive(Debug)]
pub struct ApiClient {
    http_client: Client,
    connection: Arc<ProxmoxConnection>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Configuration` if the token cannot be used as a
    /// header or the rate limit is zero, and `ProxmoxError::Connectivity` if
    /// the HTTP client cannot be built.
    pub fn new(connection: Arc<ProxmoxConnection>, config: &ClientConfig) -> ProxmoxResult<Self> {
        let mut authorization =
            HeaderValue::from_str(&connection.proxmox_api_token().as_authorization_header())
                .map_err(|e| ValidationError::Format(format!("Invalid API token: {}", e)))?;
        authorization.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, authorization);
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(default_headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ProxmoxError::Connectivity {
                host: connection.proxmox_host().as_str().to_string(),
                port: connection.proxmox_port().get(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let rate_limiter = config
            .rate_limit
            .map(|rl| {
                let per_second = NonZeroU32::new(rl.requests_per_second);
                let burst = NonZeroU32::new(rl.burst_size);
                match (per_second, burst) {
                    (Some(per_second), Some(burst)) => Ok(Arc::new(
                        DefaultDirectRateLimiter::direct(
                            Quota::per_second(per_second).allow_burst(burst),
                        ),
                    )),
                    _ => Err(ValidationError::ConstraintViolation(
                        "Rate limit quota and burst size must be greater than zero".to_string(),
                    )),
                }
            })
            .transpose()?;

        Ok(Self {
            http_client,
            connection,
            rate_limiter,
        })
    }

    fn transport_error(path: &str, error: reqwest::Error) -> RequestError {
        RequestError::Transport {
            path: path.to_string(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl ApiTransport for ApiClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ProxmoxResult<Value> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.connection.proxmox_url().endpoint(path);
        debug!(%method, %url, "sending API request");

        let mut req_builder = self.http_client.request(method, &url);
        if let Some(body) = &body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| Self::transport_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            debug!(%status, path, "API request rejected");
            return Err(RequestError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            }
            .into());
        }

        let envelope = response
            .json::<ApiResponse<Value>>()
            .await
            .map_err(|e| RequestError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(envelope.data)
    }

    async fn probe(&self) -> ProxmoxResult<()> {
        let url = self.connection.proxmox_url().endpoint("");
        debug!(%url, "probing API endpoint");

        self.http_client
            .get(&url)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ProxmoxError::Connectivity {
                host: self.connection.proxmox_host().as_str().to_string(),
                port: self.connection.proxmox_port().get(),
                message: e.to_string(),
            })
    }
}

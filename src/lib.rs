//! Async client for driving fleets of Proxmox VE virtual machines.
//!
//! Authenticates with an API token and exposes batch operations that fan out
//! over every node of a cluster: listing nodes and VMs, creating, deleting,
//! starting, stopping and rebooting VMs, snapshots, and cluster tasks.

mod core;
mod resources;

pub use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult, RequestError, ValidationError},
    model::{
        client_config::{ClientConfig, RateLimitConfig},
        node_list_item::NodeListItem,
        outcome::VmOutcome,
        proxmox_connection::ProxmoxConnection,
        snapshot::{Assignment, SnapshotListItem, SnapshotRequest, VmSnapshots},
        task::TaskListItem,
        vm::{VmAction, VmListItem, VmSpec, VmTask},
    },
    value_object::{ProxmoxApiToken, ProxmoxHost, ProxmoxPort, ProxmoxRealm, ProxmoxUrl},
};
use crate::core::infrastructure::api_client::{ApiClient, ApiTransport};
use std::{env, fmt, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// A Client for interacting with the Proxmox VE API
///
/// The client owns its HTTP transport; clones share the same connection pool.
///
/// # Examples
///
/// ```no_run
/// use proxmox_fleet::{ProxmoxClient, ProxmoxResult};
///
/// #[tokio::main]
/// async fn main() -> ProxmoxResult<()> {
///     let client = ProxmoxClient::builder()
///         .api_token("root@pam!fleet=aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee")
///         .host("pve.example.com")
///         .port(8006)
///         .build()
///         .await?;
///
///     for vm in client.list_vms(None).await? {
///         println!("{} on {}", vm.vmid, vm.node);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ProxmoxClient {
    pub(crate) transport: Arc<dyn ApiTransport>,
    pub(crate) connection: Arc<ProxmoxConnection>,
}

/// Builder for ProxmoxClient configuration
#[derive(Default)]
pub struct ProxmoxClientBuilder {
    api_token: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    realm: Option<String>,
    config: ClientConfig,
}

impl fmt::Debug for ProxmoxClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxmoxClientBuilder")
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("realm", &self.realm)
            .field("config", &self.config)
            .finish()
    }
}

impl ProxmoxClientBuilder {
    /// Pre-fills a builder from `PROXMOX_API_TOKEN`, `PROXMOX_HOST`,
    /// `PROXMOX_PORT` and `PROXMOX_REALM`. Unset variables stay unset.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Configuration` if `PROXMOX_PORT` is not a port number.
    pub fn from_env() -> ProxmoxResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ProxmoxResult<Self> {
        let port = match lookup("PROXMOX_PORT") {
            Some(port) => Some(port.trim().parse::<u16>().map_err(|e| ValidationError::Field {
                field: "port".to_string(),
                message: format!("Invalid PROXMOX_PORT '{}': {}", port, e),
            })?),
            None => None,
        };

        Ok(Self {
            api_token: lookup("PROXMOX_API_TOKEN"),
            host: lookup("PROXMOX_HOST"),
            port,
            realm: lookup("PROXMOX_REALM"),
            config: ClientConfig::default(),
        })
    }

    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Defaults to 8006.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Defaults to `pam`.
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    /// Per-request timeout, 3 seconds unless set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    /// Whether `build` fires a background connectivity probe. On by default.
    pub fn probe_on_build(mut self, probe: bool) -> Self {
        self.config.probe_on_build = probe;
        self
    }

    /// Validates the configuration and creates the client.
    ///
    /// Validation completes before any I/O. When probing is enabled, a
    /// background request checks that the endpoint is reachable; its failure
    /// is logged and never fails the build.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Configuration` if the token or host is missing
    /// or empty, or if an explicit port, realm, timeout or rate limit is invalid.
    pub async fn build(self) -> ProxmoxResult<ProxmoxClient> {
        let api_token = ProxmoxApiToken::new(self.api_token.ok_or_else(|| {
            ValidationError::Field {
                field: "api_token".to_string(),
                message: "No API token provided".to_string(),
            }
        })?)?;

        let host = ProxmoxHost::new(self.host.ok_or_else(|| ValidationError::Field {
            field: "host".to_string(),
            message: "No host provided".to_string(),
        })?)?;

        let port = match self.port {
            Some(port) => ProxmoxPort::new(port)?,
            None => ProxmoxPort::default(),
        };

        let realm = match self.realm {
            Some(realm) => ProxmoxRealm::new(realm)?,
            None => ProxmoxRealm::default(),
        };

        self.config.validate()?;

        let url = ProxmoxUrl::new(&host, &port)?;
        let connection = Arc::new(ProxmoxConnection::new(host, port, realm, api_token, url));
        let transport = ApiClient::new(Arc::clone(&connection), &self.config)?;

        let client = ProxmoxClient {
            transport: Arc::new(transport),
            connection,
        };

        if self.config.probe_on_build {
            client.spawn_probe();
        }

        Ok(client)
    }
}

impl ProxmoxClient {
    /// Creates a new builder for ProxmoxClient configuration
    pub fn builder() -> ProxmoxClientBuilder {
        ProxmoxClientBuilder::default()
    }

    /// Returns the connection details this client was built with.
    pub fn connection(&self) -> &ProxmoxConnection {
        &self.connection
    }

    /// Checks that the API endpoint answers.
    ///
    /// # Errors
    /// Returns `ProxmoxError::Connectivity` carrying the host, the port and the
    /// transport failure when no HTTP response could be obtained.
    pub async fn check_connectivity(&self) -> ProxmoxResult<()> {
        self.transport.probe().await
    }

    fn spawn_probe(&self) {
        let transport = Arc::clone(&self.transport);
        let host = self.connection.proxmox_host().as_str().to_string();
        let port = self.connection.proxmox_port().get();

        tokio::spawn(async move {
            match transport.probe().await {
                Ok(()) => debug!(%host, port, "connectivity probe succeeded"),
                Err(error) => warn!(%host, port, %error, "connectivity probe failed"),
            }
        });
    }
}

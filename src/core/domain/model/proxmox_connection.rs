use crate::core::domain::value_object::{
    ProxmoxApiToken, ProxmoxHost, ProxmoxPort, ProxmoxRealm, ProxmoxUrl,
};

/// Immutable connection details of one Proxmox VE endpoint.
#[derive(Debug, Clone)]
pub struct ProxmoxConnection {
    proxmox_host: ProxmoxHost,
    proxmox_port: ProxmoxPort,
    proxmox_realm: ProxmoxRealm,
    proxmox_api_token: ProxmoxApiToken,
    proxmox_url: ProxmoxUrl,
}

impl ProxmoxConnection {
    pub fn new(
        proxmox_host: ProxmoxHost,
        proxmox_port: ProxmoxPort,
        proxmox_realm: ProxmoxRealm,
        proxmox_api_token: ProxmoxApiToken,
        proxmox_url: ProxmoxUrl,
    ) -> Self {
        Self {
            proxmox_host,
            proxmox_port,
            proxmox_realm,
            proxmox_api_token,
            proxmox_url,
        }
    }

    pub fn proxmox_host(&self) -> &ProxmoxHost {
        &self.proxmox_host
    }

    pub fn proxmox_port(&self) -> &ProxmoxPort {
        &self.proxmox_port
    }

    pub fn proxmox_realm(&self) -> &ProxmoxRealm {
        &self.proxmox_realm
    }

    pub fn proxmox_api_token(&self) -> &ProxmoxApiToken {
        &self.proxmox_api_token
    }

    pub fn proxmox_url(&self) -> &ProxmoxUrl {
        &self.proxmox_url
    }
}

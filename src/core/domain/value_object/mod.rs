mod proxmox_api_token;
mod proxmox_host;
mod proxmox_port;
mod proxmox_realm;
mod proxmox_uri;

pub use proxmox_api_token::ProxmoxApiToken;
pub use proxmox_host::ProxmoxHost;
pub use proxmox_port::ProxmoxPort;
pub use proxmox_realm::ProxmoxRealm;
pub use proxmox_uri::ProxmoxUrl;

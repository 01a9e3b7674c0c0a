//! Domain models for QEMU virtual machine operations.

use serde::{Deserialize, Serialize};

/// A virtual machine as returned by the `/nodes/{node}/qemu` endpoint.
///
/// The endpoint does not report the node; the client stamps `node` with the
/// name of the node that answered the listing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VmListItem {
    /// The VM identifier (unique per cluster).
    pub vmid: u32,
    /// The Proxmox node where this VM resides.
    #[serde(default)]
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Current status (e.g., "running", "stopped").
    #[serde(default)]
    pub status: String,
    /// CPU usage percentage (0.0 to 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    /// Memory usage in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<u64>,
    /// Uptime in seconds (if running).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Set when the VM is locked by a running operation (e.g. "backup", "snapshot").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<String>,
    /// Semicolon separated tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Caller-side description of a VM to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmSpec {
    /// Name of the new VM; "Untitled" when absent.
    pub name: Option<String>,
}

impl VmSpec {
    pub const DEFAULT_NAME: &'static str = "Untitled";

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Body of `POST /nodes/{node}/qemu`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CreateVmParams {
    pub vmid: u32,
    pub name: String,
}

/// Handle of an asynchronous PVE task started for one VM.
///
/// The client never waits for the task; `upid` identifies it for later inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmTask {
    pub vmid: u32,
    pub node: String,
    pub upid: String,
}

/// Power transitions exposed by `/nodes/{node}/qemu/{vmid}/status/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmAction {
    Start,
    Stop,
    Reboot,
    Shutdown,
}

impl VmAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            VmAction::Start => "start",
            VmAction::Stop => "stop",
            VmAction::Reboot => "reboot",
            VmAction::Shutdown => "shutdown",
        }
    }
}

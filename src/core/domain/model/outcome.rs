use crate::core::domain::error::ProxmoxError;

/// Result of one per-VM request inside a batch that reports each target individually.
#[derive(Debug)]
pub struct VmOutcome<T> {
    pub vmid: u32,
    pub node: String,
    pub result: Result<T, ProxmoxError>,
}

impl<T> VmOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

//! Domain models for VM snapshots.

use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Serialize};

const MAX_SNAPSHOT_NAME_LENGTH: usize = 40;

/// One entry of `/nodes/{node}/qemu/{vmid}/snapshot`.
///
/// PVE always includes a pseudo snapshot named `current` pointing at the live state.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SnapshotListItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Creation time in seconds since the UNIX epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snaptime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// 1 when the RAM state was saved along with the disks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmstate: Option<u8>,
}

/// Snapshot listing of a single VM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmSnapshots {
    pub vmid: u32,
    pub node: String,
    pub snapshots: Vec<SnapshotListItem>,
}

/// A value given either once for every VM or once per requested id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment<T> {
    /// Every VM receives the same value.
    Uniform(T),
    /// The VM at position `i` of the requested ids receives element `i`.
    PerId(Vec<T>),
}

impl<T> Assignment<T> {
    /// Picks the value for the id at `index` of the request.
    pub(crate) fn for_index(&self, index: usize) -> Option<&T> {
        match self {
            Assignment::Uniform(value) => Some(value),
            Assignment::PerId(values) => values.get(index),
        }
    }

    pub(crate) fn per_id_len(&self) -> Option<usize> {
        match self {
            Assignment::Uniform(_) => None,
            Assignment::PerId(values) => Some(values.len()),
        }
    }
}

impl From<&str> for Assignment<String> {
    fn from(value: &str) -> Self {
        Assignment::Uniform(value.to_string())
    }
}

impl From<String> for Assignment<String> {
    fn from(value: String) -> Self {
        Assignment::Uniform(value)
    }
}

impl From<Vec<String>> for Assignment<String> {
    fn from(values: Vec<String>) -> Self {
        Assignment::PerId(values)
    }
}

impl From<Vec<&str>> for Assignment<String> {
    fn from(values: Vec<&str>) -> Self {
        Assignment::PerId(values.into_iter().map(str::to_string).collect())
    }
}

/// Names and descriptions for a batch of new snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub name: Assignment<String>,
    pub description: Assignment<String>,
}

impl SnapshotRequest {
    pub const DEFAULT_NAME: &'static str = "snapshot";
    pub const DEFAULT_DESCRIPTION: &'static str = "Snapshot created by the client";

    pub fn new(name: impl Into<Assignment<String>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<Assignment<String>>) -> Self {
        self.description = description.into();
        self
    }
}

impl Default for SnapshotRequest {
    fn default() -> Self {
        Self {
            name: Assignment::Uniform(Self::DEFAULT_NAME.to_string()),
            description: Assignment::Uniform(Self::DEFAULT_DESCRIPTION.to_string()),
        }
    }
}

/// Body of `POST /nodes/{node}/qemu/{vmid}/snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CreateSnapshotParams {
    pub snapname: String,
    pub description: String,
}

/// Validates a snapshot name the way PVE does: a letter followed by letters,
/// digits, `-` or `_`, at most 40 characters. `current` is reserved.
pub(crate) fn validate_snapshot_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.len() > MAX_SNAPSHOT_NAME_LENGTH {
        return Err(ValidationError::Field {
            field: "snapname".to_string(),
            message: format!(
                "Snapshot name must be between 1 and {} characters",
                MAX_SNAPSHOT_NAME_LENGTH
            ),
        });
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic())
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::Format(format!(
            "Invalid snapshot name '{}'",
            name
        )));
    }
    if name == "current" {
        return Err(ValidationError::ConstraintViolation(
            "Snapshot name 'current' is reserved".to_string(),
        ));
    }
    Ok(())
}

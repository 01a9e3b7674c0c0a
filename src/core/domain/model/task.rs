//! Domain model for cluster task listings from `/cluster/tasks`.

use serde::{Deserialize, Serialize};

/// A task known to the cluster, running or recently finished.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskListItem {
    /// Unique process id, e.g. `UPID:pve1:0000A1B2:...:qmstart:100:root@pam:`.
    pub upid: String,
    pub node: String,
    /// Task type (e.g. "qmstart", "qmsnapshot", "vzdump").
    #[serde(rename = "type")]
    pub task_type: String,
    /// Object the task acts on, usually the vmid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user: String,
    /// Exit status ("OK" or an error message); absent while running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starttime: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endtime: Option<u64>,
}

impl TaskListItem {
    /// Returns true while the task has no end time.
    pub fn is_running(&self) -> bool {
        self.endtime.is_none()
    }
}

use crate::{ProxmoxClient, ProxmoxResult, TaskListItem};

impl ProxmoxClient {
    /// Lists every task the cluster knows about, unfiltered.
    pub async fn get_tasks(&self) -> ProxmoxResult<Vec<TaskListItem>> {
        self.get("cluster/tasks").await
    }
}

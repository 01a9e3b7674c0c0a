use crate::{NodeListItem, ProxmoxClient, ProxmoxResult};

impl ProxmoxClient {
    /// Lists the nodes of the cluster.
    ///
    /// With `ids`, only nodes whose name is listed are kept, in the order the
    /// server returned them. Names that match no node are ignored.
    pub async fn list_nodes(&self, ids: Option<&[&str]>) -> ProxmoxResult<Vec<NodeListItem>> {
        let nodes: Vec<NodeListItem> = self.get("nodes").await?;

        Ok(match ids {
            Some(ids) => nodes
                .into_iter()
                .filter(|node| ids.contains(&node.node.as_str()))
                .collect(),
            None => nodes,
        })
    }
}

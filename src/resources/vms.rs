use crate::{
    ProxmoxClient, ProxmoxResult, ValidationError, VmAction, VmListItem, VmOutcome, VmSpec,
    VmTask, core::domain::model::vm::CreateVmParams,
};
use futures::future::{join_all, try_join_all};
use tracing::{info, warn};

/// Highest vmid assumed when the cluster has no VM yet; PVE hands out ids from 100.
const VMID_FLOOR: u32 = 99;

/// Command PVE administrators run on a node to clear a stale VM lock.
const UNLOCK_COMMAND: &str = "qm unlock";

impl ProxmoxClient {
    /// Lists VMs across every node, sorted by vmid.
    ///
    /// All nodes are queried concurrently and each VM is stamped with the node
    /// that reported it. With `ids`, only those vmids are kept. If any node
    /// query fails, the whole call fails.
    pub async fn list_vms(&self, ids: Option<&[u32]>) -> ProxmoxResult<Vec<VmListItem>> {
        let nodes = self.list_nodes(None).await?;

        let per_node = try_join_all(nodes.iter().map(|node| self.node_vms(&node.node, ids))).await?;

        let mut vms: Vec<VmListItem> = per_node.into_iter().flatten().collect();
        vms.sort_by_key(|vm| vm.vmid);
        Ok(vms)
    }

    async fn node_vms(&self, node: &str, ids: Option<&[u32]>) -> ProxmoxResult<Vec<VmListItem>> {
        let mut vms: Vec<VmListItem> = self.get(&format!("nodes/{}/qemu", node)).await?;

        for vm in &mut vms {
            vm.node = node.to_string();
        }
        if let Some(ids) = ids {
            vms.retain(|vm| ids.contains(&vm.vmid));
        }

        Ok(vms)
    }

    /// Creates one VM per spec on `node` and returns their tasks in input order.
    ///
    /// The vmids are allocated client-side: spec `i` gets the current highest
    /// vmid plus `i + 1` (99 when the cluster is empty). Two callers creating
    /// VMs at the same time can collide.
    ///
    /// Every create request runs to completion. If any of them failed, the
    /// first failure is returned and the VMs that were created stay in place.
    pub async fn create_vms(&self, node: &str, specs: &[VmSpec]) -> ProxmoxResult<Vec<VmTask>> {
        if node.is_empty() {
            return Err(ValidationError::Field {
                field: "node".to_string(),
                message: "Target node cannot be empty".to_string(),
            }
            .into());
        }

        let highest = self
            .list_vms(None)
            .await?
            .iter()
            .map(|vm| vm.vmid)
            .max()
            .unwrap_or(VMID_FLOOR);

        let params = specs
            .iter()
            .zip(1u32..)
            .map(|(spec, offset)| -> Result<CreateVmParams, ValidationError> {
                let vmid = highest.checked_add(offset).ok_or_else(|| {
                    ValidationError::ConstraintViolation("vmid range exhausted".to_string())
                })?;
                Ok(CreateVmParams {
                    vmid,
                    name: spec
                        .name
                        .clone()
                        .unwrap_or_else(|| VmSpec::DEFAULT_NAME.to_string()),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        info!(node, count = params.len(), after_vmid = highest, "creating VMs");

        join_all(params.iter().map(|params| self.create_vm(node, params)))
            .await
            .into_iter()
            .collect()
    }

    async fn create_vm(&self, node: &str, params: &CreateVmParams) -> ProxmoxResult<VmTask> {
        let upid: String = self.post(&format!("nodes/{}/qemu", node), params).await?;
        Ok(VmTask {
            vmid: params.vmid,
            node: node.to_string(),
            upid,
        })
    }

    /// Deletes the listed VMs and reports the outcome of each one.
    ///
    /// Targets are resolved to their node first; ids that match no VM produce
    /// no outcome. Only a failure to resolve the targets fails the call itself.
    pub async fn delete_vms(&self, ids: &[u32]) -> ProxmoxResult<Vec<VmOutcome<VmTask>>> {
        let targets: Vec<VmListItem> = self
            .list_vms(Some(ids))
            .await?
            .into_iter()
            .filter(|vm| ids.contains(&vm.vmid))
            .collect();

        let outcomes = join_all(targets.iter().map(|vm| async move {
            VmOutcome {
                vmid: vm.vmid,
                node: vm.node.clone(),
                result: self.delete_vm(vm).await,
            }
        }))
        .await;

        let mut failed = 0usize;
        for outcome in &outcomes {
            if let Err(error) = &outcome.result {
                failed += 1;
                warn!(vmid = outcome.vmid, node = %outcome.node, %error, "failed to delete VM");
            }
        }
        if failed > 0 {
            warn!(failed, total = outcomes.len(), "VM deletion batch incomplete");
        }

        Ok(outcomes)
    }

    async fn delete_vm(&self, vm: &VmListItem) -> ProxmoxResult<VmTask> {
        let upid: String = self
            .delete(&format!("nodes/{}/qemu/{}", vm.node, vm.vmid))
            .await?;
        Ok(VmTask {
            vmid: vm.vmid,
            node: vm.node.clone(),
            upid,
        })
    }

    /// Starts the listed VMs. Returns once PVE has accepted each start task.
    pub async fn start_vms(&self, ids: &[u32]) -> ProxmoxResult<Vec<VmTask>> {
        self.change_status(ids, VmAction::Start).await
    }

    /// Hard-stops the listed VMs.
    pub async fn stop_vms(&self, ids: &[u32]) -> ProxmoxResult<Vec<VmTask>> {
        self.change_status(ids, VmAction::Stop).await
    }

    pub async fn reboot_vms(&self, ids: &[u32]) -> ProxmoxResult<Vec<VmTask>> {
        self.change_status(ids, VmAction::Reboot).await
    }

    /// Asks the guests of the listed VMs to power off through ACPI.
    pub async fn shutdown_vms(&self, ids: &[u32]) -> ProxmoxResult<Vec<VmTask>> {
        self.change_status(ids, VmAction::Shutdown).await
    }

    /// Fires `action` on every resolved VM concurrently.
    ///
    /// Tasks come back in vmid order. All requests run to completion; the
    /// first failure, if any, is returned.
    pub async fn change_status(&self, ids: &[u32], action: VmAction) -> ProxmoxResult<Vec<VmTask>> {
        let vms = self.list_vms(Some(ids)).await?;
        info!(action = action.as_str(), count = vms.len(), "changing VM status");

        join_all(vms.iter().map(|vm| self.post_status(vm, action)))
            .await
            .into_iter()
            .collect()
    }

    async fn post_status(&self, vm: &VmListItem, action: VmAction) -> ProxmoxResult<VmTask> {
        let path = format!("nodes/{}/qemu/{}/status/{}", vm.node, vm.vmid, action.as_str());
        let upid: String = self.post(&path, &()).await?;
        Ok(VmTask {
            vmid: vm.vmid,
            node: vm.node.clone(),
            upid,
        })
    }

    /// Builds a `;`-separated shell line that unlocks every VM of the cluster
    /// (`qm unlock <vmid>` per VM, in vmid order).
    ///
    /// Nothing is unlocked here; the line is meant to be run on a node.
    pub async fn unlock_commands(&self) -> ProxmoxResult<String> {
        let vms = self.list_vms(None).await?;

        Ok(vms
            .iter()
            .map(|vm| format!("{} {}", UNLOCK_COMMAND, vm.vmid))
            .collect::<Vec<_>>()
            .join(";"))
    }
}

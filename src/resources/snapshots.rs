use crate::{
    ProxmoxClient, ProxmoxError, ProxmoxResult, SnapshotRequest, ValidationError, VmListItem,
    VmSnapshots, VmTask,
    core::domain::model::snapshot::{CreateSnapshotParams, validate_snapshot_name},
};
use futures::future::{join_all, try_join_all};
use tracing::info;

impl ProxmoxClient {
    /// Lists the snapshots of every resolved VM, in vmid order.
    pub async fn get_snapshots(&self, ids: &[u32]) -> ProxmoxResult<Vec<VmSnapshots>> {
        let vms = self.list_vms(Some(ids)).await?;

        try_join_all(vms.into_iter().map(|vm| async move {
            let snapshots = self
                .get(&format!("nodes/{}/qemu/{}/snapshot", vm.node, vm.vmid))
                .await?;
            Ok::<_, ProxmoxError>(VmSnapshots {
                vmid: vm.vmid,
                node: vm.node,
                snapshots,
            })
        }))
        .await
    }

    /// Snapshots every resolved VM.
    ///
    /// A `PerId` name or description is matched by position against `ids`:
    /// the VM whose vmid is `ids[i]` receives element `i`, whatever order the
    /// VMs are resolved in, so `ids` must not repeat a vmid in that case.
    /// Names are validated before any request is sent.
    ///
    /// All requests run to completion; the first failure, if any, is returned
    /// and snapshots already taken are kept.
    pub async fn create_snapshots(
        &self,
        ids: &[u32],
        request: &SnapshotRequest,
    ) -> ProxmoxResult<Vec<VmTask>> {
        for (field, len) in [
            ("snapname", request.name.per_id_len()),
            ("description", request.description.per_id_len()),
        ] {
            if let Some(len) = len.filter(|len| *len != ids.len()) {
                return Err(ValidationError::Field {
                    field: field.to_string(),
                    message: format!("Expected {} values, one per id, got {}", ids.len(), len),
                }
                .into());
            }
        }

        let per_id =
            request.name.per_id_len().is_some() || request.description.per_id_len().is_some();
        if per_id {
            if let Some(duplicate) = ids
                .iter()
                .enumerate()
                .find_map(|(index, id)| ids[..index].contains(id).then_some(*id))
            {
                return Err(ValidationError::Field {
                    field: "ids".to_string(),
                    message: format!(
                        "vmid {} is listed more than once; per-id values need distinct ids",
                        duplicate
                    ),
                }
                .into());
            }
        }

        let params = (0..ids.len())
            .map(|index| -> Result<CreateSnapshotParams, ValidationError> {
                let snapname = request.name.for_index(index).cloned().unwrap_or_default();
                validate_snapshot_name(&snapname)?;
                Ok(CreateSnapshotParams {
                    snapname,
                    description: request
                        .description
                        .for_index(index)
                        .cloned()
                        .unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let vms = self.list_vms(Some(ids)).await?;
        info!(count = vms.len(), "creating snapshots");

        join_all(vms.iter().filter_map(|vm| {
            let index = ids.iter().position(|id| *id == vm.vmid)?;
            Some(self.create_snapshot(vm, &params[index]))
        }))
        .await
        .into_iter()
        .collect()
    }

    async fn create_snapshot(
        &self,
        vm: &VmListItem,
        params: &CreateSnapshotParams,
    ) -> ProxmoxResult<VmTask> {
        let upid: String = self
            .post(&format!("nodes/{}/qemu/{}/snapshot", vm.node, vm.vmid), params)
            .await?;
        Ok(VmTask {
            vmid: vm.vmid,
            node: vm.node.clone(),
            upid,
        })
    }
}

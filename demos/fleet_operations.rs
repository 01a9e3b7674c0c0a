//! Fleet-wide operations using the Proxmox client.
//!
//! Reads the connection from `PROXMOX_*` environment variables (a `.env`
//! file is not loaded here), lists the cluster, and snapshots every VM.
//!
//! ```sh
//! PROXMOX_API_TOKEN='root@pam!fleet=...' PROXMOX_HOST=pve.lan \
//!     RUST_LOG=proxmox_fleet=debug cargo run --example fleet_operations
//! ```

use proxmox_fleet::{ProxmoxClientBuilder, ProxmoxResult, SnapshotRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ProxmoxResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = ProxmoxClientBuilder::from_env()?
        .probe_on_build(false)
        .build()
        .await?;

    client.check_connectivity().await?;
    println!("Connected to {}", client.connection().proxmox_url().as_str());

    // 1. Nodes.
    let nodes = client.list_nodes(None).await?;
    println!("\n{} node(s):", nodes.len());
    for node in &nodes {
        println!(
            "  - {} ({}) CPU: {:.1}%, Mem: {:.1}/{:.1} GB",
            node.node,
            node.status,
            node.cpu.unwrap_or(0.0) * 100.0,
            node.mem.unwrap_or(0) as f64 / 1024.0 / 1024.0 / 1024.0,
            node.maxmem.unwrap_or(0) as f64 / 1024.0 / 1024.0 / 1024.0,
        );
    }

    // 2. VMs across the cluster.
    let vms = client.list_vms(None).await?;
    println!("\n{} VM(s):", vms.len());
    for vm in &vms {
        println!(
            "  - {} {} on {}: {}{}",
            vm.vmid,
            vm.name.as_deref().unwrap_or("-"),
            vm.node,
            vm.status,
            vm.lock
                .as_deref()
                .map(|lock| format!(" (locked: {})", lock))
                .unwrap_or_default()
        );
    }

    if vms.is_empty() {
        println!("Nothing to snapshot.");
        return Ok(());
    }

    // 3. Snapshot everything with one name, then show the result.
    let ids: Vec<u32> = vms.iter().map(|vm| vm.vmid).collect();
    let tasks = client
        .create_snapshots(&ids, &SnapshotRequest::new("fleet-demo"))
        .await?;
    for task in &tasks {
        println!("Snapshot task for {}: {}", task.vmid, task.upid);
    }

    for listing in client.get_snapshots(&ids).await? {
        let names: Vec<_> = listing.snapshots.iter().map(|s| s.name.as_str()).collect();
        println!("  {} -> {}", listing.vmid, names.join(", "));
    }

    // 4. Recent tasks and the unlock line for stuck VMs.
    let running = client
        .get_tasks()
        .await?
        .into_iter()
        .filter(|task| task.is_running())
        .count();
    println!("\n{} task(s) still running", running);
    println!("To clear stale locks, run on a node:\n  {}", client.unlock_commands().await?);

    Ok(())
}

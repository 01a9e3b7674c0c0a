use crate::{
    ProxmoxError, VmSpec,
    tests::{create_test_client, mount_node_vms, mount_nodes},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_fleet(mock_server: &MockServer) {
    mount_nodes(mock_server, &["pve1", "pve2"]).await;
    mount_node_vms(
        mock_server,
        "pve1",
        serde_json::json!([
            { "vmid": 105, "name": "db", "status": "running", "maxmem": 4294967296u64 },
            { "vmid": 101, "name": "web", "status": "stopped" }
        ]),
    )
    .await;
    mount_node_vms(
        mock_server,
        "pve2",
        serde_json::json!([{ "vmid": 103, "name": "cache", "status": "running", "lock": "backup" }]),
    )
    .await;
}

fn upid(node: &str, kind: &str, vmid: u32) -> String {
    format!("UPID:{}:00001234:00ABCDEF:66F00000:{}:{}:root@pam!fleet:", node, kind, vmid)
}

async fn mount_task(mock_server: &MockServer, http_method: &str, url: &str, task: String) {
    Mock::given(method(http_method))
        .and(path(url))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": task })))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_list_vms_sorted_and_stamped() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    let vms = client.list_vms(None).await.unwrap();

    let placement: Vec<_> = vms.iter().map(|vm| (vm.vmid, vm.node.as_str())).collect();
    assert_eq!(placement, vec![(101, "pve1"), (103, "pve2"), (105, "pve1")]);
    assert_eq!(vms[1].lock.as_deref(), Some("backup"));
    assert_eq!(vms[2].maxmem, Some(4294967296));
}

#[tokio::test]
async fn test_list_vms_filter_by_ids() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_nodes(&mock_server, &["pve1", "pve2"]).await;
    mount_node_vms(&mock_server, "pve1", serde_json::json!([{ "vmid": 9 }, { "vmid": 3 }])).await;
    mount_node_vms(&mock_server, "pve2", serde_json::json!([{ "vmid": 7 }, { "vmid": 5 }])).await;

    let vms = client.list_vms(Some(&[5, 9, 42])).await.unwrap();

    let ids: Vec<_> = vms.iter().map(|vm| vm.vmid).collect();
    assert_eq!(ids, vec![5, 9]);
    assert_eq!(vms[0].node, "pve2");
    assert_eq!(vms[1].node, "pve1");
}

#[tokio::test]
async fn test_list_vms_fails_when_one_node_fails() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_nodes(&mock_server, &["pve1", "pve2"]).await;
    mount_node_vms(&mock_server, "pve1", serde_json::json!([{ "vmid": 100 }])).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve2/qemu"))
        .respond_with(ResponseTemplate::new(595).set_body_string("no route to host"))
        .mount(&mock_server)
        .await;

    let result = client.list_vms(None).await;
    match result {
        Err(ProxmoxError::Request(err)) => assert_eq!(err.status(), Some(595)),
        other => panic!("Expected request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_vms_allocates_after_highest_vmid() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve2/qemu"))
        .and(body_json(serde_json::json!({ "vmid": 106, "name": "a" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": upid("pve2", "qmcreate", 106) })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve2/qemu"))
        .and(body_json(serde_json::json!({ "vmid": 107, "name": "Untitled" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": upid("pve2", "qmcreate", 107) })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let tasks = client
        .create_vms("pve2", &[VmSpec::named("a"), VmSpec::default()])
        .await
        .unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].vmid, 106);
    assert_eq!(tasks[0].upid, upid("pve2", "qmcreate", 106));
    assert_eq!(tasks[1].vmid, 107);
    assert!(tasks.iter().all(|task| task.node == "pve2"));
}

#[tokio::test]
async fn test_create_vms_on_empty_cluster_starts_at_100() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_nodes(&mock_server, &["pve1"]).await;
    mount_node_vms(&mock_server, "pve1", serde_json::json!([])).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu"))
        .and(body_json(serde_json::json!({ "vmid": 100, "name": "first" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": upid("pve1", "qmcreate", 100) })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let tasks = client
        .create_vms("pve1", &[VmSpec::named("first")])
        .await
        .unwrap();
    assert_eq!(tasks[0].vmid, 100);
}

#[tokio::test]
async fn test_create_vms_reports_failure_after_all_requests() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu"))
        .and(body_json(serde_json::json!({ "vmid": 106, "name": "ok" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": upid("pve1", "qmcreate", 106) })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu"))
        .and(body_json(serde_json::json!({ "vmid": 107, "name": "dup" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("VM 107 already exists"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client
        .create_vms("pve1", &[VmSpec::named("ok"), VmSpec::named("dup")])
        .await;
    match result {
        Err(ProxmoxError::Request(err)) => assert_eq!(err.status(), Some(500)),
        other => panic!("Expected request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_vms_rejects_empty_node() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client.create_vms("", &[VmSpec::default()]).await;
    assert!(matches!(result, Err(ProxmoxError::Configuration(_))));
}

#[tokio::test]
async fn test_delete_vms_unknown_id_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcomes = client.delete_vms(&[999]).await.unwrap();
    assert!(outcomes.is_empty());
}

#[tokio::test]
async fn test_delete_vms_reports_each_outcome() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    mount_task(
        &mock_server,
        "DELETE",
        "/api2/json/nodes/pve1/qemu/101",
        upid("pve1", "qmdestroy", 101),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api2/json/nodes/pve2/qemu/103"))
        .respond_with(ResponseTemplate::new(500).set_body_string("VM is locked (backup)"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcomes = client.delete_vms(&[103, 101]).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].vmid, 101);
    assert!(outcomes[0].is_ok());
    assert_eq!(
        outcomes[0].result.as_ref().unwrap().upid,
        upid("pve1", "qmdestroy", 101)
    );

    assert_eq!(outcomes[1].vmid, 103);
    assert_eq!(outcomes[1].node, "pve2");
    assert!(!outcomes[1].is_ok());
}

#[tokio::test]
async fn test_start_vms() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    mount_task(
        &mock_server,
        "POST",
        "/api2/json/nodes/pve1/qemu/101/status/start",
        upid("pve1", "qmstart", 101),
    )
    .await;
    mount_task(
        &mock_server,
        "POST",
        "/api2/json/nodes/pve2/qemu/103/status/start",
        upid("pve2", "qmstart", 103),
    )
    .await;

    let tasks = client.start_vms(&[103, 101]).await.unwrap();
    let ids: Vec<_> = tasks.iter().map(|task| task.vmid).collect();
    assert_eq!(ids, vec![101, 103]);
    assert_eq!(tasks[1].upid, upid("pve2", "qmstart", 103));
}

#[tokio::test]
async fn test_stop_vms() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    mount_task(
        &mock_server,
        "POST",
        "/api2/json/nodes/pve1/qemu/105/status/stop",
        upid("pve1", "qmstop", 105),
    )
    .await;

    let tasks = client.stop_vms(&[105]).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].node, "pve1");
}

#[tokio::test]
async fn test_reboot_vms() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    mount_task(
        &mock_server,
        "POST",
        "/api2/json/nodes/pve2/qemu/103/status/reboot",
        upid("pve2", "qmreboot", 103),
    )
    .await;

    let tasks = client.reboot_vms(&[103]).await.unwrap();
    assert_eq!(tasks[0].upid, upid("pve2", "qmreboot", 103));
}

#[tokio::test]
async fn test_shutdown_vms() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    mount_task(
        &mock_server,
        "POST",
        "/api2/json/nodes/pve1/qemu/101/status/shutdown",
        upid("pve1", "qmshutdown", 101),
    )
    .await;

    let tasks = client.shutdown_vms(&[101]).await.unwrap();
    assert_eq!(tasks[0].vmid, 101);
}

#[tokio::test]
async fn test_status_change_with_no_match_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_fleet(&mock_server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    assert!(client.start_vms(&[]).await.unwrap().is_empty());
    assert!(client.stop_vms(&[4242]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unlock_commands() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_nodes(&mock_server, &["pve1", "pve2"]).await;
    mount_node_vms(&mock_server, "pve1", serde_json::json!([{ "vmid": 30 }, { "vmid": 7 }])).await;
    mount_node_vms(&mock_server, "pve2", serde_json::json!([{ "vmid": 12 }])).await;

    let commands = client.unlock_commands().await.unwrap();
    assert_eq!(commands, "qm unlock 7;qm unlock 12;qm unlock 30");
}

#[tokio::test]
async fn test_unlock_commands_empty_cluster() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_nodes(&mock_server, &["pve1"]).await;
    mount_node_vms(&mock_server, "pve1", serde_json::json!([])).await;

    assert_eq!(client.unlock_commands().await.unwrap(), "");
}

use crate::tests::create_test_client;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_get_tasks() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api2/json/cluster/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "upid": "UPID:pve1:0000A1B2:01234567:66F00000:qmstart:101:root@pam!fleet:",
                    "node": "pve1",
                    "type": "qmstart",
                    "id": "101",
                    "user": "root@pam!fleet",
                    "status": "OK",
                    "starttime": 1727000000,
                    "endtime": 1727000003
                },
                {
                    "upid": "UPID:pve2:0000C3D4:89ABCDEF:66F00010:vzdump:103:root@pam:",
                    "node": "pve2",
                    "type": "vzdump",
                    "id": "103",
                    "user": "root@pam",
                    "starttime": 1727000016
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tasks = client.get_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);

    assert_eq!(tasks[0].task_type, "qmstart");
    assert_eq!(tasks[0].status.as_deref(), Some("OK"));
    assert!(!tasks[0].is_running());

    assert_eq!(tasks[1].node, "pve2");
    assert!(tasks[1].status.is_none());
    assert!(tasks[1].is_running());
}

#[tokio::test]
async fn test_get_tasks_empty_cluster() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api2/json/cluster/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&mock_server)
        .await;

    assert!(client.get_tasks().await.unwrap().is_empty());
}

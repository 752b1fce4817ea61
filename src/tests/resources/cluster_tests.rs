use crate::{
    ErrorKind, OperationContext, ResourceStatus, WaitMode,
    model::IksCreateRequest,
    provider::{
        DataSource, Resource, Severity,
        clusters_data_source::{ClustersConfig, KubernetesClustersDataSource},
        iks_cluster_resource::{IksClusterPlan, IksClusterResource},
    },
    tests::common::{account_path, create_test_client},
};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

fn cluster_document(state: &str) -> serde_json::Value {
    json!({
        "uuid": "c-1",
        "name": "demo",
        "clusterstate": state,
        "k8sversion": "1.28",
        "network": {"enableloadbalancer": true},
        "nodegroups": null,
        "storages": null,
        "vips": null
    })
}

fn request() -> IksCreateRequest {
    IksCreateRequest {
        name: "demo".to_string(),
        count: 1,
        k8s_version: "1.28".to_string(),
        instance_type: "vm-spr-sml".to_string(),
        runtime_name: "Containerd".to_string(),
    }
}

fn plan() -> IksClusterPlan {
    IksClusterPlan {
        name: "demo".to_string(),
        kubernetes_version: "1.28".to_string(),
        count: 1,
        instance_type: "vm-spr-sml".to_string(),
        runtime_name: "Containerd".to_string(),
        detached: false,
    }
}

async fn mount_create(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(account_path("/iks/clusters")))
        .and(body_partial_json(json!({
            "name": "demo",
            "k8sversionname": "1.28",
            "runtimename": "Containerd"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_document("Pending")))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn mount_get_once(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(response)
        .up_to_n_times(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_create_cluster_polls_until_active() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    for state in ["Pending", "Provisioning", "Active"] {
        mount_get_once(
            &mock_server,
            ResponseTemplate::new(200).set_body_json(cluster_document(state)),
        )
        .await;
    }

    let started = Instant::now();
    let cluster = client
        .create_cluster(&OperationContext::new(), &request(), WaitMode::Wait)
        .await
        .unwrap();

    assert_eq!(cluster.resource_id, "c-1");
    assert_eq!(cluster.cluster_state, "Active");
    // Two sleeps between three reads.
    assert!(started.elapsed() >= Duration::from_millis(20));
    assert_eq!(
        mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == "GET")
            .count(),
        3
    );
}

#[tokio::test]
async fn test_terminal_failure_keeps_partial_state() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_document("Failed")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = IksClusterResource::new(client)
        .create(&OperationContext::new(), plan())
        .await;

    assert!(outcome.has_error());
    let state = outcome.state.unwrap();
    assert_eq!(state.observed.id, "c-1");
    assert_eq!(state.observed.status, ResourceStatus::Provisioning);
    let diagnostic = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.summary, "Error waiting for iks cluster c-1");
    assert!(diagnostic.detail.contains("Failed"));
}

#[tokio::test]
async fn test_terminal_failure_error_kind() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    mount_get_once(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(cluster_document("Failed")),
    )
    .await;

    let err = client
        .create_cluster(&OperationContext::new(), &request(), WaitMode::Wait)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StateFailed);
}

#[tokio::test]
async fn test_server_error_during_poll_is_retried() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    mount_get_once(&mock_server, ResponseTemplate::new(503)).await;
    mount_get_once(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(cluster_document("Active")),
    )
    .await;

    let cluster = client
        .create_cluster(&OperationContext::new(), &request(), WaitMode::Wait)
        .await
        .unwrap();
    assert_eq!(cluster.cluster_state, "Active");
}

#[tokio::test]
async fn test_client_error_during_poll_is_terminal() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "denied"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client
        .create_cluster(&OperationContext::new(), &request(), WaitMode::Wait)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_detached_create_reads_once_and_warns() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_document("Pending")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = IksClusterResource::new(client)
        .create(
            &OperationContext::new(),
            IksClusterPlan {
                detached: true,
                ..plan()
            },
        )
        .await;

    assert!(!outcome.has_error());
    let state = outcome.state.unwrap();
    assert!(state.detached);
    assert_eq!(state.observed.status, ResourceStatus::Provisioning);
    assert_eq!(
        outcome.diagnostics.iter().next().unwrap().severity,
        Severity::Warning
    );
}

#[tokio::test]
async fn test_empty_uuid_fails_before_any_request() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client
        .get_cluster(&OperationContext::new(), "")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Template);
}

#[tokio::test]
async fn test_create_then_read_keeps_identity() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_document("Active")))
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = IksClusterResource::new(client);
    let created = resource.create(&ctx, plan()).await.state.unwrap();
    let read = resource.read(&ctx, created.clone()).await.state.unwrap();

    assert_eq!(read.observed.id, created.observed.id);
    assert_eq!(read.kubernetes_version, "1.28");
    assert_eq!(read.observed.status, ResourceStatus::Active);
}

#[tokio::test]
async fn test_delete_of_missing_cluster_succeeds() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("DELETE"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    client
        .delete_cluster(&OperationContext::new(), "c-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_clusters_data_source_lists_load_balancers() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "clusters": [cluster_document("Active")]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/vips")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [
                {"vipid": 7, "name": "web", "port": 443, "viptype": "public",
                 "vipstate": "Active", "vipip": "10.1.1.1", "poolport": 30443}
            ]
        })))
        .mount(&mock_server)
        .await;

    let outcome = KubernetesClustersDataSource::new(client)
        .read(&OperationContext::new(), ClustersConfig::default())
        .await;

    let state = outcome.state.unwrap();
    assert_eq!(state.cloudaccount, "123456789012");
    assert_eq!(state.clusters.len(), 1);
    assert_eq!(state.clusters[0].observed.id, "c-1");
    assert_eq!(state.clusters[0].load_balancers[0].vip_ip, "10.1.1.1");
    assert_eq!(
        state.clusters[0].load_balancers[0].status,
        ResourceStatus::Active
    );
}

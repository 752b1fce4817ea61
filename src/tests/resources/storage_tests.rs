use crate::{
    ErrorKind, OperationContext, ResourceStatus,
    model::IksStorageCreateRequest,
    provider::{
        Resource, Severity,
        cluster_storage_resource::{ClusterStoragePlan, ClusterStorageResource},
    },
    tests::common::{account_path, create_test_client},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn cluster_with_storages(storages: serde_json::Value) -> serde_json::Value {
    json!({
        "uuid": "c-1",
        "name": "demo",
        "clusterstate": "Active",
        "storageenabled": true,
        "storages": storages
    })
}

async fn mount_submit(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(account_path("/iks/clusters/c-1/storage")))
        .and(body_json(json!({"enablestorage": true, "storagesize": "30GB"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "storageprovider": "weka",
            "size": "30GB",
            "state": "Pending"
        })))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_storage_poll_scans_past_other_sizes() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_submit(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_with_storages(json!([
            {"storageprovider": "weka", "size": "10GB", "state": "Pending"}
        ]))))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_with_storages(json!([
            {"storageprovider": "weka", "size": "10GB", "state": "Pending"},
            {"storageprovider": "weka", "size": "30gb", "state": "Active"}
        ]))))
        .mount(&mock_server)
        .await;

    let storage = client
        .create_storage(
            &OperationContext::new(),
            "c-1",
            &IksStorageCreateRequest {
                enable: true,
                size: "30GB".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(storage.size, "30gb");
    assert_eq!(storage.state, "Active");
}

#[tokio::test]
async fn test_failed_storage_is_terminal() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_submit(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_with_storages(json!([
            {"storageprovider": "weka", "size": "30GB", "state": "Failed"}
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = ClusterStorageResource::new(client)
        .create(
            &OperationContext::new(),
            ClusterStoragePlan {
                cluster_uuid: "c-1".to_string(),
                size: "30GB".to_string(),
            },
        )
        .await;

    assert!(outcome.has_error());
    let partial = outcome.state.unwrap();
    assert_eq!(partial.id, "c-1/30GB");
    assert!(outcome.diagnostics.iter().next().unwrap().detail.contains("c-1/30GB"));
}

#[tokio::test]
async fn test_invalid_size_is_an_attribute_error() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = ClusterStorageResource::new(client)
        .create(
            &OperationContext::new(),
            ClusterStoragePlan {
                cluster_uuid: "c-1".to_string(),
                size: "thirty".to_string(),
            },
        )
        .await;

    assert!(outcome.state.is_none());
    assert_eq!(
        outcome.diagnostics.iter().next().unwrap().attribute.as_deref(),
        Some("size")
    );
}

#[tokio::test]
async fn test_read_and_delete_storage() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_with_storages(json!([
            {"storageprovider": "weka", "size": "30GB", "state": "Active"}
        ]))))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = ClusterStorageResource::new(client);

    let imported = resource.import(&ctx, "c-1/30GB").await.state.unwrap();
    assert_eq!(imported.provider, "weka");
    assert_eq!(imported.status, ResourceStatus::Active);

    let read = resource.read(&ctx, imported.clone()).await.state.unwrap();
    assert_eq!(read.id, imported.id);

    let missing = resource.import(&ctx, "c-1/40GB").await;
    assert!(missing.has_error());

    let deleted = resource.delete(&ctx, read).await;
    assert!(deleted.state.is_none());
    let warning = deleted.diagnostics.iter().next().unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert!(warning.detail.contains("c-1"));
}

#[tokio::test]
async fn test_read_when_parent_is_gone_clears_state() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let err = client.get_cluster(&ctx, "c-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let outcome = ClusterStorageResource::new(client)
        .import(&ctx, "c-1/30GB")
        .await;
    assert!(outcome.state.is_none());
}

#[tokio::test]
async fn test_lowercase_size_survives_update() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_submit(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_with_storages(json!([
            {"storageprovider": "weka", "size": "30GB", "state": "Active"}
        ]))))
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = ClusterStorageResource::new(client);
    let plan = ClusterStoragePlan {
        cluster_uuid: "c-1".to_string(),
        size: "30gb".to_string(),
    };

    let created = resource.create(&ctx, plan.clone()).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let created = created.state.unwrap();
    assert_eq!(created.size, "30gb");
    assert_eq!(created.id, "c-1/30GB");

    let updated = resource.update(&ctx, created.clone(), plan).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(updated.state.unwrap(), created);
}

#[tokio::test]
async fn test_storage_poll_follows_accepted_size() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/iks/clusters/c-1/storage")))
        .and(body_json(json!({"enablestorage": true, "storagesize": "1TB"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "storageprovider": "weka",
            "size": "1024GB",
            "state": "Pending"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cluster_with_storages(json!([
            {"storageprovider": "weka", "size": "1024GB", "state": "Active"}
        ]))))
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = ClusterStorageResource::new(client);
    let created = resource
        .create(
            &ctx,
            ClusterStoragePlan {
                cluster_uuid: "c-1".to_string(),
                size: "1TB".to_string(),
            },
        )
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let created = created.state.unwrap();
    assert_eq!(created.id, "c-1/1024GB");
    assert_eq!(created.size, "1TB");
    assert_eq!(created.status, ResourceStatus::Active);

    let read = resource.read(&ctx, created.clone()).await.state.unwrap();
    assert_eq!(read, created);
}

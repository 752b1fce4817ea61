use crate::{
    ErrorKind, OperationContext, ResourceStatus,
    provider::{
        DynResource, JsonResource, Resource, Severity,
        filesystem_resource::{FilesystemPlan, FilesystemResource},
    },
    tests::common::{TOKEN, account_path, create_test_client},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn filesystem_document(phase: &str, size: &str) -> serde_json::Value {
    json!({
        "metadata": {"resourceId": "r-1", "cloudAccountId": "123456789012", "name": "fs1"},
        "spec": {
            "request": {"storage": size},
            "storageClass": "GeneralPurpose",
            "accessModes": "ReadWrite",
            "filesystemType": "ComputeGeneral",
            "instanceType": "storage-file",
            "Encrypted": true,
            "availabilityZone": "us-dev-1a"
        },
        "status": {
            "phase": phase,
            "mount": {
                "clusterAddr": "10.0.0.1",
                "clusterVersion": "4.2",
                "namespace": "ns-1",
                "filesystemName": "fs1",
                "username": "admin",
                "password": "hunter2"
            }
        }
    })
}

fn plan() -> FilesystemPlan {
    FilesystemPlan {
        name: "fs1".to_string(),
        description: String::new(),
        size_in_tb: 2,
        access_mode: "ReadWrite".to_string(),
        encrypted: true,
    }
}

#[tokio::test]
async fn test_create_filesystem_happy_path() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/filesystems")))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(body_partial_json(json!({
            "metadata": {"name": "fs1"},
            "spec": {
                "request": {"storage": "2TB"},
                "availabilityZone": "us-dev-1a",
                "accessModes": "ReadWrite",
                "Encrypted": true,
                "storageClass": "GeneralPurpose",
                "instanceType": "storage-file"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSReady", "2TB")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = FilesystemResource::new(client);
    let outcome = resource.create(&OperationContext::new(), plan()).await;

    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let state = outcome.state.unwrap();
    assert_eq!(state.id, "r-1");
    assert_eq!(state.status, ResourceStatus::Ready);
    assert_eq!(state.availability_zone, "us-dev-1a");
    assert_eq!(state.cluster_info.cluster_address, "10.0.0.1");
    assert_eq!(state.access_info.username, "admin");
    assert_eq!(state.size_in_tb, 2);
}

#[tokio::test]
async fn test_multibyte_server_size_falls_back_to_plan() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/filesystems")))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSReady", "2€")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/filesystems/id/r-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSReady", "€€€")))
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = FilesystemResource::new(client);
    let created = resource.create(&ctx, plan()).await;
    assert!(!created.has_error(), "{:?}", created.diagnostics);
    let created = created.state.unwrap();
    assert_eq!(created.size_in_tb, 2);
    assert_eq!(created.size_in_gb, 2048);

    let read = resource.read(&ctx, created).await.state.unwrap();
    assert_eq!(read.size_in_tb, 2);
    assert_eq!(read.size_in_gb, 2048);
}

#[tokio::test]
async fn test_oversized_plan_saturates_gigabytes() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/filesystems")))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSProvisioning", "")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let huge = FilesystemPlan {
        size_in_tb: 1 << 60,
        ..plan()
    };
    let state = FilesystemResource::new(client)
        .create(&OperationContext::new(), huge)
        .await
        .state
        .unwrap();
    assert_eq!(state.size_in_tb, 1 << 60);
    assert_eq!(state.size_in_gb, u64::MAX);
}

#[tokio::test]
async fn test_read_converts_server_gigabytes() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/filesystems")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(filesystem_document("FSProvisioning", "2TB")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/filesystems/id/r-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSReady", "2048GB")))
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = FilesystemResource::new(client);
    let created = resource.create(&ctx, plan()).await.state.unwrap();
    assert_eq!(created.status, ResourceStatus::Provisioning);

    let read = resource.read(&ctx, created.clone()).await.state.unwrap();
    assert_eq!(read.id, created.id);
    assert_eq!(read.status, ResourceStatus::Ready);
    assert_eq!(read.size_in_tb, 2);
    assert_eq!(read.size_in_gb, 2048);
}

#[tokio::test]
async fn test_read_of_deleted_filesystem_clears_state() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path(account_path("/filesystems/id/r-1")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "filesystem not found"})))
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let err = client.get_filesystem(&ctx, "r-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("filesystem not found"));

    let resource = JsonResource(FilesystemResource::new(client));
    let outcome = resource
        .read(
            &ctx,
            json!({
                "id": "r-1",
                "cloudaccount": "123456789012",
                "name": "fs1",
                "description": "",
                "size_in_tb": 2,
                "size_in_gb": 2048,
                "access_mode": "ReadWrite",
                "encrypted": true,
                "storage_class": "GeneralPurpose",
                "filesystem_type": "ComputeGeneral",
                "availability_zone": "us-dev-1a",
                "status": "ready",
                "cluster_info": {"cluster_address": "10.0.0.1", "cluster_version": "4.2"},
                "access_info": {"namespace": "ns-1", "filesystem_name": "fs1", "username": "admin", "password": "hunter2"}
            }),
        )
        .await;
    assert!(outcome.state.is_none());
    assert!(outcome.diagnostics.is_empty());
}

#[tokio::test]
async fn test_delete_of_missing_filesystem_succeeds() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("DELETE"))
        .and(path(account_path("/filesystems/id/r-1")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    client.delete_filesystem(&OperationContext::new(), "r-1").await.unwrap();
}

#[tokio::test]
async fn test_create_failure_reports_upstream_message() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/filesystems")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "name already in use"})))
        .mount(&mock_server)
        .await;

    let outcome = FilesystemResource::new(client)
        .create(&OperationContext::new(), plan())
        .await;
    assert!(outcome.state.is_none());
    let diagnostic = outcome.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.summary, "Error creating filesystem");
    assert!(diagnostic.detail.contains("name already in use"));
}

#[tokio::test]
async fn test_plan_defaults_and_unknown_attributes() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/filesystems")))
        .and(body_partial_json(json!({"spec": {"accessModes": "ReadWrite", "Encrypted": true}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSReady", "2TB")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = JsonResource(FilesystemResource::new(client));

    let rejected = resource
        .create(&ctx, json!({"name": "fs1", "size_in_tb": 2, "size": "2TB"}))
        .await;
    assert!(rejected.has_error());
    assert_eq!(
        rejected.diagnostics.iter().next().unwrap().attribute.as_deref(),
        Some("size")
    );

    let outcome = resource.create(&ctx, json!({"name": "fs1", "size_in_tb": 2})).await;
    let state = outcome.state.unwrap();
    assert_eq!(state["access_mode"], "ReadWrite");
    assert_eq!(state["encrypted"], true);
    assert_eq!(state["status"], "ready");
}

#[tokio::test]
async fn test_update_with_changed_size_requires_replacement() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/filesystems")))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSReady", "2TB")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/filesystems/id/r-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(filesystem_document("FSReady", "2048GB")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = JsonResource(FilesystemResource::new(client));
    let state = resource
        .create(&ctx, json!({"name": "fs1", "size_in_tb": 2}))
        .await
        .state
        .unwrap();

    let rejected = resource
        .update(&ctx, state.clone(), json!({"name": "fs1", "size_in_tb": 4}))
        .await;
    assert!(rejected.has_error());
    assert_eq!(rejected.state.as_ref(), Some(&state));
    assert!(rejected.diagnostics.iter().next().unwrap().detail.contains("size_in_tb"));

    // An unchanged plan only refreshes.
    let refreshed = resource
        .update(&ctx, state.clone(), json!({"name": "fs1", "size_in_tb": 2}))
        .await;
    assert!(!refreshed.has_error());
    assert_eq!(refreshed.state.unwrap()["id"], "r-1");
}

#[tokio::test]
async fn test_zero_size_is_rejected_before_any_request() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let outcome = FilesystemResource::new(client)
        .create(
            &OperationContext::new(),
            FilesystemPlan {
                size_in_tb: 0,
                ..plan()
            },
        )
        .await;
    assert!(outcome.has_error());
    assert!(outcome.state.is_none());
}

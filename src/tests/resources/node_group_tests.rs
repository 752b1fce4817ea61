use crate::{
    ErrorKind, OperationContext, ResourceStatus,
    provider::{
        DynResource, JsonResource, Resource,
        node_group_resource::{NodeGroupPlan, NodeGroupResource},
    },
    tests::common::{account_path, create_test_client},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

fn node_group_document(state: &str) -> serde_json::Value {
    json!({
        "nodegroupuuid": "ng-1",
        "name": "workers",
        "count": 2,
        "instancetypeid": "vm-spr-med",
        "nodegroupstate": state,
        "sshkeyname": [{"sshkey": "ops"}],
        "networkinterfacename": null,
        "imiid": "imi-1",
        "userdataurl": null
    })
}

fn plan() -> NodeGroupPlan {
    NodeGroupPlan {
        cluster_uuid: "c-1".to_string(),
        name: "workers".to_string(),
        node_count: 2,
        instance_type: "vm-spr-med".to_string(),
        ssh_key_names: vec!["ops".to_string()],
        user_data_url: String::new(),
        interfaces: Vec::new(),
    }
}

async fn mount_create(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups")))
        .and(body_partial_json(json!({
            "name": "workers",
            "count": 2,
            "instanceType": "worker",
            "instancetypeid": "vm-spr-med",
            "sshkeyname": [{"sshkey": "ops"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Pending")))
        .expect(1)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_create_node_group_until_active() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups/ng-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Provisioning")))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups/ng-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Active")))
        .mount(&mock_server)
        .await;

    let outcome = NodeGroupResource::new(client)
        .create(&OperationContext::new(), plan())
        .await;

    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let state = outcome.state.unwrap();
    assert_eq!(state.id, "ng-1");
    assert_eq!(state.cluster_uuid, "c-1");
    assert_eq!(state.status, ResourceStatus::Active);
    assert_eq!(state.imi_id, "imi-1");
    assert_eq!(state.network_interface_name, "");
}

#[tokio::test]
async fn test_node_group_deadline_exceeded() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups/ng-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Pending")))
        .mount(&mock_server)
        .await;

    let err = client
        .create_node_group(
            &OperationContext::new(),
            "c-1",
            &crate::model::IksNodeGroupCreateRequest {
                count: 2,
                name: "workers".to_string(),
                product_type: crate::model::NODE_GROUP_PRODUCT_TYPE.to_string(),
                instance_type_id: "vm-spr-med".to_string(),
                ssh_key_names: vec![crate::model::SshKey {
                    name: "ops".to_string(),
                }],
                user_data_url: String::new(),
                interfaces: Vec::new(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
    assert!(err.to_string().contains("iks node group"));
}

#[tokio::test]
async fn test_adapter_commits_no_ready_state_on_deadline() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_create(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups/ng-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Pending")))
        .mount(&mock_server)
        .await;

    let outcome = NodeGroupResource::new(client)
        .create(&OperationContext::new(), plan())
        .await;

    assert!(outcome.has_error());
    let partial = outcome.state.unwrap();
    assert_eq!(partial.id, "ng-1");
    assert_ne!(partial.status, ResourceStatus::Active);
}

#[tokio::test]
async fn test_import_by_composite_id() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups/ng-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Active")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = OperationContext::new();
    let resource = JsonResource(NodeGroupResource::new(client));

    let state = resource.import(&ctx, "c-1/ng-1").await.state.unwrap();
    assert_eq!(state["id"], "ng-1");
    assert_eq!(state["cluster_uuid"], "c-1");
    assert_eq!(state["ssh_key_names"], json!(["ops"]));

    let invalid = resource.import(&ctx, "ng-1").await;
    assert!(invalid.has_error());
    assert!(invalid.state.is_none());
}

#[tokio::test]
async fn test_interface_zone_defaults_to_region() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("POST"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups")))
        .and(body_partial_json(json!({
            "vnets": [{"availabilityzonename": "us-dev-1a", "networkinterfacevnetname": "us-dev-1a-default"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Active")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups/ng-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_group_document("Active")))
        .mount(&mock_server)
        .await;

    let outcome = JsonResource(NodeGroupResource::new(client))
        .create(
            &OperationContext::new(),
            json!({
                "cluster_uuid": "c-1",
                "name": "workers",
                "node_count": 2,
                "instance_type": "vm-spr-med",
                "interfaces": [{"vnet": "us-dev-1a-default"}]
            }),
        )
        .await;

    assert!(!outcome.has_error(), "{:?}", outcome.diagnostics);
    let state = outcome.state.unwrap();
    assert_eq!(state["interfaces"][0]["availability_zone"], "us-dev-1a");
}

#[tokio::test]
async fn test_delete_of_missing_node_group_succeeds() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("DELETE"))
        .and(path(account_path("/iks/clusters/c-1/nodegroups/ng-1")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    client
        .delete_node_group(&OperationContext::new(), "c-1", "ng-1")
        .await
        .unwrap();
}

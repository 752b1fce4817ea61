use crate::{
    ClientConfig, OperationContext,
    provider::{IntelCloudProvider, ProviderConfig},
    tests::common::{ACCOUNT, TOKEN, account_path, fast_config, init_tracing},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn provider_config(host: &str) -> ProviderConfig {
    ProviderConfig {
        host: Some(host.to_string()),
        region: Some("us-dev-1".to_string()),
        cloudaccount: Some(ACCOUNT.to_string()),
        apitoken: Some(TOKEN.to_string()),
    }
}

#[tokio::test]
async fn test_configured_provider_drives_json_resources() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(account_path("/iks/clusters/c-1/vips/7")))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "vipid": 7,
            "name": "web",
            "port": 443,
            "viptype": "public",
            "vipstate": "Active",
            "vipip": "10.1.1.1",
            "poolport": 30443
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider =
        IntelCloudProvider::configure(provider_config(&mock_server.uri()), fast_config()).unwrap();
    let resource = provider.resource("intelcloud_iks_load_balancer").unwrap();

    let outcome = resource.import(&OperationContext::new(), "c-1/7").await;
    let state = outcome.state.unwrap();
    assert_eq!(state["id"], "7");
    assert_eq!(state["cloudaccount"], ACCOUNT);
    assert_eq!(state["status"], "active");
}

#[tokio::test]
async fn test_data_source_rejects_unknown_arguments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider =
        IntelCloudProvider::configure(provider_config(&mock_server.uri()), ClientConfig::default())
            .unwrap();
    let source = provider.data_source("intelcloud_kubernetes_clusters").unwrap();

    let outcome = source
        .read(&OperationContext::new(), json!({"name": "demo"}))
        .await;
    assert!(outcome.has_error());
    assert!(outcome.state.is_none());
}

#[tokio::test]
async fn test_cancelled_context_stops_before_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider =
        IntelCloudProvider::configure(provider_config(&mock_server.uri()), fast_config()).unwrap();
    let resource = provider.resource("intelcloud_iks_cluster").unwrap();

    let ctx = OperationContext::new();
    ctx.cancel();
    let outcome = resource.import(&ctx, "c-1").await;
    assert!(outcome.has_error());
    assert!(
        outcome
            .diagnostics
            .iter()
            .next()
            .unwrap()
            .detail
            .contains("cancelled")
    );
}

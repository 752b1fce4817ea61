mod core;
pub mod provider;
pub mod services;

pub use crate::core::domain::error::{ErrorKind, IdcError, IdcResult, ValidationError};
pub use crate::core::domain::model::{
    client_config::{ClientConfig, PollPolicy, PollWindows, RateLimitConfig},
    idc_connection::IdcConnection,
    status::{ResourceKind, ResourceStatus, project},
};
pub use crate::core::domain::value_object::{
    ApiToken, CloudAccount, GB_PER_TB, IdcHost, IdcRegion, SizeUnit, StorageSize,
};
pub use crate::core::infrastructure::{
    api_client::{StatusClass, classify, redact_body},
    context::OperationContext,
    poller::{PollOutcome, poll},
};
pub use crate::services::{IdcServicesClient, WaitMode};

/// Wire documents exchanged with the IDC API.
pub mod model {
    pub use crate::core::domain::model::{
        cluster_storage::{IksStorageCreateRequest, K8sStorage, find_storage},
        filesystem::*,
        iks_cluster::{ClusterNetwork, IksCluster, IksClusters, IksCreateRequest, IksVip},
        load_balancer::{IksLoadBalancer, IksLoadBalancerRequest, IksLoadBalancers},
        node_group::{
            IksNodeGroupCreateRequest, NODE_GROUP_PRODUCT_TYPE, NodeGroup, NodeGroupInterface,
            SshKey,
        },
    };
}

/// Builder for [`IdcServicesClient`] configuration
///
/// # Examples
///
/// ```no_run
/// use leeca_intelcloud::{IdcResult, IdcServicesClient, OperationContext};
///
/// #[tokio::main]
/// async fn main() -> IdcResult<()> {
///     let client = IdcServicesClient::builder()
///         .host("https://api.idcservice.net")?
///         .region("us-region-1")?
///         .cloud_account("123456789012")?
///         .api_token("token")?
///         .build()?;
///
///     let clusters = client.list_clusters(&OperationContext::new()).await?;
///     println!("{} clusters", clusters.clusters.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct IdcServicesClientBuilder {
    host: Option<IdcHost>,
    region: Option<IdcRegion>,
    cloud_account: Option<CloudAccount>,
    api_token: Option<ApiToken>,
    config: ClientConfig,
}

impl IdcServicesClientBuilder {
    pub fn host(mut self, host: impl Into<String>) -> IdcResult<Self> {
        self.host = Some(IdcHost::new(host)?);
        Ok(self)
    }

    pub fn region(mut self, region: impl Into<String>) -> IdcResult<Self> {
        self.region = Some(IdcRegion::new(region)?);
        Ok(self)
    }

    pub fn cloud_account(mut self, cloud_account: impl Into<String>) -> IdcResult<Self> {
        self.cloud_account = Some(CloudAccount::new(cloud_account)?);
        Ok(self)
    }

    pub fn api_token(mut self, api_token: impl Into<String>) -> IdcResult<Self> {
        self.api_token = Some(ApiToken::new(api_token)?);
        Ok(self)
    }

    /// Rate limiting, request timeout and poll windows.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> IdcResult<IdcServicesClient> {
        let host = required(self.host, "host", "Host is required")?;
        let region = required(self.region, "region", "Region is required")?;
        let cloud_account = required(self.cloud_account, "cloud_account", "Cloud account is required")?;
        let api_token = required(self.api_token, "api_token", "API token is required")?;

        let connection = IdcConnection::new(host, region, cloud_account, api_token);
        IdcServicesClient::new(connection, self.config)
    }
}

fn required<T>(value: Option<T>, field: &str, message: &str) -> IdcResult<T> {
    value.ok_or_else(|| IdcError::Validation(ValidationError::field(field, message)))
}

impl IdcServicesClient {
    /// Creates a new builder for IdcServicesClient configuration
    pub fn builder() -> IdcServicesClientBuilder {
        IdcServicesClientBuilder::default()
    }
}

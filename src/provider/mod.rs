//! The host-facing provider: configuration, schemas and resource adapters.
//!
//! An [`IntelCloudProvider`] is configured once and then hands out one
//! adapter per resource type. Adapters translate a plan into service calls
//! and service results back into state, reporting problems as
//! [`Diagnostics`] instead of errors.

pub mod cluster_storage_resource;
pub mod clusters_data_source;
pub mod config;
pub mod diagnostics;
pub mod filesystem_resource;
pub mod iks_cluster_resource;
pub mod load_balancer_resource;
pub mod node_group_resource;
pub mod resource;
pub mod schema;

pub use config::ProviderConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use resource::{
    DataSource, DynDataSource, DynResource, JsonDataSource, JsonResource, Outcome, Resource,
};
pub use schema::{Attribute, AttributeMode, AttributeType, Schema};

use crate::{core::domain::model::client_config::ClientConfig, services::IdcServicesClient};
use cluster_storage_resource::ClusterStorageResource;
use clusters_data_source::KubernetesClustersDataSource;
use filesystem_resource::FilesystemResource;
use iks_cluster_resource::IksClusterResource;
use load_balancer_resource::LoadBalancerResource;
use node_group_resource::NodeGroupResource;
use tracing::info;

/// A configured IntelCloud provider.
#[derive(Debug, Clone)]
pub struct IntelCloudProvider {
    client: IdcServicesClient,
}

impl IntelCloudProvider {
    pub const TYPE_NAME: &'static str = "intelcloud";

    /// Validates `config` (after environment fallback) and builds the shared client.
    pub fn configure(config: ProviderConfig, client_config: ClientConfig) -> Result<Self, Diagnostics> {
        let connection = config.with_env_fallback().into_connection()?;
        let client = IdcServicesClient::new(connection, client_config).map_err(|err| {
            let mut diags = Diagnostics::new();
            diags.add_idc_error("Unable to create IDC client", &err);
            diags
        })?;
        info!(
            host = %client.connection().host().as_str(),
            region = %client.connection().region().as_str(),
            "intelcloud provider configured"
        );
        Ok(Self { client })
    }

    pub fn from_client(client: IdcServicesClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &IdcServicesClient {
        &self.client
    }

    pub fn schema() -> Schema {
        ProviderConfig::schema()
    }

    /// Every managed resource type.
    pub fn resources(&self) -> Vec<Box<dyn DynResource>> {
        let client = &self.client;
        vec![
            Box::new(JsonResource(FilesystemResource::new(client.clone()))),
            Box::new(JsonResource(IksClusterResource::new(client.clone()))),
            Box::new(JsonResource(NodeGroupResource::new(client.clone()))),
            Box::new(JsonResource(ClusterStorageResource::new(client.clone()))),
            Box::new(JsonResource(LoadBalancerResource::new(client.clone()))),
        ]
    }

    pub fn data_sources(&self) -> Vec<Box<dyn DynDataSource>> {
        vec![Box::new(JsonDataSource(KubernetesClustersDataSource::new(
            self.client.clone(),
        )))]
    }

    /// The resource registered under `type_name`.
    pub fn resource(&self, type_name: &str) -> Option<Box<dyn DynResource>> {
        self.resources()
            .into_iter()
            .find(|resource| resource.type_name() == type_name)
    }

    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DynDataSource>> {
        self.data_sources()
            .into_iter()
            .find(|source| source.type_name() == type_name)
    }
}

use super::{
    iks_cluster_resource::ClusterObservation,
    resource::{DataSource, Outcome},
    schema::{Attribute, AttributeType, Schema},
};
use crate::{
    core::{
        domain::model::{
            load_balancer::IksLoadBalancer,
            status::{ResourceKind, ResourceStatus, project},
        },
        infrastructure::context::OperationContext,
    },
    services::IdcServicesClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const KUBERNETES_CLUSTERS_TYPE_NAME: &str = "intelcloud_kubernetes_clusters";

/// The data source takes no arguments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClustersConfig {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerSummary {
    pub id: i64,
    pub name: String,
    pub port: i64,
    pub vip_type: String,
    pub vip_state: String,
    pub vip_ip: String,
    pub pool_port: i64,
    pub status: ResourceStatus,
}

impl From<&IksLoadBalancer> for LoadBalancerSummary {
    fn from(lb: &IksLoadBalancer) -> Self {
        Self {
            id: lb.id,
            name: lb.name.clone(),
            port: lb.port,
            vip_type: lb.vip_type.clone(),
            vip_state: lb.vip_state.clone(),
            vip_ip: lb.vip_ip.clone(),
            pool_port: lb.pool_port,
            status: project(ResourceKind::LoadBalancer, &lb.vip_state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterListing {
    #[serde(flatten)]
    pub observed: ClusterObservation,
    pub load_balancers: Vec<LoadBalancerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClustersState {
    pub cloudaccount: String,
    pub clusters: Vec<ClusterListing>,
}

/// Data source `intelcloud_kubernetes_clusters`: every cluster of the
/// account with its load balancers, in server order.
#[derive(Debug, Clone)]
pub struct KubernetesClustersDataSource {
    client: IdcServicesClient,
}

impl KubernetesClustersDataSource {
    pub fn new(client: IdcServicesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for KubernetesClustersDataSource {
    type Config = ClustersConfig;
    type State = ClustersState;

    fn type_name(&self) -> &'static str {
        KUBERNETES_CLUSTERS_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("IKS clusters of the configured cloud account.")
            .attribute("cloudaccount", Attribute::computed(AttributeType::String))
            .attribute("clusters", Attribute::computed(AttributeType::ObjectList))
    }

    async fn read(&self, ctx: &OperationContext, _config: ClustersConfig) -> Outcome<ClustersState> {
        let listed = match self.client.list_clusters(ctx).await {
            Ok(listed) => listed,
            Err(err) => return Outcome::failed(None, "Error listing iks clusters", &err),
        };
        debug!(count = listed.clusters.len(), "listed iks clusters");

        let mut clusters = Vec::with_capacity(listed.clusters.len());
        for cluster in &listed.clusters {
            let load_balancers = match self.client.list_load_balancers(ctx, &cluster.resource_id).await {
                Ok(items) => items.iter().map(LoadBalancerSummary::from).collect(),
                Err(err) if err.is_not_found() => {
                    warn!(cluster_uuid = %cluster.resource_id, "cluster vanished while listing load balancers");
                    continue;
                }
                Err(err) => {
                    return Outcome::failed(
                        None,
                        format!("Error listing load balancers of cluster {}", cluster.resource_id),
                        &err,
                    );
                }
            };
            clusters.push(ClusterListing {
                observed: ClusterObservation::from(cluster),
                load_balancers,
            });
        }

        Outcome::ok(ClustersState {
            cloudaccount: self.client.cloud_account().to_string(),
            clusters,
        })
    }
}

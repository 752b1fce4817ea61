use super::{
    resource::{Outcome, Resource, reject_update, replace_paths},
    schema::{Attribute, AttributeType, Schema},
};
use crate::{
    core::{
        domain::model::{
            cluster_storage::K8sStorage,
            iks_cluster::{ClusterNetwork, IksCluster, IksCreateRequest, IksVip},
            node_group::NodeGroup,
            status::{ResourceKind, ResourceStatus, project},
        },
        infrastructure::context::OperationContext,
    },
    services::{IdcServicesClient, WaitMode},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

pub const IKS_CLUSTER_TYPE_NAME: &str = "intelcloud_iks_cluster";

const DEFAULT_RUNTIME: &str = "Containerd";

fn default_count() -> i64 {
    1
}

fn default_runtime() -> String {
    DEFAULT_RUNTIME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IksClusterPlan {
    pub name: String,
    pub kubernetes_version: String,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default = "default_runtime")]
    pub runtime_name: String,
    /// Return after the create request without waiting for `Active`.
    #[serde(rename = "async", default)]
    pub detached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    pub enable_lb: bool,
    pub service_cidr: String,
    pub cluster_cidr: String,
    pub cluster_dns: String,
}

impl From<&ClusterNetwork> for NetworkState {
    fn from(network: &ClusterNetwork) -> Self {
        Self {
            enable_lb: network.enable_lb,
            service_cidr: network.service_cidr.clone(),
            cluster_cidr: network.cluster_cidr.clone(),
            cluster_dns: network.cluster_dns.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroupSummary {
    pub id: String,
    pub name: String,
    pub count: i64,
    pub instance_type: String,
    pub state: String,
    pub status: ResourceStatus,
    pub imi_id: String,
    pub network_interface_name: String,
    pub user_data_url: String,
    pub ssh_key_names: Vec<String>,
}

impl From<&NodeGroup> for NodeGroupSummary {
    fn from(ng: &NodeGroup) -> Self {
        Self {
            id: ng.id.clone(),
            name: ng.name.clone(),
            count: ng.count,
            instance_type: ng.instance_type.clone(),
            state: ng.state.clone(),
            status: project(ResourceKind::NodeGroup, &ng.state),
            imi_id: ng.imi_id.clone(),
            network_interface_name: ng.network_interface_name.clone(),
            user_data_url: ng.user_data_url.clone(),
            ssh_key_names: ng.ssh_key_names.iter().map(|k| k.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSummary {
    pub provider: String,
    pub size: String,
    pub state: String,
}

impl From<&K8sStorage> for StorageSummary {
    fn from(storage: &K8sStorage) -> Self {
        Self {
            provider: storage.provider.clone(),
            size: storage.size.clone(),
            state: storage.state.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VipSummary {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub ip: String,
    pub port: i64,
    pub pool_port: i64,
    pub vip_type: String,
}

impl From<&IksVip> for VipSummary {
    fn from(vip: &IksVip) -> Self {
        Self {
            id: vip.id,
            name: vip.name.clone(),
            state: vip.state.clone(),
            ip: vip.ip.clone(),
            port: vip.port,
            pool_port: vip.pool_port,
            vip_type: vip.vip_type.clone(),
        }
    }
}

/// Everything the server reports about a cluster, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterObservation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub cluster_state: String,
    pub status: ResourceStatus,
    pub k8s_version: String,
    pub upgrade_available: bool,
    pub upgradable_versions: Vec<String>,
    pub network: NetworkState,
    pub storage_enabled: bool,
    pub node_groups: Vec<NodeGroupSummary>,
    pub storages: Vec<StorageSummary>,
    pub vips: Vec<VipSummary>,
}

impl From<&IksCluster> for ClusterObservation {
    fn from(cluster: &IksCluster) -> Self {
        Self {
            id: cluster.resource_id.clone(),
            name: cluster.name.clone(),
            description: cluster.description.clone(),
            created_at: cluster.created_at.clone(),
            cluster_state: cluster.cluster_state.clone(),
            status: project(ResourceKind::Cluster, &cluster.cluster_state),
            k8s_version: cluster.k8s_version.clone(),
            upgrade_available: cluster.upgrade_available,
            upgradable_versions: cluster.upgradable_k8s_versions.clone(),
            network: NetworkState::from(&cluster.network),
            storage_enabled: cluster.storage_enabled,
            node_groups: cluster.node_groups.iter().map(NodeGroupSummary::from).collect(),
            storages: cluster.storages.iter().map(StorageSummary::from).collect(),
            vips: cluster.vips.iter().map(VipSummary::from).collect(),
        }
    }
}

/// Cluster state as kept by the host: the user's settings plus the observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IksClusterState {
    pub cloudaccount: String,
    pub kubernetes_version: String,
    pub count: i64,
    pub instance_type: String,
    pub runtime_name: String,
    #[serde(rename = "async")]
    pub detached: bool,
    #[serde(flatten)]
    pub observed: ClusterObservation,
}

impl IksClusterState {
    fn new(cloudaccount: &str, plan: &IksClusterPlan, cluster: &IksCluster) -> Self {
        let mut observed = ClusterObservation::from(cluster);
        if observed.name.is_empty() {
            observed.name = plan.name.clone();
        }
        Self {
            cloudaccount: cloudaccount.to_string(),
            kubernetes_version: plan.kubernetes_version.clone(),
            count: plan.count,
            instance_type: plan.instance_type.clone(),
            runtime_name: plan.runtime_name.clone(),
            detached: plan.detached,
            observed,
        }
    }

    fn refreshed(&self, cluster: &IksCluster) -> Self {
        Self {
            observed: ClusterObservation::from(cluster),
            ..self.clone()
        }
    }
}

/// Adapter for `intelcloud_iks_cluster`.
#[derive(Debug, Clone)]
pub struct IksClusterResource {
    client: IdcServicesClient,
}

impl IksClusterResource {
    pub fn new(client: IdcServicesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for IksClusterResource {
    type Plan = IksClusterPlan;
    type State = IksClusterState;

    fn type_name(&self) -> &'static str {
        IKS_CLUSTER_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let node_group = [
            ("id", Attribute::computed(AttributeType::String)),
            ("name", Attribute::computed(AttributeType::String)),
            ("count", Attribute::computed(AttributeType::Int64)),
            ("instance_type", Attribute::computed(AttributeType::String)),
            ("state", Attribute::computed(AttributeType::String)),
            ("status", Attribute::computed(AttributeType::String)),
            ("imi_id", Attribute::computed(AttributeType::String)),
            ("network_interface_name", Attribute::computed(AttributeType::String)),
            ("user_data_url", Attribute::computed(AttributeType::String)),
            ("ssh_key_names", Attribute::computed(AttributeType::StringList)),
        ];
        let storage = [
            ("provider", Attribute::computed(AttributeType::String)),
            ("size", Attribute::computed(AttributeType::String)),
            ("state", Attribute::computed(AttributeType::String)),
        ];
        let vip = [
            ("id", Attribute::computed(AttributeType::Int64)),
            ("name", Attribute::computed(AttributeType::String)),
            ("state", Attribute::computed(AttributeType::String)),
            ("ip", Attribute::computed(AttributeType::String)),
            ("port", Attribute::computed(AttributeType::Int64)),
            ("pool_port", Attribute::computed(AttributeType::Int64)),
            ("vip_type", Attribute::computed(AttributeType::String)),
        ];

        Schema::new("An Intel Kubernetes Service cluster.")
            .attribute("id", Attribute::computed(AttributeType::String))
            .attribute("cloudaccount", Attribute::computed(AttributeType::String))
            .attribute(
                "name",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .attribute(
                "kubernetes_version",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .attribute(
                "count",
                Attribute::with_default(AttributeType::Int64, json!(1)).requires_replace(),
            )
            .attribute(
                "instance_type",
                Attribute::optional(AttributeType::String).requires_replace(),
            )
            .attribute(
                "runtime_name",
                Attribute::with_default(AttributeType::String, json!(DEFAULT_RUNTIME))
                    .requires_replace(),
            )
            .attribute(
                "async",
                Attribute::with_default(AttributeType::Bool, json!(false))
                    .describe("Return once the cluster is accepted instead of waiting for Active."),
            )
            .attribute("description", Attribute::computed(AttributeType::String))
            .attribute("k8s_version", Attribute::computed(AttributeType::String))
            .attribute("created_at", Attribute::computed(AttributeType::String))
            .attribute("cluster_state", Attribute::computed(AttributeType::String))
            .attribute("status", Attribute::computed(AttributeType::String))
            .attribute("upgrade_available", Attribute::computed(AttributeType::Bool))
            .attribute("upgradable_versions", Attribute::computed(AttributeType::StringList))
            .attribute("storage_enabled", Attribute::computed(AttributeType::Bool))
            .attribute(
                "network",
                Attribute::computed(AttributeType::Object).nested([
                    ("enable_lb", Attribute::computed(AttributeType::Bool)),
                    ("service_cidr", Attribute::computed(AttributeType::String)),
                    ("cluster_cidr", Attribute::computed(AttributeType::String)),
                    ("cluster_dns", Attribute::computed(AttributeType::String)),
                ]),
            )
            .attribute(
                "node_groups",
                Attribute::computed(AttributeType::ObjectList).nested(node_group),
            )
            .attribute(
                "storages",
                Attribute::computed(AttributeType::ObjectList).nested(storage),
            )
            .attribute("vips", Attribute::computed(AttributeType::ObjectList).nested(vip))
    }

    async fn create(&self, ctx: &OperationContext, plan: IksClusterPlan) -> Outcome<IksClusterState> {
        let cloudaccount = self.client.cloud_account();
        let request = IksCreateRequest {
            name: plan.name.clone(),
            count: plan.count,
            k8s_version: plan.kubernetes_version.clone(),
            instance_type: plan.instance_type.clone(),
            runtime_name: plan.runtime_name.clone(),
        };

        let created = match self.client.submit_cluster(ctx, &request).await {
            Ok(created) => created,
            Err(err) => return Outcome::failed(None, "Error creating iks cluster", &err),
        };
        // Kept if the wait fails, so the host still tracks the new cluster.
        let partial = IksClusterState::new(cloudaccount, &plan, &created);

        let mode = if plan.detached {
            WaitMode::Detached
        } else {
            WaitMode::Wait
        };
        match self.client.await_cluster(ctx, &created.resource_id, mode).await {
            Ok(cluster) => {
                let outcome = Outcome::ok(IksClusterState::new(cloudaccount, &plan, &cluster));
                if mode == WaitMode::Detached {
                    outcome.with_warning(
                        "Cluster not awaited",
                        format!(
                            "iks cluster {} was created with async = true and may not be Active yet",
                            created.resource_id
                        ),
                    )
                } else {
                    outcome
                }
            }
            Err(err) => Outcome::failed(
                Some(partial),
                format!("Error waiting for iks cluster {}", created.resource_id),
                &err,
            ),
        }
    }

    async fn read(&self, ctx: &OperationContext, state: IksClusterState) -> Outcome<IksClusterState> {
        match self.client.get_cluster(ctx, &state.observed.id).await {
            Ok(cluster) => Outcome::ok(state.refreshed(&cluster)),
            Err(err) if err.is_not_found() => {
                warn!(cluster_uuid = %state.observed.id, "iks cluster not found, removing from state");
                Outcome::removed()
            }
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error reading iks cluster {}", state.observed.id),
                &err,
            ),
        }
    }

    async fn update(
        &self,
        ctx: &OperationContext,
        prior: IksClusterState,
        plan: IksClusterPlan,
    ) -> Outcome<IksClusterState> {
        let replace = match replace_paths(&self.schema(), &prior, &plan) {
            Ok(paths) => paths,
            Err(err) => return Outcome::failed(Some(prior), "Error comparing plan", &err),
        };
        if !replace.is_empty() {
            return reject_update(prior, &replace);
        }
        // `async` only affects future creates; carry it without touching the server.
        self.read(ctx, prior).await.map(|mut state| {
            state.detached = plan.detached;
            state
        })
    }

    async fn delete(&self, ctx: &OperationContext, state: IksClusterState) -> Outcome<IksClusterState> {
        match self.client.delete_cluster(ctx, &state.observed.id).await {
            Ok(()) => Outcome::removed(),
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error deleting iks cluster {}", state.observed.id),
                &err,
            ),
        }
    }

    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<IksClusterState> {
        match self.client.get_cluster(ctx, id).await {
            Ok(cluster) => {
                let plan = IksClusterPlan {
                    name: cluster.name.clone(),
                    kubernetes_version: cluster.k8s_version.clone(),
                    count: default_count(),
                    instance_type: String::new(),
                    runtime_name: default_runtime(),
                    detached: false,
                };
                Outcome::ok(IksClusterState::new(self.client.cloud_account(), &plan, &cluster))
            }
            Err(err) => Outcome::failed(None, format!("Error importing iks cluster {}", id), &err),
        }
    }
}

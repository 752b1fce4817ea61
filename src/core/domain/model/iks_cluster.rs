//! Wire models for `/v1/cloudaccounts/{ca}/iks/clusters`.

use crate::core::domain::{
    model::{cluster_storage::K8sStorage, node_group::NodeGroup},
    value_object::serde_helpers::null_as_default,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /iks/clusters`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IksCreateRequest {
    pub name: String,
    pub count: i64,
    #[serde(rename = "k8sversionname")]
    pub k8s_version: String,
    #[serde(rename = "instanceType")]
    pub instance_type: String,
    #[serde(rename = "runtimename")]
    pub runtime_name: String,
}

/// An IKS cluster document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct IksCluster {
    #[serde(rename = "uuid", default)]
    pub resource_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "createddate", default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(rename = "clusterstate", default)]
    pub cluster_state: String,
    #[serde(rename = "k8sversion", default)]
    pub k8s_version: String,
    #[serde(rename = "upgradeavailable", default)]
    pub upgrade_available: bool,
    #[serde(
        rename = "upgradek8sversionavailable",
        default,
        deserialize_with = "null_as_default"
    )]
    pub upgradable_k8s_versions: Vec<String>,
    #[serde(default)]
    pub network: ClusterNetwork,
    #[serde(rename = "nodegroups", default, deserialize_with = "null_as_default")]
    pub node_groups: Vec<NodeGroup>,
    #[serde(rename = "storageenabled", default)]
    pub storage_enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub storages: Vec<K8sStorage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vips: Vec<IksVip>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ClusterNetwork {
    #[serde(rename = "enableloadbalancer", default)]
    pub enable_lb: bool,
    #[serde(rename = "servicecidr", default)]
    pub service_cidr: String,
    #[serde(rename = "clustercidr", default)]
    pub cluster_cidr: String,
    #[serde(rename = "clusterdns", default)]
    pub cluster_dns: String,
}

/// A VIP as embedded in the cluster document. Note `vipIp` here versus
/// `vipip` on the standalone VIP endpoint.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct IksVip {
    #[serde(rename = "vipid", default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "vipstate", default)]
    pub state: String,
    #[serde(rename = "vipIp", default)]
    pub ip: String,
    #[serde(default)]
    pub port: i64,
    #[serde(rename = "poolport", default)]
    pub pool_port: i64,
    #[serde(rename = "viptype", default)]
    pub vip_type: String,
}

/// Body of `GET /iks/clusters`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct IksClusters {
    #[serde(default, deserialize_with = "null_as_default")]
    pub clusters: Vec<IksCluster>,
}

//! Wire models for `/iks/clusters/{uuid}/nodegroups`.

use crate::core::domain::value_object::serde_helpers::null_as_default;
use serde::{Deserialize, Serialize};

/// Product type sent with every node group create.
pub const NODE_GROUP_PRODUCT_TYPE: &str = "worker";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SshKey {
    #[serde(rename = "sshkey")]
    pub name: String,
}

/// A network attachment for the nodes of a group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct NodeGroupInterface {
    #[serde(rename = "availabilityzonename")]
    pub availability_zone: String,
    #[serde(rename = "networkinterfacevnetname")]
    pub vnet: String,
}

/// Body of `POST /nodegroups`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IksNodeGroupCreateRequest {
    pub count: i64,
    pub name: String,
    #[serde(rename = "instanceType")]
    pub product_type: String,
    #[serde(rename = "instancetypeid")]
    pub instance_type_id: String,
    #[serde(rename = "sshkeyname")]
    pub ssh_key_names: Vec<SshKey>,
    #[serde(rename = "userdataurl")]
    pub user_data_url: String,
    #[serde(rename = "vnets")]
    pub interfaces: Vec<NodeGroupInterface>,
}

/// A node group document, standalone or embedded in a cluster.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct NodeGroup {
    #[serde(rename = "nodegroupuuid", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub count: i64,
    #[serde(rename = "instancetypeid", default)]
    pub instance_type: String,
    #[serde(rename = "nodegroupstate", default)]
    pub state: String,
    #[serde(rename = "sshkeyname", default, deserialize_with = "null_as_default")]
    pub ssh_key_names: Vec<SshKey>,
    #[serde(
        rename = "networkinterfacename",
        default,
        deserialize_with = "null_as_default"
    )]
    pub network_interface_name: String,
    #[serde(rename = "imiid", default, deserialize_with = "null_as_default")]
    pub imi_id: String,
    #[serde(rename = "userdataurl", default, deserialize_with = "null_as_default")]
    pub user_data_url: String,
}

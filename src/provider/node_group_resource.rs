use super::{
    resource::{Outcome, Resource},
    schema::{Attribute, AttributeType, Schema},
};
use crate::{
    core::{
        domain::model::{
            node_group::{
                IksNodeGroupCreateRequest, NODE_GROUP_PRODUCT_TYPE, NodeGroup, NodeGroupInterface,
                SshKey,
            },
            status::{ResourceKind, ResourceStatus, project},
        },
        infrastructure::context::OperationContext,
    },
    services::IdcServicesClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

pub const IKS_NODE_GROUP_TYPE_NAME: &str = "intelcloud_iks_node_group";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    pub availability_zone: String,
    pub vnet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroupPlan {
    pub cluster_uuid: String,
    pub name: String,
    pub node_count: i64,
    pub instance_type: String,
    #[serde(default)]
    pub ssh_key_names: Vec<String>,
    #[serde(default)]
    pub user_data_url: String,
    #[serde(default)]
    pub interfaces: Vec<InterfaceSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroupState {
    pub id: String,
    pub cluster_uuid: String,
    pub cloudaccount: String,
    pub name: String,
    pub node_count: i64,
    pub instance_type: String,
    pub ssh_key_names: Vec<String>,
    pub user_data_url: String,
    pub interfaces: Vec<InterfaceSpec>,
    pub state: String,
    pub status: ResourceStatus,
    pub imi_id: String,
    pub network_interface_name: String,
}

impl NodeGroupState {
    fn new(cloudaccount: &str, plan: &NodeGroupPlan, ng: &NodeGroup) -> Self {
        Self {
            id: ng.id.clone(),
            cluster_uuid: plan.cluster_uuid.clone(),
            cloudaccount: cloudaccount.to_string(),
            name: plan.name.clone(),
            node_count: plan.node_count,
            instance_type: plan.instance_type.clone(),
            ssh_key_names: plan.ssh_key_names.clone(),
            user_data_url: plan.user_data_url.clone(),
            interfaces: plan.interfaces.clone(),
            state: ng.state.clone(),
            status: project(ResourceKind::NodeGroup, &ng.state),
            imi_id: ng.imi_id.clone(),
            network_interface_name: ng.network_interface_name.clone(),
        }
    }

    /// Applies a fresh server document, keeping the create-only settings.
    fn refreshed(&self, ng: &NodeGroup) -> Self {
        let mut state = self.clone();
        if !ng.name.is_empty() {
            state.name = ng.name.clone();
        }
        if !ng.instance_type.is_empty() {
            state.instance_type = ng.instance_type.clone();
        }
        state.node_count = ng.count;
        state.ssh_key_names = ng.ssh_key_names.iter().map(|k| k.name.clone()).collect();
        state.state = ng.state.clone();
        state.status = project(ResourceKind::NodeGroup, &ng.state);
        state.imi_id = ng.imi_id.clone();
        state.network_interface_name = ng.network_interface_name.clone();
        state
    }
}

/// Splits `<cluster_uuid>/<child id>`.
pub(crate) fn split_child_id(id: &str) -> Option<(&str, &str)> {
    let (parent, child) = id.split_once('/')?;
    if parent.is_empty() || child.is_empty() || child.contains('/') {
        return None;
    }
    Some((parent, child))
}

/// Adapter for `intelcloud_iks_node_group`.
#[derive(Debug, Clone)]
pub struct NodeGroupResource {
    client: IdcServicesClient,
}

impl NodeGroupResource {
    pub fn new(client: IdcServicesClient) -> Self {
        Self { client }
    }

    fn build_request(plan: &NodeGroupPlan) -> IksNodeGroupCreateRequest {
        IksNodeGroupCreateRequest {
            count: plan.node_count,
            name: plan.name.clone(),
            product_type: NODE_GROUP_PRODUCT_TYPE.to_string(),
            instance_type_id: plan.instance_type.clone(),
            ssh_key_names: plan
                .ssh_key_names
                .iter()
                .map(|name| SshKey { name: name.clone() })
                .collect(),
            user_data_url: plan.user_data_url.clone(),
            interfaces: plan
                .interfaces
                .iter()
                .map(|i| NodeGroupInterface {
                    availability_zone: i.availability_zone.clone(),
                    vnet: i.vnet.clone(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Resource for NodeGroupResource {
    type Plan = NodeGroupPlan;
    type State = NodeGroupState;

    fn type_name(&self) -> &'static str {
        IKS_NODE_GROUP_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        let zone = self.client.connection().region().availability_zone();
        Schema::new("A worker node group of an IKS cluster.")
            .attribute("id", Attribute::computed(AttributeType::String))
            .attribute("cloudaccount", Attribute::computed(AttributeType::String))
            .attribute(
                "cluster_uuid",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .attribute(
                "name",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .attribute(
                "node_count",
                Attribute::required(AttributeType::Int64).requires_replace(),
            )
            .attribute(
                "instance_type",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .attribute(
                "ssh_key_names",
                Attribute::with_default(AttributeType::StringList, json!([])).requires_replace(),
            )
            .attribute(
                "user_data_url",
                Attribute::optional(AttributeType::String).requires_replace(),
            )
            .attribute(
                "interfaces",
                Attribute::with_default(AttributeType::ObjectList, json!([]))
                    .requires_replace()
                    .nested([
                        (
                            "availability_zone",
                            Attribute::with_default(AttributeType::String, json!(zone)),
                        ),
                        ("vnet", Attribute::required(AttributeType::String)),
                    ]),
            )
            .attribute("state", Attribute::computed(AttributeType::String))
            .attribute("status", Attribute::computed(AttributeType::String))
            .attribute("imi_id", Attribute::computed(AttributeType::String))
            .attribute("network_interface_name", Attribute::computed(AttributeType::String))
    }

    async fn create(&self, ctx: &OperationContext, plan: NodeGroupPlan) -> Outcome<NodeGroupState> {
        let cloudaccount = self.client.cloud_account();
        let request = Self::build_request(&plan);

        let created = match self
            .client
            .submit_node_group(ctx, &plan.cluster_uuid, &request)
            .await
        {
            Ok(created) => created,
            Err(err) => return Outcome::failed(None, "Error creating iks node group", &err),
        };
        let partial = NodeGroupState::new(cloudaccount, &plan, &created);

        match self
            .client
            .await_node_group(ctx, &plan.cluster_uuid, &created.id)
            .await
        {
            Ok(ng) => Outcome::ok(NodeGroupState::new(cloudaccount, &plan, &ng)),
            Err(err) => Outcome::failed(
                Some(partial),
                format!("Error waiting for iks node group {}", created.id),
                &err,
            ),
        }
    }

    async fn read(&self, ctx: &OperationContext, state: NodeGroupState) -> Outcome<NodeGroupState> {
        match self
            .client
            .get_node_group(ctx, &state.cluster_uuid, &state.id)
            .await
        {
            Ok(ng) => Outcome::ok(state.refreshed(&ng)),
            Err(err) if err.is_not_found() => {
                warn!(node_group_uuid = %state.id, "iks node group not found, removing from state");
                Outcome::removed()
            }
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error reading iks node group {}", state.id),
                &err,
            ),
        }
    }

    async fn delete(&self, ctx: &OperationContext, state: NodeGroupState) -> Outcome<NodeGroupState> {
        match self
            .client
            .delete_node_group(ctx, &state.cluster_uuid, &state.id)
            .await
        {
            Ok(()) => Outcome::removed(),
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error deleting iks node group {}", state.id),
                &err,
            ),
        }
    }

    /// Imports `<cluster_uuid>/<node_group_uuid>`.
    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<NodeGroupState> {
        let Some((cluster_uuid, node_group_uuid)) = split_child_id(id) else {
            let mut outcome = Outcome::removed();
            outcome.diagnostics.add_error(
                "Invalid import id",
                format!("expected <cluster_uuid>/<node_group_uuid>, got {:?}", id),
            );
            return outcome;
        };
        match self.client.get_node_group(ctx, cluster_uuid, node_group_uuid).await {
            Ok(ng) => {
                let plan = NodeGroupPlan {
                    cluster_uuid: cluster_uuid.to_string(),
                    name: ng.name.clone(),
                    node_count: ng.count,
                    instance_type: ng.instance_type.clone(),
                    ssh_key_names: ng.ssh_key_names.iter().map(|k| k.name.clone()).collect(),
                    user_data_url: ng.user_data_url.clone(),
                    interfaces: Vec::new(),
                };
                Outcome::ok(NodeGroupState::new(self.client.cloud_account(), &plan, &ng))
            }
            Err(err) => Outcome::failed(None, format!("Error importing iks node group {}", id), &err),
        }
    }
}

use super::{
    node_group_resource::split_child_id,
    resource::{Outcome, Resource},
    schema::{Attribute, AttributeType, Schema},
};
use crate::{
    core::{
        domain::model::{
            load_balancer::{IksLoadBalancer, IksLoadBalancerRequest},
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

pub const IKS_LOAD_BALANCER_TYPE_NAME: &str = "intelcloud_iks_load_balancer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerPlan {
    pub cluster_uuid: String,
    pub name: String,
    pub port: i64,
    #[serde(default = "default_vip_type")]
    pub vip_type: String,
}

fn default_vip_type() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerState {
    pub id: String,
    pub cluster_uuid: String,
    pub cloudaccount: String,
    pub name: String,
    pub port: i64,
    pub vip_type: String,
    pub vip_id: i64,
    pub vip_state: String,
    pub vip_ip: String,
    pub pool_port: i64,
    pub status: ResourceStatus,
}

impl LoadBalancerState {
    fn new(cloudaccount: &str, plan: &LoadBalancerPlan, lb: &IksLoadBalancer) -> Self {
        Self {
            id: lb.id.to_string(),
            cluster_uuid: plan.cluster_uuid.clone(),
            cloudaccount: cloudaccount.to_string(),
            name: plan.name.clone(),
            port: plan.port,
            vip_type: plan.vip_type.clone(),
            vip_id: lb.id,
            vip_state: lb.vip_state.clone(),
            vip_ip: lb.vip_ip.clone(),
            pool_port: lb.pool_port,
            status: project(ResourceKind::LoadBalancer, &lb.vip_state),
        }
    }

    fn refreshed(&self, lb: &IksLoadBalancer) -> Self {
        Self {
            vip_state: lb.vip_state.clone(),
            vip_ip: lb.vip_ip.clone(),
            pool_port: lb.pool_port,
            status: project(ResourceKind::LoadBalancer, &lb.vip_state),
            ..self.clone()
        }
    }
}

/// Adapter for `intelcloud_iks_load_balancer`.
#[derive(Debug, Clone)]
pub struct LoadBalancerResource {
    client: IdcServicesClient,
}

impl LoadBalancerResource {
    pub fn new(client: IdcServicesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for LoadBalancerResource {
    type Plan = LoadBalancerPlan;
    type State = LoadBalancerState;

    fn type_name(&self) -> &'static str {
        IKS_LOAD_BALANCER_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A VIP load balancer of an IKS cluster.")
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
                "port",
                Attribute::required(AttributeType::Int64).requires_replace(),
            )
            .attribute(
                "vip_type",
                Attribute::with_default(AttributeType::String, json!("public"))
                    .requires_replace()
                    .describe("public or private."),
            )
            .attribute("vip_id", Attribute::computed(AttributeType::Int64))
            .attribute("vip_state", Attribute::computed(AttributeType::String))
            .attribute("vip_ip", Attribute::computed(AttributeType::String))
            .attribute("pool_port", Attribute::computed(AttributeType::Int64))
            .attribute("status", Attribute::computed(AttributeType::String))
    }

    async fn create(
        &self,
        ctx: &OperationContext,
        plan: LoadBalancerPlan,
    ) -> Outcome<LoadBalancerState> {
        let cloudaccount = self.client.cloud_account();
        let request = IksLoadBalancerRequest {
            name: plan.name.clone(),
            port: plan.port,
            vip_type: plan.vip_type.clone(),
        };

        let created = match self
            .client
            .submit_load_balancer(ctx, &plan.cluster_uuid, &request)
            .await
        {
            Ok(created) => created,
            Err(err) => return Outcome::failed(None, "Error creating iks load balancer", &err),
        };
        let partial = LoadBalancerState::new(cloudaccount, &plan, &created);

        match self
            .client
            .await_load_balancer(ctx, &plan.cluster_uuid, created.id)
            .await
        {
            Ok(lb) => Outcome::ok(LoadBalancerState::new(cloudaccount, &plan, &lb)),
            Err(err) => Outcome::failed(
                Some(partial),
                format!("Error waiting for iks load balancer {}", created.id),
                &err,
            ),
        }
    }

    async fn read(
        &self,
        ctx: &OperationContext,
        state: LoadBalancerState,
    ) -> Outcome<LoadBalancerState> {
        match self
            .client
            .get_load_balancer(ctx, &state.cluster_uuid, state.vip_id)
            .await
        {
            Ok(lb) => Outcome::ok(state.refreshed(&lb)),
            Err(err) if err.is_not_found() => {
                warn!(vip_id = state.vip_id, "iks load balancer not found, removing from state");
                Outcome::removed()
            }
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error reading iks load balancer {}", state.id),
                &err,
            ),
        }
    }

    async fn delete(
        &self,
        ctx: &OperationContext,
        state: LoadBalancerState,
    ) -> Outcome<LoadBalancerState> {
        match self
            .client
            .delete_load_balancer(ctx, &state.cluster_uuid, state.vip_id)
            .await
        {
            Ok(()) => Outcome::removed(),
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error deleting iks load balancer {}", state.id),
                &err,
            ),
        }
    }

    /// Imports `<cluster_uuid>/<vip_id>`.
    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<LoadBalancerState> {
        let parsed = split_child_id(id)
            .and_then(|(cluster, vip)| vip.parse::<i64>().ok().map(|vip| (cluster, vip)));
        let Some((cluster_uuid, vip_id)) = parsed else {
            let mut outcome = Outcome::removed();
            outcome.diagnostics.add_error(
                "Invalid import id",
                format!("expected <cluster_uuid>/<vip_id>, got {:?}", id),
            );
            return outcome;
        };
        match self.client.get_load_balancer(ctx, cluster_uuid, vip_id).await {
            Ok(lb) => {
                let plan = LoadBalancerPlan {
                    cluster_uuid: cluster_uuid.to_string(),
                    name: lb.name.clone(),
                    port: lb.port,
                    vip_type: lb.vip_type.clone(),
                };
                Outcome::ok(LoadBalancerState::new(self.client.cloud_account(), &plan, &lb))
            }
            Err(err) => Outcome::failed(None, format!("Error importing iks load balancer {}", id), &err),
        }
    }
}

use super::{IdcServicesClient, ignore_not_found, phase_outcome, read_error_outcome};
use crate::core::{
    domain::{
        error::IdcResult,
        model::{
            load_balancer::{IksLoadBalancer, IksLoadBalancerRequest, IksLoadBalancers},
            status::ResourceKind,
        },
    },
    infrastructure::{
        context::OperationContext,
        poller::poll,
        url_template::{CLUSTER_UUID, IKS_VIP, IKS_VIPS, VIP_ID},
    },
};
use tracing::info;

impl IdcServicesClient {
    /// Creates a VIP on a cluster and waits until its `vipstate` is `Active`.
    pub async fn create_load_balancer(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        request: &IksLoadBalancerRequest,
    ) -> IdcResult<IksLoadBalancer> {
        let created = self.submit_load_balancer(ctx, cluster_uuid, request).await?;
        self.await_load_balancer(ctx, cluster_uuid, created.id).await
    }

    /// Sends the create request only. The returned document carries the new `vipid`.
    pub async fn submit_load_balancer(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        request: &IksLoadBalancerRequest,
    ) -> IdcResult<IksLoadBalancer> {
        let url = IKS_VIPS.expand(&self.params().with(CLUSTER_UUID, cluster_uuid))?;
        info!(cluster_uuid, name = %request.name, port = request.port, "creating iks load balancer");
        self.api.post(ctx, &url, request).await
    }

    /// Polls a VIP until its `vipstate` is `Active`.
    pub async fn await_load_balancer(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        vip_id: i64,
    ) -> IdcResult<IksLoadBalancer> {
        let kind = ResourceKind::LoadBalancer;
        let id = vip_id.to_string();
        let id = id.as_str();
        let load_balancer = poll(ctx, self.poll.load_balancer, kind.display_name(), move || async move {
            match self.get_load_balancer(ctx, cluster_uuid, vip_id).await {
                Ok(lb) => {
                    let phase = lb.vip_state.clone();
                    phase_outcome(kind, id, &phase, lb)
                }
                Err(err) => read_error_outcome(err),
            }
        })
        .await?;
        info!(cluster_uuid, vip_id, vip_ip = %load_balancer.vip_ip, "iks load balancer active");
        Ok(load_balancer)
    }

    /// Fetches one VIP of a cluster.
    pub async fn get_load_balancer(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        vip_id: i64,
    ) -> IdcResult<IksLoadBalancer> {
        let url = IKS_VIP.expand(&self.params().with(CLUSTER_UUID, cluster_uuid).with(VIP_ID, vip_id))?;
        self.api.get(ctx, &url).await
    }

    /// Lists the VIPs of a cluster.
    pub async fn list_load_balancers(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
    ) -> IdcResult<Vec<IksLoadBalancer>> {
        let url = IKS_VIPS.expand(&self.params().with(CLUSTER_UUID, cluster_uuid))?;
        let list: IksLoadBalancers = self.api.get(ctx, &url).await?;
        Ok(list.items)
    }

    /// Deletes a VIP. A VIP that no longer exists counts as deleted.
    pub async fn delete_load_balancer(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        vip_id: i64,
    ) -> IdcResult<()> {
        let url = IKS_VIP.expand(&self.params().with(CLUSTER_UUID, cluster_uuid).with(VIP_ID, vip_id))?;
        let result = self.api.delete(ctx, &url).await;
        ignore_not_found(ResourceKind::LoadBalancer, &vip_id.to_string(), result)?;
        info!(cluster_uuid, vip_id, "iks load balancer deleted");
        Ok(())
    }
}

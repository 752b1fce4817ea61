use super::{IdcServicesClient, ignore_not_found, phase_outcome, read_error_outcome};
use crate::core::{
    domain::{
        error::IdcResult,
        model::{
            node_group::{IksNodeGroupCreateRequest, NodeGroup},
            status::ResourceKind,
        },
    },
    infrastructure::{
        context::OperationContext,
        poller::poll,
        url_template::{CLUSTER_UUID, IKS_NODE_GROUP, IKS_NODE_GROUPS, NODE_GROUP_UUID},
    },
};
use tracing::info;

impl IdcServicesClient {
    /// Creates a node group in `cluster_uuid` and waits until it is `Active`.
    pub async fn create_node_group(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        request: &IksNodeGroupCreateRequest,
    ) -> IdcResult<NodeGroup> {
        let created = self.submit_node_group(ctx, cluster_uuid, request).await?;
        self.await_node_group(ctx, cluster_uuid, &created.id).await
    }

    /// Sends the create request only. The returned document carries the new uuid.
    pub async fn submit_node_group(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        request: &IksNodeGroupCreateRequest,
    ) -> IdcResult<NodeGroup> {
        let url = IKS_NODE_GROUPS.expand(&self.params().with(CLUSTER_UUID, cluster_uuid))?;
        info!(cluster_uuid, name = %request.name, count = request.count, "creating iks node group");
        self.api.post(ctx, &url, request).await
    }

    /// Polls a node group until it is `Active`.
    pub async fn await_node_group(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        node_group_uuid: &str,
    ) -> IdcResult<NodeGroup> {
        let kind = ResourceKind::NodeGroup;
        let node_group = poll(ctx, self.poll.node_group, kind.display_name(), move || async move {
            match self.get_node_group(ctx, cluster_uuid, node_group_uuid).await {
                Ok(node_group) => {
                    let phase = node_group.state.clone();
                    phase_outcome(kind, node_group_uuid, &phase, node_group)
                }
                Err(err) => read_error_outcome(err),
            }
        })
        .await?;
        info!(cluster_uuid, node_group_uuid, "iks node group active");
        Ok(node_group)
    }

    /// Fetches one node group of a cluster.
    pub async fn get_node_group(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        node_group_uuid: &str,
    ) -> IdcResult<NodeGroup> {
        let url = IKS_NODE_GROUP.expand(
            &self
                .params()
                .with(CLUSTER_UUID, cluster_uuid)
                .with(NODE_GROUP_UUID, node_group_uuid),
        )?;
        self.api.get(ctx, &url).await
    }

    /// Deletes a node group. A node group that no longer exists counts as deleted.
    pub async fn delete_node_group(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        node_group_uuid: &str,
    ) -> IdcResult<()> {
        let url = IKS_NODE_GROUP.expand(
            &self
                .params()
                .with(CLUSTER_UUID, cluster_uuid)
                .with(NODE_GROUP_UUID, node_group_uuid),
        )?;
        let result = self.api.delete(ctx, &url).await;
        ignore_not_found(ResourceKind::NodeGroup, node_group_uuid, result)?;
        info!(cluster_uuid, node_group_uuid, "iks node group deleted");
        Ok(())
    }
}

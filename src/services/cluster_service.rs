use super::{IdcServicesClient, WaitMode, ignore_not_found, phase_outcome, read_error_outcome};
use crate::core::{
    domain::{
        error::IdcResult,
        model::{
            iks_cluster::{IksCluster, IksClusters, IksCreateRequest},
            status::ResourceKind,
        },
    },
    infrastructure::{
        context::OperationContext,
        poller::poll,
        url_template::{CLUSTER_UUID, IKS_CLUSTER, IKS_CLUSTERS},
    },
};
use tracing::{info, warn};

impl IdcServicesClient {
    /// Lists the IKS clusters of the cloud account.
    pub async fn list_clusters(&self, ctx: &OperationContext) -> IdcResult<IksClusters> {
        let url = IKS_CLUSTERS.expand(&self.params())?;
        self.api.get(ctx, &url).await
    }

    /// Creates an IKS cluster.
    ///
    /// With [`WaitMode::Wait`] the cluster is polled until `Active`; a `Failed`
    /// phase or an expired window is an error. With [`WaitMode::Detached`]
    /// the cluster is read once and returned in whatever phase it is.
    pub async fn create_cluster(
        &self,
        ctx: &OperationContext,
        request: &IksCreateRequest,
        mode: WaitMode,
    ) -> IdcResult<IksCluster> {
        let created = self.submit_cluster(ctx, request).await?;
        self.await_cluster(ctx, &created.resource_id, mode).await
    }

    /// Sends the create request only. The returned document carries the new uuid.
    pub async fn submit_cluster(
        &self,
        ctx: &OperationContext,
        request: &IksCreateRequest,
    ) -> IdcResult<IksCluster> {
        let url = IKS_CLUSTERS.expand(&self.params())?;
        info!(name = %request.name, k8s_version = %request.k8s_version, "creating iks cluster");
        let created: IksCluster = self.api.post(ctx, &url, request).await?;
        info!(cluster_uuid = %created.resource_id, state = %created.cluster_state, "iks cluster create accepted");
        Ok(created)
    }

    /// Waits for a submitted cluster according to `mode`.
    pub async fn await_cluster(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        mode: WaitMode,
    ) -> IdcResult<IksCluster> {
        if mode == WaitMode::Detached {
            warn!(cluster_uuid, "iks cluster create not awaited");
            return self.get_cluster(ctx, cluster_uuid).await;
        }

        let kind = ResourceKind::Cluster;
        let cluster = poll(ctx, self.poll.cluster, kind.display_name(), move || async move {
            match self.get_cluster(ctx, cluster_uuid).await {
                Ok(cluster) => {
                    let phase = cluster.cluster_state.clone();
                    phase_outcome(kind, cluster_uuid, &phase, cluster)
                }
                Err(err) => read_error_outcome(err),
            }
        })
        .await?;
        info!(cluster_uuid, "iks cluster active");
        Ok(cluster)
    }

    /// Fetches a cluster with its node groups, storages and VIPs.
    pub async fn get_cluster(&self, ctx: &OperationContext, cluster_uuid: &str) -> IdcResult<IksCluster> {
        let url = IKS_CLUSTER.expand(&self.params().with(CLUSTER_UUID, cluster_uuid))?;
        self.api.get(ctx, &url).await
    }

    /// Deletes a cluster. A cluster that no longer exists counts as deleted.
    pub async fn delete_cluster(&self, ctx: &OperationContext, cluster_uuid: &str) -> IdcResult<()> {
        let url = IKS_CLUSTER.expand(&self.params().with(CLUSTER_UUID, cluster_uuid))?;
        let result = self.api.delete(ctx, &url).await;
        ignore_not_found(ResourceKind::Cluster, cluster_uuid, result)?;
        info!(cluster_uuid, "iks cluster deleted");
        Ok(())
    }
}

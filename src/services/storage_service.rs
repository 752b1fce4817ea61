use super::{IdcServicesClient, read_error_outcome};
use crate::core::{
    domain::{
        error::{IdcError, IdcResult},
        model::{
            cluster_storage::{IksStorageCreateRequest, K8sStorage, find_storage},
            status::{PHASE_ACTIVE, PHASE_FAILED, ResourceKind},
        },
    },
    infrastructure::{
        context::OperationContext,
        poller::{PollOutcome, poll},
        url_template::{CLUSTER_UUID, IKS_STORAGE},
    },
};
use tracing::info;

/// The size the server listed the new storage under, or the requested size
/// when the create response left it blank.
pub(crate) fn accepted_size<'a>(
    request: &'a IksStorageCreateRequest,
    accepted: &'a K8sStorage,
) -> &'a str {
    if accepted.size.is_empty() {
        request.size.as_str()
    } else {
        accepted.size.as_str()
    }
}

impl IdcServicesClient {
    /// Enables file storage of `request.size` on a cluster and waits until
    /// the matching entry is `Active`.
    pub async fn create_storage(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        request: &IksStorageCreateRequest,
    ) -> IdcResult<K8sStorage> {
        let accepted = self.submit_storage(ctx, cluster_uuid, request).await?;
        self.await_storage(ctx, cluster_uuid, accepted_size(request, &accepted))
            .await
    }

    /// Sends the storage request only.
    pub async fn submit_storage(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        request: &IksStorageCreateRequest,
    ) -> IdcResult<K8sStorage> {
        let url = IKS_STORAGE.expand(&self.params().with(CLUSTER_UUID, cluster_uuid))?;
        info!(cluster_uuid, size = %request.size, "creating iks file storage");
        self.api.post(ctx, &url, request).await
    }

    /// Polls the parent cluster until its storage of `size` is `Active`.
    ///
    /// The whole `storages` list is scanned for the first entry of that size
    /// (ASCII case-insensitive); while none matches the poll keeps retrying.
    pub async fn await_storage(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        size: &str,
    ) -> IdcResult<K8sStorage> {
        let kind = ResourceKind::Storage;
        let storage = poll(ctx, self.poll.storage, kind.display_name(), move || async move {
            let cluster = match self.get_cluster(ctx, cluster_uuid).await {
                Ok(cluster) => cluster,
                Err(err) => return read_error_outcome(err),
            };
            match find_storage(&cluster.storages, size) {
                Some(found) if found.state == PHASE_ACTIVE => PollOutcome::Done(found.clone()),
                Some(found) if found.state == PHASE_FAILED => PollOutcome::Fail(IdcError::StateFailed {
                    resource: kind.display_name().to_string(),
                    id: format!("{}/{}", cluster_uuid, size),
                    state: found.state.clone(),
                }),
                Some(found) => PollOutcome::Retry(format!("storage {} is {}", size, found.state)),
                None => PollOutcome::Retry(format!("no storage of size {} listed yet", size)),
            }
        })
        .await?;
        info!(cluster_uuid, size = %storage.size, provider = %storage.provider, "iks file storage active");
        Ok(storage)
    }
}

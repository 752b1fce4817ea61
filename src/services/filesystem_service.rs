use super::{IdcServicesClient, ignore_not_found};
use crate::core::{
    domain::{
        error::IdcResult,
        model::{
            filesystem::{Filesystem, FilesystemCreateRequest, FilesystemList},
            status::ResourceKind,
        },
    },
    infrastructure::{
        context::OperationContext,
        url_template::{FILESYSTEM, FILESYSTEMS, RESOURCE_ID},
    },
};
use tracing::info;

impl IdcServicesClient {
    /// Lists every filesystem of the cloud account.
    pub async fn list_filesystems(&self, ctx: &OperationContext) -> IdcResult<Vec<Filesystem>> {
        let url = FILESYSTEMS.expand(&self.params())?;
        let list: FilesystemList = self.api.get(ctx, &url).await?;
        Ok(list.items)
    }

    /// Creates a filesystem and returns the document from the create response.
    ///
    /// Filesystem creation is not polled: the returned phase is usually
    /// `FSProvisioning`, and later reads observe convergence.
    pub async fn create_filesystem(
        &self,
        ctx: &OperationContext,
        request: &FilesystemCreateRequest,
    ) -> IdcResult<Filesystem> {
        let url = FILESYSTEMS.expand(&self.params())?;
        info!(name = %request.metadata.name, size = %request.spec.request.size, "creating filesystem");
        let filesystem: Filesystem = self.api.post(ctx, &url, request).await?;
        info!(
            resource_id = %filesystem.metadata.resource_id,
            phase = %filesystem.status.phase,
            "filesystem create accepted"
        );
        Ok(filesystem)
    }

    /// Fetches a filesystem by its server-assigned id.
    pub async fn get_filesystem(
        &self,
        ctx: &OperationContext,
        resource_id: &str,
    ) -> IdcResult<Filesystem> {
        let url = FILESYSTEM.expand(&self.params().with(RESOURCE_ID, resource_id))?;
        self.api.get(ctx, &url).await
    }

    /// Deletes a filesystem. A filesystem that no longer exists counts as deleted.
    pub async fn delete_filesystem(&self, ctx: &OperationContext, resource_id: &str) -> IdcResult<()> {
        let url = FILESYSTEM.expand(&self.params().with(RESOURCE_ID, resource_id))?;
        let result = self.api.delete(ctx, &url).await;
        ignore_not_found(ResourceKind::Filesystem, resource_id, result)?;
        info!(resource_id, "filesystem deleted");
        Ok(())
    }
}

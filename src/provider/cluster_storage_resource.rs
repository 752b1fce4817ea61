use super::{
    node_group_resource::split_child_id,
    resource::{Outcome, Resource},
    schema::{Attribute, AttributeType, Schema},
};
use crate::{
    core::{
        domain::model::{
            cluster_storage::{IksStorageCreateRequest, K8sStorage, find_storage},
            status::{ResourceKind, ResourceStatus, project},
        },
        domain::value_object::StorageSize,
        infrastructure::context::OperationContext,
    },
    services::{IdcServicesClient, accepted_size},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const IKS_CLUSTER_STORAGE_TYPE_NAME: &str = "intelcloud_iks_cluster_storage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStoragePlan {
    pub cluster_uuid: String,
    /// `<N>GB` or `<N>TB`.
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStorageState {
    pub id: String,
    pub cluster_uuid: String,
    pub cloudaccount: String,
    pub size: String,
    pub provider: String,
    pub state: String,
    pub status: ResourceStatus,
}

impl ClusterStorageState {
    /// `size` is the configured value; `listed` is the size the cluster lists
    /// the entry under and forms the identity.
    fn new(
        cloudaccount: &str,
        cluster_uuid: &str,
        size: &str,
        listed: &str,
        storage: &K8sStorage,
    ) -> Self {
        Self {
            id: format!("{}/{}", cluster_uuid, listed),
            cluster_uuid: cluster_uuid.to_string(),
            cloudaccount: cloudaccount.to_string(),
            size: size.to_string(),
            provider: storage.provider.clone(),
            state: storage.state.clone(),
            status: project(ResourceKind::Storage, &storage.state),
        }
    }
}

/// Adapter for `intelcloud_iks_cluster_storage`.
///
/// A storage entry has no identifier of its own; it is addressed by the
/// parent cluster and its size.
#[derive(Debug, Clone)]
pub struct ClusterStorageResource {
    client: IdcServicesClient,
}

impl ClusterStorageResource {
    pub fn new(client: IdcServicesClient) -> Self {
        Self { client }
    }

    async fn lookup(
        &self,
        ctx: &OperationContext,
        cluster_uuid: &str,
        listed: &str,
        size: &str,
    ) -> Outcome<ClusterStorageState> {
        let cluster = match self.client.get_cluster(ctx, cluster_uuid).await {
            Ok(cluster) => cluster,
            Err(err) if err.is_not_found() => {
                warn!(cluster_uuid, size = listed, "parent iks cluster not found, removing storage from state");
                return Outcome::removed();
            }
            Err(err) => {
                return Outcome::failed(
                    None,
                    format!("Error reading iks file storage {}/{}", cluster_uuid, listed),
                    &err,
                );
            }
        };
        match find_storage(&cluster.storages, listed) {
            Some(storage) => Outcome::ok(ClusterStorageState::new(
                self.client.cloud_account(),
                cluster_uuid,
                size,
                listed,
                storage,
            )),
            None => {
                warn!(cluster_uuid, size = listed, "iks file storage not listed, removing from state");
                Outcome::removed()
            }
        }
    }
}

#[async_trait]
impl Resource for ClusterStorageResource {
    type Plan = ClusterStoragePlan;
    type State = ClusterStorageState;

    fn type_name(&self) -> &'static str {
        IKS_CLUSTER_STORAGE_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("File storage enabled on an IKS cluster.")
            .attribute("id", Attribute::computed(AttributeType::String))
            .attribute("cloudaccount", Attribute::computed(AttributeType::String))
            .attribute(
                "cluster_uuid",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .attribute(
                "size",
                Attribute::required(AttributeType::String)
                    .requires_replace()
                    .describe("Storage size, e.g. 30GB or 1TB."),
            )
            .attribute("provider", Attribute::computed(AttributeType::String))
            .attribute("state", Attribute::computed(AttributeType::String))
            .attribute("status", Attribute::computed(AttributeType::String))
    }

    async fn create(
        &self,
        ctx: &OperationContext,
        plan: ClusterStoragePlan,
    ) -> Outcome<ClusterStorageState> {
        let requested = match plan.size.parse::<StorageSize>() {
            Ok(size) => size.to_string(),
            Err(err) => {
                let mut outcome = Outcome::removed();
                outcome
                    .diagnostics
                    .add_attribute_error("size", "Invalid storage size", err.to_string());
                return outcome;
            }
        };
        let cloudaccount = self.client.cloud_account();
        let request = IksStorageCreateRequest {
            enable: true,
            size: requested,
        };

        let accepted = match self
            .client
            .submit_storage(ctx, &plan.cluster_uuid, &request)
            .await
        {
            Ok(accepted) => accepted,
            Err(err) => return Outcome::failed(None, "Error creating iks file storage", &err),
        };
        let listed = accepted_size(&request, &accepted);
        let partial =
            ClusterStorageState::new(cloudaccount, &plan.cluster_uuid, &plan.size, listed, &accepted);

        match self.client.await_storage(ctx, &plan.cluster_uuid, listed).await {
            Ok(storage) => Outcome::ok(ClusterStorageState::new(
                cloudaccount,
                &plan.cluster_uuid,
                &plan.size,
                listed,
                &storage,
            )),
            Err(err) => Outcome::failed(
                Some(partial),
                format!("Error waiting for iks file storage {}", listed),
                &err,
            ),
        }
    }

    async fn read(
        &self,
        ctx: &OperationContext,
        state: ClusterStorageState,
    ) -> Outcome<ClusterStorageState> {
        let listed = split_child_id(&state.id)
            .map_or_else(|| state.size.clone(), |(_, listed)| listed.to_string());
        let outcome = self.lookup(ctx, &state.cluster_uuid, &listed, &state.size).await;
        if outcome.has_error() {
            return Outcome::with_diagnostics(Some(state), outcome.diagnostics);
        }
        outcome
    }

    async fn delete(
        &self,
        _ctx: &OperationContext,
        state: ClusterStorageState,
    ) -> Outcome<ClusterStorageState> {
        warn!(id = %state.id, "iks file storage has no delete endpoint, dropping from state");
        Outcome::removed().with_warning(
            "Storage not deleted",
            format!(
                "iks file storage {} cannot be deleted on its own; it is released with cluster {}",
                state.size, state.cluster_uuid
            ),
        )
    }

    /// Imports `<cluster_uuid>/<size>`.
    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<ClusterStorageState> {
        let Some((cluster_uuid, size)) = split_child_id(id) else {
            let mut outcome = Outcome::removed();
            outcome.diagnostics.add_error(
                "Invalid import id",
                format!("expected <cluster_uuid>/<size>, got {:?}", id),
            );
            return outcome;
        };
        let outcome = self.lookup(ctx, cluster_uuid, size, size).await;
        if outcome.state.is_none() && !outcome.has_error() {
            let mut outcome = outcome;
            outcome.diagnostics.add_error(
                "Cannot import non-existent storage",
                format!("cluster {} has no storage of size {}", cluster_uuid, size),
            );
            return outcome;
        }
        outcome
    }
}

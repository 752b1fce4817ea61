use super::{
    resource::{Outcome, Resource},
    schema::{Attribute, AttributeType, Schema},
};
use crate::{
    core::{
        domain::{
            model::{
                filesystem::{
                    ACCESS_MODE_READ_WRITE, FILESYSTEM_TYPE_COMPUTE_GENERAL, Filesystem,
                    FilesystemCreateMetadata, FilesystemCreateRequest, FilesystemMount,
                    FilesystemSpec, INSTANCE_TYPE_STORAGE_FILE, STORAGE_CLASS_GENERAL_PURPOSE,
                    SizeRequest,
                },
                status::{ResourceKind, ResourceStatus, project},
            },
            value_object::StorageSize,
        },
        infrastructure::context::OperationContext,
    },
    services::IdcServicesClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use tracing::warn;

pub const FILESYSTEM_TYPE_NAME: &str = "intelcloud_filesystem";

fn default_access_mode() -> String {
    ACCESS_MODE_READ_WRITE.to_string()
}

fn default_encrypted() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemPlan {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub size_in_tb: u64,
    #[serde(default = "default_access_mode")]
    pub access_mode: String,
    #[serde(default = "default_encrypted")]
    pub encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub cluster_address: String,
    pub cluster_version: String,
}

impl From<&FilesystemMount> for ClusterInfo {
    fn from(mount: &FilesystemMount) -> Self {
        Self {
            cluster_address: mount.cluster_addr.clone(),
            cluster_version: mount.cluster_version.clone(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessInfo {
    pub namespace: String,
    pub filesystem_name: String,
    pub username: String,
    pub password: String,
}

impl From<&FilesystemMount> for AccessInfo {
    fn from(mount: &FilesystemMount) -> Self {
        Self {
            namespace: mount.namespace.clone(),
            filesystem_name: mount.filesystem_name.clone(),
            username: mount.username.clone(),
            password: mount.password.clone(),
        }
    }
}

impl fmt::Debug for AccessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessInfo")
            .field("namespace", &self.namespace)
            .field("filesystem_name", &self.filesystem_name)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Filesystem state as kept by the host.
///
/// `size_in_tb` round-trips the user's value; `size_in_gb` is the size the
/// server reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemState {
    pub id: String,
    pub cloudaccount: String,
    pub name: String,
    pub description: String,
    pub size_in_tb: u64,
    pub size_in_gb: u64,
    pub access_mode: String,
    pub encrypted: bool,
    pub storage_class: String,
    pub filesystem_type: String,
    pub availability_zone: String,
    pub status: ResourceStatus,
    pub cluster_info: ClusterInfo,
    pub access_info: AccessInfo,
}

impl FilesystemState {
    /// Projects a filesystem document. `size` is the parsed server size, or
    /// `None` when the server sent something unparsable.
    fn from_document(doc: &Filesystem, size: Option<StorageSize>, fallback_tb: u64) -> Self {
        let (size_in_tb, size_in_gb) = match size {
            Some(size) => (size.in_tb(), size.in_gb()),
            None => (fallback_tb, StorageSize::from_tb(fallback_tb).in_gb()),
        };
        Self {
            id: doc.metadata.resource_id.clone(),
            cloudaccount: doc.metadata.cloud_account.clone(),
            name: doc.metadata.name.clone(),
            description: doc.metadata.description.clone(),
            size_in_tb,
            size_in_gb,
            access_mode: doc.spec.access_mode.clone(),
            encrypted: doc.spec.encrypted,
            storage_class: doc.spec.storage_class.clone(),
            filesystem_type: doc.spec.filesystem_type.clone(),
            availability_zone: doc.spec.availability_zone.clone(),
            status: project(ResourceKind::Filesystem, &doc.status.phase),
            cluster_info: ClusterInfo::from(&doc.status.mount),
            access_info: AccessInfo::from(&doc.status.mount),
        }
    }
}

/// Adapter for `intelcloud_filesystem`.
#[derive(Debug, Clone)]
pub struct FilesystemResource {
    client: IdcServicesClient,
}

impl FilesystemResource {
    pub fn new(client: IdcServicesClient) -> Self {
        Self { client }
    }

    fn build_request(&self, plan: &FilesystemPlan) -> FilesystemCreateRequest {
        FilesystemCreateRequest {
            metadata: FilesystemCreateMetadata {
                name: plan.name.clone(),
                description: plan.description.clone(),
            },
            spec: FilesystemSpec {
                request: SizeRequest {
                    size: StorageSize::from_tb(plan.size_in_tb).to_string(),
                },
                storage_class: STORAGE_CLASS_GENERAL_PURPOSE.to_string(),
                access_mode: plan.access_mode.clone(),
                filesystem_type: FILESYSTEM_TYPE_COMPUTE_GENERAL.to_string(),
                instance_type: INSTANCE_TYPE_STORAGE_FILE.to_string(),
                encrypted: plan.encrypted,
                availability_zone: self.client.connection().region().availability_zone(),
            },
        }
    }

    /// Projects a document, filling what the server left blank from `known`.
    fn project(&self, doc: &Filesystem, known: Option<&FilesystemState>) -> FilesystemState {
        let size = parse_size(&doc.spec.request.size);
        let fallback_tb = known.map_or(0, |k| k.size_in_tb);
        let mut state = FilesystemState::from_document(doc, size, fallback_tb);

        if state.cloudaccount.is_empty() {
            state.cloudaccount = self.client.cloud_account().to_string();
        }
        if let Some(known) = known {
            fill_blank(&mut state.id, &known.id);
            fill_blank(&mut state.name, &known.name);
            fill_blank(&mut state.access_mode, &known.access_mode);
            fill_blank(&mut state.storage_class, &known.storage_class);
            fill_blank(&mut state.filesystem_type, &known.filesystem_type);
            fill_blank(&mut state.availability_zone, &known.availability_zone);
        }
        state
    }
}

fn fill_blank(target: &mut String, fallback: &str) {
    if target.is_empty() {
        *target = fallback.to_string();
    }
}

fn parse_size(raw: &str) -> Option<StorageSize> {
    match raw.parse::<StorageSize>() {
        Ok(size) => Some(size),
        Err(err) => {
            if !raw.is_empty() {
                warn!(size = raw, error = %err, "unrecognised filesystem size");
            }
            None
        }
    }
}

#[async_trait]
impl Resource for FilesystemResource {
    type Plan = FilesystemPlan;
    type State = FilesystemState;

    fn type_name(&self) -> &'static str {
        FILESYSTEM_TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("A file storage volume.")
            .attribute("id", Attribute::computed(AttributeType::String))
            .attribute("cloudaccount", Attribute::computed(AttributeType::String))
            .attribute(
                "name",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .attribute(
                "description",
                Attribute::optional(AttributeType::String).requires_replace(),
            )
            .attribute(
                "size_in_tb",
                Attribute::required(AttributeType::Int64)
                    .requires_replace()
                    .describe("Size in whole terabytes."),
            )
            .attribute(
                "size_in_gb",
                Attribute::computed(AttributeType::Int64).describe("Size reported by the server."),
            )
            .attribute(
                "access_mode",
                Attribute::with_default(AttributeType::String, json!(ACCESS_MODE_READ_WRITE))
                    .requires_replace(),
            )
            .attribute(
                "encrypted",
                Attribute::with_default(AttributeType::Bool, json!(true)).requires_replace(),
            )
            .attribute("storage_class", Attribute::computed(AttributeType::String))
            .attribute("filesystem_type", Attribute::computed(AttributeType::String))
            .attribute("availability_zone", Attribute::computed(AttributeType::String))
            .attribute("status", Attribute::computed(AttributeType::String))
            .attribute(
                "cluster_info",
                Attribute::computed(AttributeType::Object).nested([
                    ("cluster_address", Attribute::computed(AttributeType::String)),
                    ("cluster_version", Attribute::computed(AttributeType::String)),
                ]),
            )
            .attribute(
                "access_info",
                Attribute::computed(AttributeType::Object).nested([
                    ("namespace", Attribute::computed(AttributeType::String)),
                    ("filesystem_name", Attribute::computed(AttributeType::String)),
                    ("username", Attribute::computed(AttributeType::String)),
                    ("password", Attribute::computed(AttributeType::String).sensitive()),
                ]),
            )
    }

    async fn create(&self, ctx: &OperationContext, plan: FilesystemPlan) -> Outcome<FilesystemState> {
        if plan.size_in_tb == 0 {
            let mut outcome = Outcome::removed();
            outcome.diagnostics.add_attribute_error(
                "size_in_tb",
                "Invalid filesystem size",
                "size_in_tb must be at least 1",
            );
            return outcome;
        }

        let request = self.build_request(&plan);
        match self.client.create_filesystem(ctx, &request).await {
            Ok(doc) => {
                let mut state = self.project(&doc, None);
                // The create response echoes the request; keep what the user wrote.
                state.name = plan.name;
                state.description = plan.description;
                state.size_in_tb = plan.size_in_tb;
                state.encrypted = plan.encrypted;
                fill_blank(&mut state.access_mode, &plan.access_mode);
                fill_blank(&mut state.storage_class, STORAGE_CLASS_GENERAL_PURPOSE);
                fill_blank(&mut state.filesystem_type, FILESYSTEM_TYPE_COMPUTE_GENERAL);
                fill_blank(&mut state.availability_zone, &request.spec.availability_zone);
                if parse_size(&doc.spec.request.size).is_none() {
                    state.size_in_gb = StorageSize::from_tb(plan.size_in_tb).in_gb();
                }
                Outcome::ok(state)
            }
            Err(err) => Outcome::failed(None, "Error creating filesystem", &err),
        }
    }

    async fn read(&self, ctx: &OperationContext, state: FilesystemState) -> Outcome<FilesystemState> {
        match self.client.get_filesystem(ctx, &state.id).await {
            Ok(doc) => Outcome::ok(self.project(&doc, Some(&state))),
            Err(err) if err.is_not_found() => {
                warn!(resource_id = %state.id, "filesystem not found, removing from state");
                Outcome::removed()
            }
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error reading filesystem {}", state.id),
                &err,
            ),
        }
    }

    async fn delete(&self, ctx: &OperationContext, state: FilesystemState) -> Outcome<FilesystemState> {
        match self.client.delete_filesystem(ctx, &state.id).await {
            Ok(()) => Outcome::removed(),
            Err(err) => Outcome::failed(
                Some(state.clone()),
                format!("Error deleting filesystem {}", state.id),
                &err,
            ),
        }
    }

    async fn import(&self, ctx: &OperationContext, id: &str) -> Outcome<FilesystemState> {
        match self.client.get_filesystem(ctx, id).await {
            Ok(doc) => Outcome::ok(self.project(&doc, None)),
            Err(err) => Outcome::failed(None, format!("Error importing filesystem {}", id), &err),
        }
    }
}

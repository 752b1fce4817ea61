//! Wire models for the `/v1/cloudaccounts/{ca}/filesystems` endpoints.
//!
//! Field names are the API's own and must not change.

use crate::core::domain::value_object::serde_helpers::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage class every filesystem is created with.
pub const STORAGE_CLASS_GENERAL_PURPOSE: &str = "GeneralPurpose";
/// Filesystem type every filesystem is created with.
pub const FILESYSTEM_TYPE_COMPUTE_GENERAL: &str = "ComputeGeneral";
/// Product instance type for file storage.
pub const INSTANCE_TYPE_STORAGE_FILE: &str = "storage-file";
/// Default access mode.
pub const ACCESS_MODE_READ_WRITE: &str = "ReadWrite";

/// Body of `POST /filesystems`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilesystemCreateRequest {
    pub metadata: FilesystemCreateMetadata,
    pub spec: FilesystemSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilesystemCreateMetadata {
    pub name: String,
    pub description: String,
}

/// The filesystem spec, shared by the create request and the resource document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct FilesystemSpec {
    #[serde(default)]
    pub request: SizeRequest,
    #[serde(rename = "storageClass", default)]
    pub storage_class: String,
    #[serde(rename = "accessModes", default)]
    pub access_mode: String,
    #[serde(rename = "filesystemType", default)]
    pub filesystem_type: String,
    #[serde(rename = "instanceType", default)]
    pub instance_type: String,
    #[serde(rename = "Encrypted", default)]
    pub encrypted: bool,
    #[serde(rename = "availabilityZone", default)]
    pub availability_zone: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct SizeRequest {
    /// `"<N>TB"` on create; the API reports it back as `"<M>GB"`.
    #[serde(rename = "storage", default)]
    pub size: String,
}

/// A filesystem document as returned by create, get and list.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Filesystem {
    #[serde(default)]
    pub metadata: FilesystemMetadata,
    #[serde(default)]
    pub spec: FilesystemSpec,
    #[serde(default)]
    pub status: FilesystemStatus,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct FilesystemMetadata {
    #[serde(rename = "resourceId", default)]
    pub resource_id: String,
    #[serde(rename = "cloudAccountId", default)]
    pub cloud_account: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct FilesystemStatus {
    #[serde(default)]
    pub phase: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub mount: FilesystemMount,
}

/// Mount and credential details, populated once the filesystem is ready.
#[derive(Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct FilesystemMount {
    #[serde(rename = "clusterAddr", default)]
    pub cluster_addr: String,
    #[serde(rename = "clusterVersion", default)]
    pub cluster_version: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(rename = "filesystemName", default)]
    pub filesystem_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for FilesystemMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemMount")
            .field("cluster_addr", &self.cluster_addr)
            .field("cluster_version", &self.cluster_version)
            .field("namespace", &self.namespace)
            .field("filesystem_name", &self.filesystem_name)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Body of `GET /filesystems`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct FilesystemList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Filesystem>,
}

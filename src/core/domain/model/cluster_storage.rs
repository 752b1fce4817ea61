//! Wire models for `/iks/clusters/{uuid}/storage`.

use serde::{Deserialize, Serialize};

/// Body of `POST /storage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IksStorageCreateRequest {
    #[serde(rename = "enablestorage")]
    pub enable: bool,
    #[serde(rename = "storagesize")]
    pub size: String,
}

/// A storage entry of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct K8sStorage {
    #[serde(rename = "storageprovider", default)]
    pub provider: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub state: String,
}

impl K8sStorage {
    /// Storage entries are identified by size alone; sizes compare ASCII case-insensitively.
    pub fn has_size(&self, size: &str) -> bool {
        self.size.eq_ignore_ascii_case(size)
    }
}

/// The first entry of `storages` whose size equals `size`.
pub fn find_storage<'a>(storages: &'a [K8sStorage], size: &str) -> Option<&'a K8sStorage> {
    storages.iter().find(|storage| storage.has_size(size))
}

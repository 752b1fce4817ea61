//! Projection of upstream lifecycle phases onto the provider's public status vocabulary.
//!
//! Upstream phases are matched case-sensitively. This module is the only place
//! where the lowercase public vocabulary is produced or accepted back.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream phase of an IKS object that has reached its goal.
pub const PHASE_ACTIVE: &str = "Active";
/// Upstream phase of an IKS object that will never converge.
pub const PHASE_FAILED: &str = "Failed";

/// The resource kinds the provider manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Filesystem,
    Cluster,
    NodeGroup,
    Storage,
    LoadBalancer,
}

impl ResourceKind {
    /// Human name used in log lines and error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Filesystem => "filesystem",
            ResourceKind::Cluster => "iks cluster",
            ResourceKind::NodeGroup => "iks node group",
            ResourceKind::Storage => "iks file storage",
            ResourceKind::LoadBalancer => "iks load balancer",
        }
    }
}

/// Public, stable status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Ready,
    Provisioning,
    Failed,
    Deleting,
    Deleted,
    Active,
    Unspecified,
}

impl ResourceStatus {
    pub const ALL: [ResourceStatus; 7] = [
        ResourceStatus::Ready,
        ResourceStatus::Provisioning,
        ResourceStatus::Failed,
        ResourceStatus::Deleting,
        ResourceStatus::Deleted,
        ResourceStatus::Active,
        ResourceStatus::Unspecified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Ready => "ready",
            ResourceStatus::Provisioning => "provisioning",
            ResourceStatus::Failed => "failed",
            ResourceStatus::Deleting => "deleting",
            ResourceStatus::Deleted => "deleted",
            ResourceStatus::Active => "active",
            ResourceStatus::Unspecified => "unspecified",
        }
    }

    fn from_public(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an upstream phase of `kind` to its public status. Total and pure:
/// unknown phases map to [`ResourceStatus::Unspecified`], and an already
/// projected value maps to itself.
pub fn project(kind: ResourceKind, raw: &str) -> ResourceStatus {
    let upstream = match kind {
        ResourceKind::Filesystem => project_filesystem(raw),
        ResourceKind::Cluster
        | ResourceKind::NodeGroup
        | ResourceKind::Storage
        | ResourceKind::LoadBalancer => project_iks(raw),
    };
    upstream
        .or_else(|| ResourceStatus::from_public(raw))
        .unwrap_or(ResourceStatus::Unspecified)
}

fn project_filesystem(raw: &str) -> Option<ResourceStatus> {
    match raw {
        "FSReady" => Some(ResourceStatus::Ready),
        "FSProvisioning" => Some(ResourceStatus::Provisioning),
        "FSFailed" => Some(ResourceStatus::Failed),
        "FSDeleting" => Some(ResourceStatus::Deleting),
        "FSDeleted" => Some(ResourceStatus::Deleted),
        _ => None,
    }
}

fn project_iks(raw: &str) -> Option<ResourceStatus> {
    match raw {
        PHASE_ACTIVE => Some(ResourceStatus::Active),
        "Pending" | "Provisioning" | "Creating" | "Updating" => Some(ResourceStatus::Provisioning),
        PHASE_FAILED | "Error" => Some(ResourceStatus::Failed),
        "Deleting" => Some(ResourceStatus::Deleting),
        "Deleted" => Some(ResourceStatus::Deleted),
        _ => None,
    }
}

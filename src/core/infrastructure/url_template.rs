//! Named URL templates for every IDC endpoint and their expansion.

use crate::core::domain::error::{IdcError, IdcResult};
use tera::{Context, Tera};

/// Placeholder for the API base URL.
pub const HOST: &str = "Host";
/// Placeholder for the tenant scope.
pub const CLOUDACCOUNT: &str = "Cloudaccount";
pub const CLUSTER_UUID: &str = "ClusterUUID";
pub const NODE_GROUP_UUID: &str = "NodeGroupUUID";
pub const VIP_ID: &str = "VipID";
pub const RESOURCE_ID: &str = "ResourceId";

/// A URL template with `{{ Name }}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTemplate {
    name: &'static str,
    source: &'static str,
}

pub const IKS_CLUSTERS: UrlTemplate = UrlTemplate::new(
    "iks_clusters",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/iks/clusters",
);
pub const IKS_CLUSTER: UrlTemplate = UrlTemplate::new(
    "iks_cluster",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/iks/clusters/{{ ClusterUUID }}",
);
pub const IKS_NODE_GROUPS: UrlTemplate = UrlTemplate::new(
    "iks_node_groups",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/iks/clusters/{{ ClusterUUID }}/nodegroups",
);
pub const IKS_NODE_GROUP: UrlTemplate = UrlTemplate::new(
    "iks_node_group",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/iks/clusters/{{ ClusterUUID }}/nodegroups/{{ NodeGroupUUID }}",
);
pub const IKS_STORAGE: UrlTemplate = UrlTemplate::new(
    "iks_storage",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/iks/clusters/{{ ClusterUUID }}/storage",
);
pub const IKS_VIPS: UrlTemplate = UrlTemplate::new(
    "iks_vips",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/iks/clusters/{{ ClusterUUID }}/vips",
);
pub const IKS_VIP: UrlTemplate = UrlTemplate::new(
    "iks_vip",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/iks/clusters/{{ ClusterUUID }}/vips/{{ VipID }}",
);
pub const FILESYSTEMS: UrlTemplate = UrlTemplate::new(
    "filesystems",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/filesystems",
);
pub const FILESYSTEM: UrlTemplate = UrlTemplate::new(
    "filesystem",
    "{{ Host }}/v1/cloudaccounts/{{ Cloudaccount }}/filesystems/id/{{ ResourceId }}",
);

/// Parameter bag for [`UrlTemplate::expand`].
#[derive(Debug, Clone, Default)]
pub struct UrlParams {
    values: Vec<(&'static str, String)>,
}

impl UrlParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter. Empty values are treated as missing.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.values.push((key, value.to_string()));
        self
    }

    fn context(&self) -> IdcResult<Context> {
        let mut context = Context::new();
        for (key, value) in &self.values {
            if value.is_empty() {
                continue;
            }
            if *key != HOST && !is_path_segment(value) {
                return Err(IdcError::Template(format!(
                    "parameter {} is not a valid path segment: {:?}",
                    key, value
                )));
            }
            context.insert(*key, value);
        }
        Ok(context)
    }
}

fn is_path_segment(value: &str) -> bool {
    !value
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
}

impl UrlTemplate {
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Expands the template. A missing or empty parameter is a
    /// [`IdcError::Template`] error, raised before any network call.
    pub fn expand(&self, params: &UrlParams) -> IdcResult<String> {
        let context = params.context()?;
        let url = Tera::one_off(self.source, &context, false)
            .map_err(|e| IdcError::Template(format!("{}: {}", self.name, tera_error_detail(&e))))?;

        if url.contains("{{") || url.contains("}}") {
            return Err(IdcError::Template(format!(
                "{}: unresolved placeholder in {}",
                self.name, url
            )));
        }
        Ok(url)
    }
}

/// Flattens a tera error and its sources into one line.
fn tera_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    details.join(": ")
}

//! The IDC service client: one method per resource kind and verb.
//!
//! Every method builds its URL from a named template, sends one request through
//! the shared [`ApiClient`], and, for asynchronous creates, waits on the
//! matching poll window until the object converges or fails.

mod cluster_service;
mod filesystem_service;
mod load_balancer_service;
mod node_group_service;
mod storage_service;

pub(crate) use storage_service::accepted_size;

use crate::core::{
    domain::{
        error::{IdcError, IdcResult},
        model::{
            client_config::{ClientConfig, PollWindows},
            idc_connection::IdcConnection,
            status::{PHASE_ACTIVE, PHASE_FAILED, ResourceKind},
        },
    },
    infrastructure::{
        api_client::ApiClient,
        poller::PollOutcome,
        url_template::{CLOUDACCOUNT, HOST, UrlParams},
    },
};
use std::sync::Arc;

/// Whether an asynchronous create waits for convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitMode {
    /// Poll until the object is `Active`, `Failed` or the window closes.
    #[default]
    Wait,
    /// Return after one follow-up read, in whatever state the object is.
    Detached,
}

/// Process-wide client for the IDC control plane. Cheap to clone.
#[derive(Debug, Clone)]
pub struct IdcServicesClient {
    pub(crate) api: Arc<ApiClient>,
    pub(crate) poll: PollWindows,
}

impl IdcServicesClient {
    /// Creates a client for `connection`.
    ///
    /// # Errors
    /// Returns `IdcError::Validation` if `config` is inconsistent.
    pub fn new(connection: IdcConnection, config: ClientConfig) -> IdcResult<Self> {
        config.validate()?;
        let api = ApiClient::new(connection, &config)?;
        Ok(Self {
            api: Arc::new(api),
            poll: config.poll,
        })
    }

    pub fn connection(&self) -> &IdcConnection {
        self.api.connection()
    }

    /// The tenant every request is scoped to.
    pub fn cloud_account(&self) -> &str {
        self.connection().cloud_account().as_str()
    }

    /// Base template parameters shared by every endpoint.
    pub(crate) fn params(&self) -> UrlParams {
        let connection = self.connection();
        UrlParams::new()
            .with(HOST, connection.host().as_str())
            .with(CLOUDACCOUNT, connection.cloud_account().as_str())
    }
}

/// Maps one observation of an IKS object's phase onto a poll outcome.
pub(crate) fn phase_outcome<T>(kind: ResourceKind, id: &str, phase: &str, value: T) -> PollOutcome<T> {
    match phase {
        PHASE_ACTIVE => PollOutcome::Done(value),
        PHASE_FAILED => PollOutcome::Fail(IdcError::StateFailed {
            resource: kind.display_name().to_string(),
            id: id.to_string(),
            state: phase.to_string(),
        }),
        other => PollOutcome::Retry(format!(
            "{} {} is {}",
            kind.display_name(),
            id,
            if other.is_empty() { "<empty>" } else { other }
        )),
    }
}

/// Maps a failed read inside a poll: 5xx is worth another attempt, the rest is terminal.
pub(crate) fn read_error_outcome<T>(err: IdcError) -> PollOutcome<T> {
    if err.is_transient() {
        PollOutcome::Retry(err.to_string())
    } else {
        PollOutcome::Fail(err)
    }
}

/// Treats a 404 on delete as already gone.
pub(crate) fn ignore_not_found(kind: ResourceKind, id: &str, result: IdcResult<()>) -> IdcResult<()> {
    match result {
        Err(err) if err.is_not_found() => {
            tracing::warn!(
                resource = kind.display_name(),
                id,
                "delete target not found, treating as already deleted"
            );
            Ok(())
        }
        other => other,
    }
}

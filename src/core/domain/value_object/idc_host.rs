use crate::core::domain::error::ValidationError;

/// The base URL of the IDC control-plane API (e.g. `https://compute.api.idcservice.net`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdcHost(String);

impl IdcHost {
    /// Creates a validated host. A trailing slash is dropped.
    pub fn new(host: impl Into<String>) -> Result<Self, ValidationError> {
        let host = host.into();
        validate_host(&host)?;
        Ok(Self::new_unchecked(host))
    }

    /// Creates a new host without validation.
    pub(crate) fn new_unchecked(host: String) -> Self {
        Self(host.trim_end_matches('/').to_string())
    }

    /// Returns the host as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates that the host is an absolute http(s) URL without path extras.
pub(crate) fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.trim().is_empty() {
        return Err(ValidationError::field("host", "Host cannot be empty"));
    }

    let url = url::Url::parse(host)
        .map_err(|e| ValidationError::Format(format!("Invalid host URL: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme '{}'. Must be one of: https, http",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ValidationError::Format(
            "Host URL must include a hostname".to_string(),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::Format(
            "Host URL cannot carry a query or fragment".to_string(),
        ));
    }
    Ok(())
}

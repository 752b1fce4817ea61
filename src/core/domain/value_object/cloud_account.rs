use crate::core::domain::error::ValidationError;

/// The tenant scope under which every resource is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudAccount(String);

impl CloudAccount {
    pub fn new(account: impl Into<String>) -> Result<Self, ValidationError> {
        let account = account.into();
        validate_cloud_account(&account)?;
        Ok(Self(account))
    }

    /// Creates a new cloud account without validation.
    pub(crate) fn new_unchecked(account: String) -> Self {
        Self(account)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn validate_cloud_account(account: &str) -> Result<(), ValidationError> {
    if account.is_empty() {
        return Err(ValidationError::field(
            "cloudaccount",
            "Cloud account cannot be empty",
        ));
    }
    if !account.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::Format(
            "Cloud account can only contain alphanumeric characters".to_string(),
        ));
    }
    Ok(())
}

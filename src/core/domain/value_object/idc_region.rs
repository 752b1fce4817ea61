use crate::core::domain::error::ValidationError;

/// An IDC region name such as `us-region-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdcRegion(String);

impl IdcRegion {
    pub fn new(region: impl Into<String>) -> Result<Self, ValidationError> {
        let region = region.into();
        validate_region(&region)?;
        Ok(Self(region))
    }

    /// Creates a new region without validation.
    pub(crate) fn new_unchecked(region: String) -> Self {
        Self(region)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The default availability zone of the region, `<region>a`.
    #[must_use]
    pub fn availability_zone(&self) -> String {
        format!("{}a", self.0)
    }
}

pub(crate) fn validate_region(region: &str) -> Result<(), ValidationError> {
    if region.is_empty() {
        return Err(ValidationError::field("region", "Region cannot be empty"));
    }
    if region.len() > 63 {
        return Err(ValidationError::Format(
            "Region cannot exceed 63 characters".to_string(),
        ));
    }
    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::Format(
            "Region can only contain lowercase letters, digits and hyphens".to_string(),
        ));
    }
    if region.starts_with('-') || region.ends_with('-') {
        return Err(ValidationError::Format(
            "Region cannot start or end with hyphen".to_string(),
        ));
    }
    Ok(())
}

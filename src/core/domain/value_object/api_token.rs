use crate::core::domain::error::ValidationError;
use std::fmt;

/// A bearer token for the IDC API.
///
/// `Debug` never prints the value, so the token cannot leak through logs or
/// error reports that format the connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        validate_token(&token)?;
        Ok(Self(token))
    }

    /// Creates a new token without validation.
    pub(crate) fn new_unchecked(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats the token as an `Authorization` header value.
    #[must_use]
    pub fn as_bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

pub(crate) fn validate_token(token: &str) -> Result<(), ValidationError> {
    if token.trim().is_empty() {
        return Err(ValidationError::field("apitoken", "API token cannot be empty"));
    }
    if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::Format(
            "API token cannot contain whitespace or control characters".to_string(),
        ));
    }
    Ok(())
}

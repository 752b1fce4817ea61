use thiserror::Error;

/// The main error type for IntelCloud operations.
///
/// Every failure the provider can surface is one of these variants. The
/// service layer never swallows an error; adapters turn them into host
/// diagnostics and branch only on [`IdcError::kind`], never on raw HTTP codes.
#[derive(Error, Debug)]
pub enum IdcError {
    /// The HTTP exchange could not complete (DNS, TCP, TLS, I/O or client timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API rejected the bearer token (401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token is valid but lacks permission for the operation (403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The addressed resource does not exist (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current state of the resource (409).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other 4xx response.
    ///
    /// # Fields
    /// * `status` - The HTTP status code returned by the API
    /// * `message` - The response body, as returned by the API
    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    /// A 5xx response.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A completed exchange whose status is neither 200 nor an error class.
    #[error("Unexpected response status ({status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Request marshalling or response unmarshalling failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A URL template could not be expanded.
    #[error("Template error: {0}")]
    Template(String),

    /// A poll observed a terminal failure phase.
    ///
    /// # Fields
    /// * `resource` - Human name of the resource kind (e.g. `iks cluster`)
    /// * `id` - The server-assigned identifier of the failed resource
    /// * `state` - The upstream phase that was observed
    #[error("{resource} {id} entered terminal state '{state}'")]
    StateFailed {
        resource: String,
        id: String,
        state: String,
    },

    /// A poll ran out of its maximum duration.
    #[error("{resource} state not ready after maximum retries")]
    DeadlineExceeded { resource: String },

    /// The ambient operation context was cancelled or hit its deadline.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Input validation failed before any request was made.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Coarse classification of [`IdcError`] used by adapters and the poll engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ClientError,
    ServerError,
    UnexpectedStatus,
    Parse,
    Template,
    StateFailed,
    DeadlineExceeded,
    Cancelled,
    Validation,
}

impl IdcError {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdcError::Transport(_) => ErrorKind::Transport,
            IdcError::Unauthorized(_) => ErrorKind::Unauthorized,
            IdcError::Forbidden(_) => ErrorKind::Forbidden,
            IdcError::NotFound(_) => ErrorKind::NotFound,
            IdcError::Conflict(_) => ErrorKind::Conflict,
            IdcError::Client { .. } => ErrorKind::ClientError,
            IdcError::Server { .. } => ErrorKind::ServerError,
            IdcError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            IdcError::Parse(_) => ErrorKind::Parse,
            IdcError::Template(_) => ErrorKind::Template,
            IdcError::StateFailed { .. } => ErrorKind::StateFailed,
            IdcError::DeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            IdcError::Cancelled(_) => ErrorKind::Cancelled,
            IdcError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Returns true if the upstream reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Returns true for failures worth another attempt inside a poll loop.
    ///
    /// Only 5xx responses qualify; every other kind is terminal.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::ServerError
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Type alias for Results that may fail with an IdcError
pub type IdcResult<T> = Result<T, IdcError>;

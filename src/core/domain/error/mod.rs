use thiserror::Error;

/// The main error type for Proxmox fleet operations.
///
/// This enum represents all possible errors that can occur while building
/// a client or talking to the Proxmox VE API.
#[derive(Error, Debug)]
pub enum ProxmoxError {
    /// Represents bad or missing construction parameters or call arguments.
    ///
    /// Raised before any request is sent.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ValidationError),

    /// Represents a failed connectivity probe against the API endpoint
    ///
    /// # Fields
    /// * `host` - The host that could not be reached
    /// * `port` - The port that could not be reached
    /// * `message` - The underlying transport failure
    #[error("Unable to connect to {host}:{port}: {message}")]
    Connectivity {
        host: String,
        port: u16,
        message: String,
    },

    /// Represents a single failed API call
    #[error("Request error: {0}")]
    Request(#[from] RequestError),
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug)]
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

/// Failure of one HTTP exchange with the API.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The request never produced a response (DNS, TLS, timeout, refused connection).
    #[error("HTTP request to '{path}' failed: {message}")]
    Transport { path: String, message: String },

    /// The server answered with a non-success status code.
    #[error("API error on '{path}' ({status}): {body}")]
    Status {
        status: u16,
        path: String,
        body: String,
    },

    /// The request body could not be serialized.
    #[error("Failed to encode request to '{path}': {message}")]
    Encode { path: String, message: String },

    /// The response body did not have the expected shape.
    #[error("Failed to parse response from '{path}': {message}")]
    Decode { path: String, message: String },
}

impl RequestError {
    /// Returns the HTTP status code when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Type alias for Results that may fail with a ProxmoxError
pub type ProxmoxResult<T> = Result<T, ProxmoxError>;

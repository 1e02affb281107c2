use thiserror::Error;

/// Result type alias for Gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur when talking to the Gateway API
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Request was malformed or rejected by validation
    #[error("bad request: {message}")]
    BadRequest {
        /// Error message from the API
        message: String,
    },

    /// Authentication failed - invalid or missing API token
    #[error("authentication failed: invalid API token")]
    Unauthorized,

    /// Token lacks permission for the requested resource
    #[error("access forbidden: insufficient permissions")]
    Forbidden,

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimited,

    /// API returned a 5xx response
    #[error("server error ({code}): {message}")]
    Server {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// API returned some other non-success response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response envelope carried no result where one was required
    #[error("missing result in response from {path}")]
    MissingResult {
        /// Request path that produced the empty envelope
        path: String,
    },

    /// More than one owned firewall policy exists on the remote
    #[error("found {count} owned firewall policies, expected at most one")]
    PolicyConflict {
        /// Number of owned policies observed
        count: usize,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns true if the error should be retried.
    ///
    /// Transport failures, decode failures, and every non-2xx response are
    /// retryable; invariant violations, configuration errors, and
    /// cancellation are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::PolicyConflict { .. } | Self::Config(_) | Self::Cancelled | Self::Internal(_)
        )
    }

    /// Returns the HTTP status code if this error carries one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited => Some(429),
            Self::Server { code, .. } | Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Classify a non-success HTTP status into a typed error
    #[must_use]
    pub fn from_status(code: u16, message: String) -> Self {
        match code {
            400 => Self::BadRequest { message },
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound { resource: message },
            429 => Self::RateLimited,
            500.. => Self::Server { code, message },
            _ => Self::Api { code, message },
        }
    }
}

use serde::{Deserialize, Serialize};

/// Standard Gateway API response envelope.
///
/// Every endpoint wraps its payload in `{"result": ...}`; collection
/// endpoints return `null` instead of an empty array when nothing matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// The payload, absent or null when there is nothing to return
    #[serde(default)]
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the envelope, mapping a missing result to the given error
    pub fn into_result(self, path: &str) -> crate::Result<T> {
        self.result.ok_or_else(|| crate::GatewayError::MissingResult {
            path: path.to_string(),
        })
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Unwrap a collection envelope, treating a null result as empty
    #[must_use]
    pub fn into_collection(self) -> Vec<T> {
        self.result.unwrap_or_default()
    }
}

//! The response envelope shared by every endpoint.
//!
//! ```json
//! { "success": true, "message": "Class created", "data": { ... } }
//! { "success": false, "message": "Invalid token" }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data` and a default message.
    pub fn ok(data: T) -> Self {
        Self::with_message("OK", data)
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Envelope without a payload; documents error and message-only responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse<()> {
    /// Successful response without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_serializes_data() {
        let value = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "OK");
        assert_eq!(value["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_message_omits_data() {
        let value = serde_json::to_value(ApiResponse::message("Event deleted")).unwrap();
        assert_eq!(value["success"], true);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_error_shape() {
        let value = serde_json::to_value(ApiResponse::<()>::error("Invalid token")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "success": false, "message": "Invalid token" })
        );
    }
}

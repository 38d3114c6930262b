use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Standard envelope for client-facing JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_absent_fields() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2, 3])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body.get("message").is_none());
    }

    #[test]
    fn error_envelope_carries_message_only() {
        let body = serde_json::to_value(ApiResponse::<()>::error("not found")).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "not found");
        assert!(body.get("data").is_none());
    }
}

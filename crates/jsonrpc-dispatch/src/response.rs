use http::StatusCode;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::error::ErrorObject;
use crate::types::{JsonRpcVersion, RequestId};

/// Contract violations while building a response
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseError {
    #[error("Notifications cannot have a result payload")]
    NotificationPayload,
}

/// A successful JSON-RPC response.
///
/// Field order is the wire order: `jsonrpc`, `result`, `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub result: Value,
    pub id: RequestId,
}

impl SuccessResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            result,
            id,
        }
    }
}

/// A JSON-RPC error response.
///
/// `id` is `null` when it could not be determined from the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub error: ErrorObject,
    pub id: Option<RequestId>,
}

impl ErrorResponse {
    pub fn new(id: Option<RequestId>, error: ErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            error,
            id,
        }
    }
}

/// Outcome of processing one request unit
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
    /// Nothing is sent back
    Notification,
}

impl Response {
    /// Build the reply to a successful call.
    ///
    /// Without an id the call was a notification: a `null` result yields
    /// [`Response::Notification`], anything else is a contract violation.
    pub fn success(id: Option<RequestId>, result: Value) -> Result<Self, ResponseError> {
        match id {
            Some(id) => Ok(Response::Success(SuccessResponse::new(id, result))),
            None if result.is_null() => Ok(Response::Notification),
            None => Err(ResponseError::NotificationPayload),
        }
    }

    pub fn error(id: Option<RequestId>, error: ErrorObject) -> Self {
        Response::Error(ErrorResponse::new(id, error))
    }

    pub fn notification() -> Self {
        Response::Notification
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    pub fn is_notification(&self) -> bool {
        matches!(self, Response::Notification)
    }

    /// Id echoed by this response; `None` for notifications and for errors
    /// whose id could not be determined
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            Response::Success(success) => Some(&success.id),
            Response::Error(error) => error.id.as_ref(),
            Response::Notification => None,
        }
    }

    /// Recommended HTTP status when the response travels over HTTP
    pub fn http_status(&self) -> StatusCode {
        match self {
            Response::Success(_) => StatusCode::OK,
            Response::Error(error) => error.error.kind().http_status(),
            Response::Notification => StatusCode::NO_CONTENT,
        }
    }

    /// Convert to JSON string if there's a response to send
    pub fn to_json_string(&self) -> Option<String> {
        match self {
            Response::Success(success) => serde_json::to_string(success).ok(),
            Response::Error(error) => serde_json::to_string(error).ok(),
            Response::Notification => None,
        }
    }

    /// Wire body; empty for a notification
    pub fn body(&self) -> String {
        self.to_json_string().unwrap_or_default()
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Response::Success(success) => success.serialize(serializer),
            Response::Error(error) => error.serialize(serializer),
            Response::Notification => serializer.serialize_none(),
        }
    }
}

impl From<SuccessResponse> for Response {
    fn from(response: SuccessResponse) -> Self {
        Response::Success(response)
    }
}

impl From<ErrorResponse> for Response {
    fn from(response: ErrorResponse) -> Self {
        Response::Error(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JsonRpcErrorCode;
    use serde_json::json;

    #[test]
    fn test_success_body() {
        let response = Response::success(Some(RequestId::from(1)), json!("bar")).unwrap();
        assert_eq!(response.body(), r#"{"jsonrpc":"2.0","result":"bar","id":1}"#);
        assert_eq!(response.http_status(), StatusCode::OK);
        assert_eq!(response.id(), Some(&RequestId::from(1)));
    }

    #[test]
    fn test_success_null_result_keeps_result_member() {
        let response = Response::success(Some(RequestId::from("a")), Value::Null).unwrap();
        assert_eq!(response.body(), r#"{"jsonrpc":"2.0","result":null,"id":"a"}"#);
    }

    #[test]
    fn test_notification_cannot_carry_result() {
        assert_eq!(
            Response::success(None, json!(5)),
            Err(ResponseError::NotificationPayload)
        );
        assert_eq!(Response::success(None, Value::Null), Ok(Response::Notification));
    }

    #[test]
    fn test_error_body_order() {
        let error = ErrorObject::new(
            JsonRpcErrorCode::InvalidParams,
            None,
            Some(json!({"detail": "x"})),
        );
        let response = Response::error(Some(RequestId::from(2)), error);
        assert_eq!(
            response.body(),
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params","data":{"detail":"x"}},"id":2}"#
        );
        assert!(response.is_error());
        assert_eq!(response.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_with_null_id() {
        let error = ErrorObject::new(JsonRpcErrorCode::InvalidRequest, None, None);
        let response = Response::error(None, error);
        assert_eq!(
            response.body(),
            r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"},"id":null}"#
        );
        assert_eq!(response.id(), None);
    }

    #[test]
    fn test_notification_body_is_empty() {
        let response = Response::notification();
        assert!(response.is_notification());
        assert_eq!(response.body(), "");
        assert_eq!(response.to_json_string(), None);
        assert_eq!(response.http_status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_response_round_trip() {
        let json_str = r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found","data":"foo"},"id":"x"}"#;
        let parsed: ErrorResponse = serde_json::from_str(json_str).unwrap();
        assert_eq!(parsed.error.kind(), JsonRpcErrorCode::MethodNotFound);
        assert_eq!(Response::from(parsed).body(), json_str);
    }
}

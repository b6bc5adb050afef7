use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error_codes;

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
    Application(i64),
}

impl JsonRpcErrorCode {
    /// Classify a raw numeric code
    pub fn from_code(code: i64) -> Self {
        match code {
            error_codes::PARSE_ERROR => JsonRpcErrorCode::ParseError,
            error_codes::INVALID_REQUEST => JsonRpcErrorCode::InvalidRequest,
            error_codes::METHOD_NOT_FOUND => JsonRpcErrorCode::MethodNotFound,
            error_codes::INVALID_PARAMS => JsonRpcErrorCode::InvalidParams,
            error_codes::INTERNAL_ERROR => JsonRpcErrorCode::InternalError,
            error_codes::SERVER_ERROR_START..=error_codes::SERVER_ERROR_END => {
                JsonRpcErrorCode::ServerError(code)
            }
            other => JsonRpcErrorCode::Application(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::ServerError(code) | JsonRpcErrorCode::Application(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
            JsonRpcErrorCode::Application(_) => "Application error",
        }
    }

    /// Recommended HTTP status when the response travels over HTTP
    pub fn http_status(&self) -> StatusCode {
        match self {
            JsonRpcErrorCode::MethodNotFound => StatusCode::NOT_FOUND,
            JsonRpcErrorCode::InternalError | JsonRpcErrorCode::ServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            JsonRpcErrorCode::ParseError
            | JsonRpcErrorCode::InvalidRequest
            | JsonRpcErrorCode::InvalidParams
            | JsonRpcErrorCode::Application(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC error object, as it appears under the `error` member.
///
/// Field order is the wire order: `code`, `message`, `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn kind(&self) -> JsonRpcErrorCode {
        JsonRpcErrorCode::from_code(self.code)
    }

    /// Drop `data`; used when debug output is disabled
    pub fn without_data(mut self) -> Self {
        self.data = None;
        self
    }
}

/// Classified failure of a single request unit.
///
/// Every failure the dispatcher can observe ends up as one of these and is
/// then rendered as an [`ErrorObject`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    #[error("Parse error: {detail}")]
    Parse { detail: String },

    #[error("Invalid Request: {detail}")]
    InvalidRequest { detail: String },

    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    #[error("Invalid params")]
    InvalidParams { data: Option<Value> },

    #[error("Server error")]
    Server { data: Option<Value> },

    #[error("{message} ({code})")]
    Application {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl RpcError {
    pub fn parse(detail: impl fmt::Display) -> Self {
        RpcError::Parse {
            detail: detail.to_string(),
        }
    }

    pub fn invalid_request(detail: impl fmt::Display) -> Self {
        RpcError::InvalidRequest {
            detail: detail.to_string(),
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        RpcError::MethodNotFound {
            method: method.to_string(),
        }
    }

    pub fn code(&self) -> JsonRpcErrorCode {
        match self {
            RpcError::Parse { .. } => JsonRpcErrorCode::ParseError,
            RpcError::InvalidRequest { .. } => JsonRpcErrorCode::InvalidRequest,
            RpcError::MethodNotFound { .. } => JsonRpcErrorCode::MethodNotFound,
            RpcError::InvalidParams { .. } => JsonRpcErrorCode::InvalidParams,
            RpcError::Server { .. } => JsonRpcErrorCode::ServerError(error_codes::SERVER_ERROR_END),
            RpcError::Application { code, .. } => JsonRpcErrorCode::from_code(*code),
        }
    }
}

/// Trait for errors that can be converted to JSON-RPC error objects
pub trait ToJsonRpcError: std::error::Error {
    /// Convert this error to a JSON-RPC error object
    fn to_error_object(&self) -> ErrorObject;
}

impl ToJsonRpcError for RpcError {
    fn to_error_object(&self) -> ErrorObject {
        let code = self.code();
        match self {
            RpcError::Parse { detail } | RpcError::InvalidRequest { detail } => {
                ErrorObject::new(code, None, Some(Value::String(detail.clone())))
            }
            RpcError::MethodNotFound { method } => {
                ErrorObject::new(code, None, Some(Value::String(method.clone())))
            }
            RpcError::InvalidParams { data } | RpcError::Server { data } => {
                ErrorObject::new(code, None, data.clone())
            }
            RpcError::Application {
                code,
                message,
                data,
            } => ErrorObject {
                code: *code,
                message: message.clone(),
                data: data.clone(),
            },
        }
    }
}

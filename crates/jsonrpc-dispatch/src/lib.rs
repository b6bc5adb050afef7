//! # JSON-RPC 2.0 Dispatch Core
//!
//! A transport-agnostic, synchronous JSON-RPC 2.0 server core. Feed it a raw
//! payload (a single request object or a batch) and a source of procedures;
//! it validates the request, resolves and invokes the procedure, and returns
//! the response to send back, or nothing at all for notifications.
//!
//! ## Features
//! - Request validation in protocol order, failing closed as `Invalid Request`
//! - Procedures described by explicit signatures, bound positionally or by name
//! - Lists, maps and the [`Methods`] registry as interchangeable procedure sources
//! - Batches with notifications left out of the reply
//! - Deterministic wire output (`jsonrpc`, `result`, `error`, `id`)
//! - Optional camelCase to snake_case normalization of names
//!
//! ```rust
//! use jsonrpc_dispatch::prelude::*;
//! use serde_json::json;
//!
//! let mut methods = Methods::new();
//! methods.add(
//!     Procedure::new("double", |args| Ok(json!(args.get::<i64>("x")? * 2))).param("x"),
//! );
//!
//! let output = Dispatcher::new().dispatch_str(
//!     &methods,
//!     r#"{"jsonrpc": "2.0", "method": "double", "params": [3], "id": 1}"#,
//! );
//! assert_eq!(output.body(), r#"{"jsonrpc":"2.0","result":6,"id":1}"#);
//! ```

pub mod case;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod prelude;
pub mod procedure;
pub mod registry;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use config::DispatchConfig;
pub use dispatch::{DispatchOutput, Dispatcher};
pub use error::{ErrorObject, JsonRpcErrorCode, RpcError, ToJsonRpcError};
pub use procedure::{Arguments, BindError, Param, Procedure, ProcedureError, Signature};
pub use registry::{Methods, ProcedureSource};
pub use request::Request;
pub use response::{ErrorResponse, Response, ResponseError, SuccessResponse};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}

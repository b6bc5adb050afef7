//! # JSON-RPC Dispatch Prelude
//!
//! Convenient re-exports of the types needed to register procedures and
//! dispatch payloads.
//!
//! ```rust
//! use jsonrpc_dispatch::prelude::*;
//! ```

pub use crate::config::DispatchConfig;
pub use crate::dispatch::{DispatchOutput, Dispatcher};
pub use crate::error::{ErrorObject, JsonRpcErrorCode, RpcError};
pub use crate::procedure::{Arguments, Procedure, ProcedureError};
pub use crate::registry::{Methods, ProcedureSource};
pub use crate::response::Response;
pub use crate::types::RequestId;

// Standard error codes
pub use crate::error_codes::*;

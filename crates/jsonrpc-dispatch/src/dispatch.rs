use std::panic::{self, AssertUnwindSafe};

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, error, instrument, trace, warn};

use crate::config::DispatchConfig;
use crate::error::{RpcError, ToJsonRpcError};
use crate::registry::ProcedureSource;
use crate::request::Request;
use crate::response::Response;
use crate::types::RequestId;

/// What the dispatcher produced for one payload
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutput {
    /// A single request object was received
    Single(Response),
    /// A batch was received; notifications are already left out
    Batch(Vec<Response>),
}

impl DispatchOutput {
    /// Check if anything must be sent back
    pub fn needs_response(&self) -> bool {
        match self {
            DispatchOutput::Single(response) => !response.is_notification(),
            DispatchOutput::Batch(responses) => !responses.is_empty(),
        }
    }

    /// Responses that go on the wire
    pub fn responses(&self) -> Vec<&Response> {
        match self {
            DispatchOutput::Single(response) if response.is_notification() => Vec::new(),
            DispatchOutput::Single(response) => vec![response],
            DispatchOutput::Batch(responses) => responses.iter().collect(),
        }
    }

    /// Wire body; empty when nothing must be sent
    pub fn body(&self) -> String {
        match self {
            DispatchOutput::Single(response) => response.body(),
            DispatchOutput::Batch(responses) if responses.is_empty() => String::new(),
            DispatchOutput::Batch(responses) => {
                serde_json::to_string(responses).unwrap_or_default()
            }
        }
    }

    /// Recommended HTTP status. A batch is always 200 unless it is empty.
    pub fn http_status(&self) -> StatusCode {
        self.http_status_with(StatusCode::NO_CONTENT)
    }

    /// Recommended HTTP status, using `notification_status` when there is
    /// nothing to send back
    pub fn http_status_with(&self, notification_status: StatusCode) -> StatusCode {
        match self {
            _ if !self.needs_response() => notification_status,
            DispatchOutput::Single(response) => response.http_status(),
            DispatchOutput::Batch(_) => StatusCode::OK,
        }
    }
}

/// JSON-RPC dispatcher.
///
/// Holds only configuration; procedures are supplied per call through any
/// [`ProcedureSource`], so one dispatcher can serve several registries.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher with default configuration
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Create a dispatcher with custom configuration
    pub fn with_config(config: DispatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Recommended HTTP status for `output` under this dispatcher's config
    pub fn http_status(&self, output: &DispatchOutput) -> StatusCode {
        output.http_status_with(self.config.notification_status)
    }

    /// Parse JSON text and dispatch it
    #[instrument(level = "debug", skip_all)]
    pub fn dispatch_str<S>(&self, source: &S, text: &str) -> DispatchOutput
    where
        S: ProcedureSource + ?Sized,
    {
        match serde_json::from_str::<Value>(text) {
            Ok(payload) => self.dispatch(source, &payload),
            Err(e) => {
                warn!("Rejecting unparsable payload: {}", e);
                DispatchOutput::Single(self.error_response(None, &RpcError::parse(e)))
            }
        }
    }

    /// Dispatch a single request object or a batch
    #[instrument(level = "debug", skip_all)]
    pub fn dispatch<S>(&self, source: &S, payload: &Value) -> DispatchOutput
    where
        S: ProcedureSource + ?Sized,
    {
        match payload {
            Value::Array(items) if items.is_empty() => {
                warn!("Rejecting empty batch");
                DispatchOutput::Single(
                    self.error_response(None, &RpcError::invalid_request("empty batch")),
                )
            }
            Value::Array(items) => {
                debug!("Dispatching batch of {} request(s)", items.len());
                let responses = items
                    .iter()
                    .map(|item| self.handle(source, item))
                    .filter(|response| !response.is_notification())
                    .collect();
                DispatchOutput::Batch(responses)
            }
            other => DispatchOutput::Single(self.handle(source, other)),
        }
    }

    /// Process one request unit from validation through to the response
    pub fn handle<S>(&self, source: &S, raw: &Value) -> Response
    where
        S: ProcedureSource + ?Sized,
    {
        let request = match Request::from_value(raw, &self.config) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected request: {}", e);
                return self.error_response(None, &e);
            }
        };
        trace!(method = request.method_name(), id = ?request.request_id(), "validated");

        let outcome = self.invoke(source, &request);
        match (request.request_id().cloned(), outcome) {
            (id, Ok(result)) => {
                // A notification's result is discarded before building the reply
                let result = if id.is_some() {
                    debug!("Request '{}' succeeded", request.method_name());
                    result
                } else {
                    debug!("Notification '{}' handled", request.method_name());
                    Value::Null
                };
                Response::success(id, result).unwrap_or_else(|e| {
                    error!("Cannot reply to '{}': {}", request.method_name(), e);
                    self.error_response(None, &RpcError::Server {
                        data: Some(Value::String(e.to_string())),
                    })
                })
            }
            (Some(id), Err(e)) => self.error_response(Some(id), &e),
            (None, Err(e)) if self.config.notification_errors => self.error_response(None, &e),
            (None, Err(e)) => {
                warn!(
                    "Suppressed error for notification '{}': {}",
                    request.method_name(),
                    e
                );
                Response::notification()
            }
        }
    }

    /// Resolve and run the named procedure, classifying every failure
    fn invoke<S>(&self, source: &S, request: &Request) -> Result<Value, RpcError>
    where
        S: ProcedureSource + ?Sized,
    {
        let method = request.method_name();
        let procedure = source.resolve(method).ok_or_else(|| {
            debug!("Method '{}' not found", method);
            RpcError::method_not_found(method)
        })?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            procedure.call(request.args(), request.kwargs())
        }));

        match outcome {
            Ok(Err(RpcError::Server { data })) => {
                error!("Procedure '{}' failed: {}", method, describe(data.as_ref()));
                Err(RpcError::Server { data })
            }
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Procedure '{}' panicked: {}", method, message);
                Err(RpcError::Server {
                    data: Some(Value::String(message)),
                })
            }
        }
    }

    fn error_response(&self, id: Option<RequestId>, error: &RpcError) -> Response {
        let object = error.to_error_object();
        let object = if self.config.debug {
            object
        } else {
            object.without_data()
        };
        Response::error(id, object)
    }
}

/// Display form of error `data`: strings unquoted, anything else as JSON
fn describe(data: Option<&Value>) -> String {
    match data {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "no details".to_string(),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "procedure panicked".to_string()
    }
}

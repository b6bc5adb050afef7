//! Dispatcher configuration
//!
//! Flags are set once when the [`Dispatcher`](crate::Dispatcher) is built and
//! are only read afterwards.

use http::StatusCode;

/// Configuration for a [`Dispatcher`](crate::Dispatcher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Include the `data` member of error objects in responses
    pub debug: bool,
    /// Convert the method name and all object keys in `params` from
    /// camelCase to snake_case before resolving and binding
    pub convert_camel_case: bool,
    /// Report failed notifications as error responses instead of
    /// suppressing them. Replying to a notification breaks the protocol,
    /// so only enable this for diagnostics.
    pub notification_errors: bool,
    /// HTTP status recommended when nothing is sent back
    pub notification_status: StatusCode,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            debug: false,
            convert_camel_case: false,
            notification_errors: false,
            notification_status: StatusCode::NO_CONTENT,
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_convert_camel_case(mut self, convert: bool) -> Self {
        self.convert_camel_case = convert;
        self
    }

    pub fn with_notification_errors(mut self, report: bool) -> Self {
        self.notification_errors = report;
        self
    }

    pub fn with_notification_status(mut self, status: StatusCode) -> Self {
        self.notification_status = status;
        self
    }
}

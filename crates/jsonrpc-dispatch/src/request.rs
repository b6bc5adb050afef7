use serde_json::{Map, Value};

use crate::case;
use crate::config::DispatchConfig;
use crate::error::RpcError;
use crate::types::RequestId;

/// A validated JSON-RPC request or notification.
///
/// `params` is bound either positionally or by name, never both: an array
/// lands in [`args`](Request::args), an object in [`kwargs`](Request::kwargs).
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method_name: String,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
    request_id: Option<RequestId>,
}

impl Request {
    /// Validate a raw request object.
    ///
    /// Checks run in protocol order: `jsonrpc`, `method`, `params`, `id`. Any
    /// failure is an `Invalid Request`.
    pub fn from_value(raw: &Value, config: &DispatchConfig) -> Result<Self, RpcError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| RpcError::invalid_request("request must be an object"))?;

        match obj.get("jsonrpc") {
            Some(Value::String(version)) if version == crate::JSONRPC_VERSION => {}
            Some(_) => return Err(RpcError::invalid_request("'jsonrpc' must be exactly \"2.0\"")),
            None => return Err(RpcError::invalid_request("'jsonrpc' is required")),
        }

        let method = match obj.get("method") {
            Some(Value::String(method)) => method,
            Some(_) => return Err(RpcError::invalid_request("'method' must be a string")),
            None => return Err(RpcError::invalid_request("'method' is required")),
        };

        let (args, kwargs) = match obj.get("params") {
            None => (Vec::new(), Map::new()),
            Some(Value::Array(items)) => (items.clone(), Map::new()),
            Some(Value::Object(map)) => (Vec::new(), map.clone()),
            Some(_) => {
                return Err(RpcError::invalid_request(
                    "'params' must be an array or an object",
                ));
            }
        };

        let request_id = match obj.get("id") {
            None => None,
            Some(id) => RequestId::from_value(id).map_err(|()| {
                RpcError::invalid_request("'id' must be a string, a number or null")
            })?,
        };

        let (method_name, kwargs) = if config.convert_camel_case {
            (case::to_snake_case(method), case::convert_map(kwargs))
        } else {
            (method.clone(), kwargs)
        };

        Ok(Self {
            method_name,
            args,
            kwargs,
            request_id,
        })
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// True when no reply may be sent
    pub fn is_notification(&self) -> bool {
        self.request_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonRpcErrorCode;
    use serde_json::json;

    fn parse(raw: Value) -> Result<Request, RpcError> {
        Request::from_value(&raw, &DispatchConfig::default())
    }

    fn parse_camel(raw: Value) -> Request {
        Request::from_value(&raw, &DispatchConfig::new().with_convert_camel_case(true)).unwrap()
    }

    #[test]
    fn test_ok() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo"})).unwrap();
        assert_eq!(req.method_name(), "foo");
        assert!(req.args().is_empty());
        assert!(req.kwargs().is_empty());
    }

    #[test]
    fn test_positional_args() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo", "params": [2, 3]})).unwrap();
        assert_eq!(req.args(), &[json!(2), json!(3)]);
        assert!(req.kwargs().is_empty());
    }

    #[test]
    fn test_keyword_args() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo", "params": {"foo": "bar"}}))
            .unwrap();
        assert_eq!(Value::Object(req.kwargs().clone()), json!({"foo": "bar"}));
        assert!(req.args().is_empty());
    }

    #[test]
    fn test_empty_params_array() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo", "params": []})).unwrap();
        let absent = parse(json!({"jsonrpc": "2.0", "method": "foo"})).unwrap();
        assert_eq!(req, absent);
    }

    #[test]
    fn test_request_id() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo", "id": 99})).unwrap();
        assert_eq!(req.request_id(), Some(&RequestId::from(99)));
        assert!(!req.is_notification());
    }

    #[test]
    fn test_string_request_id() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo", "id": "abc"})).unwrap();
        assert_eq!(req.request_id(), Some(&RequestId::from("abc")));
    }

    #[test]
    fn test_request_id_notification() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo"})).unwrap();
        assert_eq!(req.request_id(), None);
        assert!(req.is_notification());
    }

    #[test]
    fn test_null_id_is_notification() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "foo", "id": null})).unwrap();
        assert!(req.is_notification());
    }

    #[test]
    fn test_invalid_requests() {
        let cases = [
            json!({"jsonrpc": "2.0"}),
            json!({"method": "foo"}),
            json!({"jsonrpc": "1.0", "method": "foo"}),
            json!({"jsonrpc": 2.0, "method": "foo"}),
            json!({"jsonrpc": "2.0", "method": 1}),
            json!({"jsonrpc": "2.0", "method": "foo", "params": "bar"}),
            json!({"jsonrpc": "2.0", "method": "foo", "params": 5}),
            json!({"jsonrpc": "2.0", "method": "foo", "id": {"a": 1}}),
            json!({"jsonrpc": "2.0", "method": "foo", "id": true}),
            json!("not an object"),
            json!([]),
        ];
        for raw in cases {
            let err = parse(raw.clone()).unwrap_err();
            assert_eq!(err.code(), JsonRpcErrorCode::InvalidRequest, "{}", raw);
        }
    }

    #[test]
    fn test_convert_camel_case() {
        let req = parse_camel(json!({"jsonrpc": "2.0", "method": "fooMethod", "params": {
            "fooParam": 1, "aDict": {"barParam": 1}}}));
        assert_eq!(req.method_name(), "foo_method");
        assert_eq!(
            Value::Object(req.kwargs().clone()),
            json!({"foo_param": 1, "a_dict": {"bar_param": 1}})
        );
    }

    #[test]
    fn test_convert_camel_case_leaves_lists_alone() {
        let req = parse_camel(json!({"jsonrpc": "2.0", "method": "echo", "params": {
            "someList": [{"innerKey": 1}]}}));
        assert_eq!(
            Value::Object(req.kwargs().clone()),
            json!({"some_list": [{"innerKey": 1}]})
        );
    }

    #[test]
    fn test_positional_args_convert_case_skip() {
        let req = parse_camel(json!({"jsonrpc": "2.0", "method": "foo", "params": ["Camel", "Case"]}));
        assert_eq!(req.args(), &[json!("Camel"), json!("Case")]);
    }

    #[test]
    fn test_no_conversion_when_disabled() {
        let req = parse(json!({"jsonrpc": "2.0", "method": "fooMethod", "params": {"fooParam": 1}}))
            .unwrap();
        assert_eq!(req.method_name(), "fooMethod");
        assert!(req.kwargs().contains_key("fooParam"));
    }
}

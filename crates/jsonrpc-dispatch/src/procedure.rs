//! Procedure descriptors and argument binding
//!
//! A [`Procedure`] couples a handler with an explicit [`Signature`] declared at
//! registration time. The dispatcher binds the request's positional and
//! keyword arguments against that signature before the handler runs, so arity
//! and keyword mistakes are reported as `Invalid params` without reaching the
//! handler.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::RpcError;

/// Errors a procedure handler may return
#[derive(Debug, Error)]
pub enum ProcedureError {
    /// The arguments were well-formed but unacceptable
    #[error("Invalid params")]
    InvalidParams { data: Option<Value> },

    /// Domain error with its own code, passed through to the client as-is
    #[error("{message}")]
    Application {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// Anything else; reported as a generic server error
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl ProcedureError {
    pub fn invalid_params(data: impl Into<Value>) -> Self {
        ProcedureError::InvalidParams {
            data: Some(data.into()),
        }
    }

    pub fn application(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        ProcedureError::Application {
            code,
            message: message.into(),
            data,
        }
    }
}

impl From<ProcedureError> for RpcError {
    fn from(error: ProcedureError) -> Self {
        match error {
            ProcedureError::InvalidParams { data } => RpcError::InvalidParams { data },
            ProcedureError::Application {
                code,
                message,
                data,
            } => RpcError::Application {
                code,
                message,
                data,
            },
            ProcedureError::Fault(fault) => RpcError::Server {
                data: Some(Value::String(format!("{:#}", fault))),
            },
        }
    }
}

/// Mismatch between the supplied arguments and a [`Signature`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("{procedure}() takes {expected} positional argument(s) but {given} were given")]
    TooManyPositional {
        procedure: String,
        expected: usize,
        given: usize,
    },

    #[error("{procedure}() got an unexpected keyword argument '{name}'")]
    UnexpectedKeyword { procedure: String, name: String },

    #[error("{procedure}() got multiple values for argument '{name}'")]
    DuplicateArgument { procedure: String, name: String },

    #[error("{procedure}() missing required argument '{name}'")]
    MissingArgument { procedure: String, name: String },
}

impl From<BindError> for RpcError {
    fn from(error: BindError) -> Self {
        RpcError::InvalidParams {
            data: Some(Value::String(error.to_string())),
        }
    }
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    /// Value used when the caller omits the parameter; `None` makes it required
    pub default: Option<Value>,
}

/// Parameter list of a procedure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    pub params: Vec<Param>,
    /// Accept surplus positional arguments
    pub variadic: bool,
    /// Accept keyword arguments that match no declared parameter
    pub var_keywords: bool,
}

impl Signature {
    /// Bind positional and keyword arguments to the declared parameters
    pub fn bind(
        &self,
        procedure: &str,
        args: &[Value],
        kwargs: &Map<String, Value>,
    ) -> Result<Arguments, BindError> {
        if args.len() > self.params.len() && !self.variadic {
            return Err(BindError::TooManyPositional {
                procedure: procedure.to_string(),
                expected: self.params.len(),
                given: args.len(),
            });
        }

        let mut bound = Map::new();
        for (param, value) in self.params.iter().zip(args) {
            bound.insert(param.name.clone(), value.clone());
        }
        let rest = args.iter().skip(self.params.len()).cloned().collect();

        let mut extra = Map::new();
        for (name, value) in kwargs {
            let declared = self.params.iter().any(|p| &p.name == name);
            if declared {
                if bound.contains_key(name) {
                    return Err(BindError::DuplicateArgument {
                        procedure: procedure.to_string(),
                        name: name.clone(),
                    });
                }
                bound.insert(name.clone(), value.clone());
            } else if self.var_keywords {
                extra.insert(name.clone(), value.clone());
            } else {
                return Err(BindError::UnexpectedKeyword {
                    procedure: procedure.to_string(),
                    name: name.clone(),
                });
            }
        }

        for param in &self.params {
            if bound.contains_key(&param.name) {
                continue;
            }
            match &param.default {
                Some(default) => {
                    bound.insert(param.name.clone(), default.clone());
                }
                None => {
                    return Err(BindError::MissingArgument {
                        procedure: procedure.to_string(),
                        name: param.name.clone(),
                    });
                }
            }
        }

        Ok(Arguments { bound, rest, extra })
    }
}

/// Arguments after binding, handed to the handler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    bound: Map<String, Value>,
    rest: Vec<Value>,
    extra: Map<String, Value>,
}

impl Arguments {
    /// Deserialize a declared parameter.
    ///
    /// A missing parameter or a value of the wrong shape is an
    /// `Invalid params` error.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, ProcedureError> {
        let value = self
            .value(name)
            .ok_or_else(|| ProcedureError::invalid_params(format!("missing argument '{}'", name)))?;
        serde_json::from_value(value.clone()).map_err(|e| {
            ProcedureError::invalid_params(format!("argument '{}': {}", name, e))
        })
    }

    /// Declared parameter, or a keyword collected by `var_keywords`
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.bound.get(name).or_else(|| self.extra.get(name))
    }

    /// Surplus positional arguments
    pub fn rest(&self) -> &[Value] {
        &self.rest
    }

    /// Keywords that matched no declared parameter
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

type Handler = dyn Fn(&Arguments) -> Result<Value, ProcedureError> + Send + Sync;

/// A named, invocable unit of server-side logic
#[derive(Clone)]
pub struct Procedure {
    name: String,
    signature: Signature,
    handler: Arc<Handler>,
}

impl Procedure {
    /// Create a procedure that takes no arguments until parameters are
    /// declared with the builder methods.
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Value, ProcedureError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: Signature::default(),
            handler: Arc::new(handler),
        }
    }

    /// Declare a required parameter
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.signature.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Declare a parameter with a default value
    pub fn optional_param(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.signature.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    pub fn variadic(mut self) -> Self {
        self.signature.variadic = true;
        self
    }

    pub fn var_keywords(mut self) -> Self {
        self.signature.var_keywords = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Bind and run. Binding failures surface as `Invalid params`.
    pub fn call(&self, args: &[Value], kwargs: &Map<String, Value>) -> Result<Value, RpcError> {
        let arguments = self.signature.bind(&self.name, args, kwargs)?;
        (self.handler)(&arguments).map_err(RpcError::from)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn multiply() -> Procedure {
        Procedure::new("multiply", |a| {
            let x: i64 = a.get("x")?;
            let y: i64 = a.get("y")?;
            Ok(json!(x * y))
        })
        .param("x")
        .optional_param("y", 2)
    }

    fn kwargs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_positional_binding() {
        let result = multiply().call(&[json!(3), json!(4)], &Map::new()).unwrap();
        assert_eq!(result, json!(12));
    }

    #[test]
    fn test_default_fills_missing() {
        let result = multiply().call(&[json!(3)], &Map::new()).unwrap();
        assert_eq!(result, json!(6));
    }

    #[test]
    fn test_keyword_binding() {
        let result = multiply()
            .call(&[], &kwargs(json!({"x": 5, "y": 5})))
            .unwrap();
        assert_eq!(result, json!(25));
    }

    #[test]
    fn test_too_many_positional() {
        let err = multiply()
            .signature()
            .bind("multiply", &[json!(1), json!(2), json!(3)], &Map::new())
            .unwrap_err();
        assert_eq!(
            err,
            BindError::TooManyPositional {
                procedure: "multiply".to_string(),
                expected: 2,
                given: 3,
            }
        );
    }

    #[test]
    fn test_missing_required() {
        let err = multiply().call(&[], &Map::new()).unwrap_err();
        assert_eq!(
            err,
            RpcError::InvalidParams {
                data: Some(json!("multiply() missing required argument 'x'")),
            }
        );
    }

    #[test]
    fn test_unexpected_keyword() {
        let err = multiply()
            .signature()
            .bind("multiply", &[], &kwargs(json!({"x": 1, "z": 2})))
            .unwrap_err();
        assert!(matches!(err, BindError::UnexpectedKeyword { ref name, .. } if name == "z"));
    }

    #[test]
    fn test_duplicate_argument() {
        let err = multiply()
            .signature()
            .bind("multiply", &[json!(1)], &kwargs(json!({"x": 2})))
            .unwrap_err();
        assert!(matches!(err, BindError::DuplicateArgument { ref name, .. } if name == "x"));
    }

    #[test]
    fn test_variadic_and_var_keywords() {
        let collect = Procedure::new("collect", |a| {
            Ok(json!({"rest": a.rest(), "extra": a.extra()}))
        })
        .variadic()
        .var_keywords();

        let positional = collect.call(&[json!(1), json!(2)], &Map::new()).unwrap();
        assert_eq!(positional, json!({"rest": [1, 2], "extra": {}}));

        let named = collect.call(&[], &kwargs(json!({"name": "foo"}))).unwrap();
        assert_eq!(named, json!({"rest": [], "extra": {"name": "foo"}}));
    }

    #[test]
    fn test_wrong_type_is_invalid_params() {
        let err = multiply().call(&[json!("three")], &Map::new()).unwrap_err();
        assert!(matches!(err, RpcError::InvalidParams { data: Some(_) }));
    }

    #[test]
    fn test_handler_errors_are_classified() {
        let failing = Procedure::new("fail", |_| Err(anyhow::anyhow!("disk on fire").into()));
        let err = failing.call(&[], &Map::new()).unwrap_err();
        assert_eq!(
            err,
            RpcError::Server {
                data: Some(json!("disk on fire")),
            }
        );

        let domain = Procedure::new("domain", |_| {
            Err(ProcedureError::application(-1, "Nope", Some(json!(1))))
        });
        let err = domain.call(&[], &Map::new()).unwrap_err();
        assert_eq!(
            err,
            RpcError::Application {
                code: -1,
                message: "Nope".to_string(),
                data: Some(json!(1)),
            }
        );
    }
}

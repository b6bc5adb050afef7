//! Calculator JSON-RPC Example
//!
//! Registers a few arithmetic procedures and feeds the dispatcher a mix of
//! requests, notifications, a batch and some malformed payloads.
//!
//! Run with `RUST_LOG=debug` to see the dispatch trace.

use jsonrpc_dispatch::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn calculator() -> Methods {
    let mut methods = Methods::new();
    methods
        .add(
            Procedure::new("add", |args| {
                let a: f64 = args.get("a")?;
                let b: f64 = args.get("b")?;
                Ok(json!(a + b))
            })
            .param("a")
            .param("b"),
        )
        .add(
            Procedure::new("subtract", |args| {
                let a: f64 = args.get("a")?;
                let b: f64 = args.get("b")?;
                Ok(json!(a - b))
            })
            .param("a")
            .param("b"),
        )
        .add(
            Procedure::new("divide", |args| {
                let a: f64 = args.get("a")?;
                let b: f64 = args.get("b")?;
                if b == 0.0 {
                    return Err(ProcedureError::application(
                        1,
                        "Division by zero",
                        Some(json!({"dividend": a})),
                    ));
                }
                Ok(json!(a / b))
            })
            .param("a")
            .param("b"),
        )
        .add(
            Procedure::new("sum", |args| {
                let total: f64 = args.rest().iter().filter_map(|v| v.as_f64()).sum();
                Ok(json!(total))
            })
            .variadic(),
        );
    methods.alias("plus", "add");
    methods
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let methods = calculator();
    let dispatcher = Dispatcher::with_config(
        DispatchConfig::new()
            .with_debug(true)
            .with_convert_camel_case(true),
    );

    let payloads = [
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": 5, "b": 3}, "id": 1}"#,
        r#"{"jsonrpc": "2.0", "method": "subtract", "params": [10, 4], "id": 2}"#,
        r#"{"jsonrpc": "2.0", "method": "plus", "params": [1, 1], "id": 3}"#,
        r#"{"jsonrpc": "2.0", "method": "divide", "params": {"a": 1, "b": 0}, "id": 4}"#,
        r#"{"jsonrpc": "2.0", "method": "multiply", "params": [2, 3], "id": 5}"#,
        r#"{"jsonrpc": "2.0", "method": "add", "params": {"a": "invalid", "b": 5}, "id": 6}"#,
        r#"{"jsonrpc": "2.0", "method": "add", "params": [1, 2]}"#,
        r#"[{"jsonrpc": "2.0", "method": "sum", "params": [1, 2, 3], "id": 7},
            {"jsonrpc": "2.0", "method": "sum", "params": [4]},
            {"jsonrpc": "2.0", "method": "add", "id": 8}]"#,
        r#"{"jsonrpc": "2.0", "method": "add""#,
    ];

    for (i, payload) in payloads.iter().enumerate() {
        println!("\n--- Payload {} ---", i + 1);
        println!("Request:  {}", payload);

        let output = dispatcher.dispatch_str(&methods, payload);
        if output.needs_response() {
            println!("Response: {} ({})", output.body(), output.http_status());
        } else {
            println!("Response: <none> ({})", output.http_status());
        }
    }
}

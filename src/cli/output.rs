//! CLI output: error mapping and presentation of resolved invocations.

use crate::dispatch::Invocation;
use crate::error::InvokeError;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::{json, Value};

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &InvokeError) -> String {
    match e {
        InvokeError::InvalidValue { .. } => format!(
            "{}\nhint: quote each value as a JSON document, e.g. {} or {}",
            e, r#"'{"id":1}'"#, r#"'"text"'"#
        ),
        _ => e.to_string(),
    }
}

fn options_json(invocation: &Invocation) -> Value {
    match &invocation.options {
        Some(options) => {
            let mut value = options.to_json();
            if let (Some(_), Value::Object(fields)) = (&options.signal, &mut value) {
                fields.insert("signal".to_string(), json!("<signal>"));
            }
            value
        }
        None => Value::Null,
    }
}

fn describe(value: Option<Value>) -> String {
    match value {
        None => "(absent)".to_string(),
        Some(v) => v.to_string(),
    }
}

/// Format a resolved invocation as a table.
pub fn format_invocation_text(invocation: &Invocation, arity: usize) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Command".to_string(), invocation.command.clone()]);
    table.add_row(vec!["Values".to_string(), arity.to_string()]);
    table.add_row(vec![
        "Arguments".to_string(),
        describe(invocation.args.clone()),
    ]);
    let options = invocation.options.as_ref().map(|_| options_json(invocation));
    table.add_row(vec!["Options".to_string(), describe(options)]);
    format!("{}", table)
}

/// Format a resolved invocation as JSON.
pub fn format_invocation_json(invocation: &Invocation, arity: usize) -> String {
    let value = json!({
        "command": invocation.command,
        "values": arity,
        "args": invocation.args,
        "options": options_json(invocation),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

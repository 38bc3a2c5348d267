//! Console rendering of normalized outcomes
//!
//! The single presentation path for every request/response cycle: payloads
//! render raw (compact JSON) or pretty (indented tree), status messages
//! render styled by severity.

use console::style;
use serde_json::Value;
use sonic_core::{Outcome, Severity};

/// Render one outcome. `raw` selects compact JSON for payloads.
pub fn render(outcome: &Outcome, raw: bool) {
    match outcome {
        Outcome::Payload(value) => {
            if raw {
                println!("{}", value);
            } else {
                println!();
                println!("[ {} ] ==> ", style("Response").green().bold());
                println!();
                println!("{}", pretty(value));
            }
        }
        Outcome::Status(message, severity) => status(message, *severity),
    }
}

/// Print a severity-tagged status line
pub fn status(message: &str, severity: Severity) {
    println!();
    let styled = match severity {
        Severity::Error => style(message).red().bold(),
        Severity::Warning => style(message).yellow().bold(),
        Severity::Info => style(message).cyan().bold(),
        Severity::Success => style(message).green().bold(),
        Severity::Plain => style(message).bold(),
    };
    println!("{}", styled);
}

/// Indented human-readable rendering of a JSON payload: objects as
/// `key: value` lines, arrays as `-` items, two spaces per level.
pub fn pretty(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                if is_scalar(val) {
                    out.push_str(&format!("{}{}: {}\n", pad, key, scalar(val)));
                } else {
                    out.push_str(&format!("{}{}:\n", pad, key));
                    write_value(out, val, indent + 1);
                }
            }
        }
        Value::Array(items) => {
            for val in items {
                if is_scalar(val) {
                    out.push_str(&format!("{}- {}\n", pad, scalar(val)));
                } else {
                    out.push_str(&format!("{}-\n", pad));
                    write_value(out, val, indent + 1);
                }
            }
        }
        other => out.push_str(&format!("{}{}\n", pad, scalar(other))),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

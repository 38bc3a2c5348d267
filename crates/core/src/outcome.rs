//! Normalized command outcomes
//!
//! Every request/response cycle that does not abort the invocation ends in
//! one of these variants; transport failures travel as `Err(Error)` instead.

use serde_json::Value;

/// Severity tag for status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
    Plain,
}

/// Recovered outcome of one command invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A response payload to render (pretty or raw, decided at render time)
    Payload(Value),
    /// A severity-tagged status message
    Status(String, Severity),
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Outcome::Status(message.into(), Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Outcome::Status(message.into(), Severity::Error)
    }
}

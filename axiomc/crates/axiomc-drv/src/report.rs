//! Host-facing structured error shape.
//!
//! Hosts embedding the engine (and the CLI) surface failures as
//! `{ "kind": "Syntax" | "Type" | "Runtime", "message": ..., "line"?: ...,
//! "filename"?: ... }`.

use serde::Serialize;

use axiomc_util::{Error, ErrorKind};

/// A pipeline error, flattened for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ErrorReport {
    /// Attaches the rule's filename to the report.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

impl From<&Error> for ErrorReport {
    fn from(error: &Error) -> Self {
        Self {
            kind: error.kind(),
            message: error.message(),
            line: error.line(),
            filename: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axiomc_util::RuntimeError;

    #[test]
    fn test_syntax_report_carries_line() {
        let report = ErrorReport::from(&Error::syntax(4, "unexpected character '@'"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "Syntax");
        assert_eq!(json["line"], 4);
        assert_eq!(json["message"], "unexpected character '@'");
        assert!(json.get("filename").is_none());
    }

    #[test]
    fn test_type_report_omits_line() {
        let report = ErrorReport::from(&Error::type_error("return type mismatch"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "Type");
        assert!(json.get("line").is_none());
    }

    #[test]
    fn test_runtime_report() {
        let report = ErrorReport::from(&Error::from(RuntimeError::DivisionByZero));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "Runtime");
        assert_eq!(json["message"], "division by zero");
    }

    #[test]
    fn test_with_filename() {
        let report =
            ErrorReport::from(&Error::syntax(1, "x")).with_filename("pricing.ax");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filename"], "pricing.ax");
    }
}

//! Fatal faults
//!
//! Rill has exactly one error severity: a fault is unconditionally terminal.
//! Nothing is caught or retried; execution stops and the fault is reported
//! with the byte offset where it was detected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FaultKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("expected {expected}, found '{found}'")]
    Expected { expected: String, found: String },

    #[error("trailing input after program end")]
    TrailingInput,

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' expects {expected} arguments, got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("'{0}' is not an array")]
    NotAnArray(String),

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: u64, len: usize },

    #[error("array length {0} is too large")]
    ArrayTooLarge(u64),

    #[error("'{0}' does not hold a numeric value")]
    NotNumeric(String),

    #[error("'{0}' is already declared in this scope")]
    Redeclaration(String),

    #[error("invalid assignment to '{0}'")]
    InvalidAssignment(String),

    #[error("'{0}' cannot be printed")]
    Unprintable(String),

    #[error("return outside of a function")]
    ReturnOutsideFunction,
}

/// A terminal fault with the byte offset where it occurred
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("fault at offset {offset}: {kind}")]
pub struct Fault {
    /// What went wrong
    pub kind: FaultKind,
    /// Byte offset into the source text
    pub offset: usize,
}

impl Fault {
    /// Create a new fault at the given byte offset
    pub fn new(kind: FaultKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Render the fault the way the CLI reports it: the offset, the message,
    /// and the not-yet-executed remainder of the program text.
    pub fn report(&self, source: &str) -> String {
        let rest = source.get(self.offset..).unwrap_or("");
        format!("fault at offset {}: {}\n{}", self.offset, self.kind, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display() {
        let fault = Fault::new(FaultKind::UndefinedVariable("x".to_string()), 7);
        assert_eq!(
            fault.to_string(),
            "fault at offset 7: undefined variable 'x'"
        );
    }

    #[test]
    fn test_report_includes_remaining_text() {
        let source = "print(x) print(y)";
        let fault = Fault::new(FaultKind::UndefinedVariable("y".to_string()), 9);
        let report = fault.report(source);
        assert!(report.contains("offset 9"));
        assert!(report.ends_with("print(y)"));
    }

    #[test]
    fn test_report_offset_past_end() {
        let fault = Fault::new(FaultKind::TrailingInput, 100);
        let report = fault.report("short");
        assert!(report.ends_with('\n'));
    }

    #[test]
    fn test_fault_serializes_to_json() {
        let fault = Fault::new(
            FaultKind::ArityMismatch {
                name: "f".to_string(),
                expected: 2,
                got: 1,
            },
            4,
        );
        let json = serde_json::to_string(&fault).unwrap();
        assert!(json.contains("\"offset\":4"));
        assert!(json.contains("ArityMismatch"));
    }
}

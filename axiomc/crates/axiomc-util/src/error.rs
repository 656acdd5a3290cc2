//! Core error types for the Axiom pipeline.
//!
//! Three error kinds, disjoint by phase: syntax errors from the lexer or
//! parser, type errors from the checker, runtime errors from the
//! interpreter. Errors propagate outward without local recovery, with one
//! exception: `has(...)` converts [`RuntimeError::UndefinedVariable`] and
//! [`RuntimeError::MissingProperty`] to `false` and lets everything else
//! through. Runtime conditions are therefore a typed enum, not strings.

use serde::Serialize;
use thiserror::Error;

/// Error raised while evaluating a rule.
///
/// Each variant is one of the enumerated runtime conditions. A runtime
/// error is fatal for the execution; the AST remains reusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A name was referenced that is bound neither by the context nor by
    /// a declaration.
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    /// Member access on an object that does not carry the property.
    #[error("missing property '{0}'")]
    MissingProperty(String),

    /// Integer division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// `timestamp(..)` argument that is not an ISO-8601 instant.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// Member access on a value that is not an object.
    #[error("cannot access property '{property}' on {found}")]
    NotAnObject {
        property: String,
        found: &'static str,
    },

    /// `.exists` / `.all` or `in` applied to a value that is not a list.
    #[error("{operation} requires a list, found {found}")]
    NotAList {
        operation: &'static str,
        found: &'static str,
    },

    /// The context data violated the shape the checker assumed, e.g. a
    /// heterogeneous list or a string where an int was declared.
    #[error("expected {expected}, found {found}")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// JSON `null` in the context; null is not a value in the type system.
    #[error("null is not a value (context key '{0}')")]
    NullInContext(String),

    /// A JSON number with a fractional part where an integer was expected.
    #[error("number for '{0}' is not an integer")]
    FractionalNumber(String),
}

/// The unified pipeline error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Lexer or parser rejection, citing the offending line. Fatal for
    /// the whole rule.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    /// Checker rejection. Fatal for the whole rule.
    #[error("type error: {message}")]
    Type { message: String },

    /// Interpreter failure. Fatal for the execution only.
    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Build a syntax error at the given line.
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Build a type error.
    pub fn type_error(message: impl Into<String>) -> Self {
        Error::Type {
            message: message.into(),
        }
    }

    /// The phase this error came from.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Type { .. } => ErrorKind::Type,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }

    /// The source line, for syntax errors.
    pub fn line(&self) -> Option<u32> {
        match self {
            Error::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The bare message, without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Syntax { message, .. } => message.clone(),
            Error::Type { message } => message.clone(),
            Error::Runtime(e) => e.to_string(),
        }
    }
}

/// Which phase an [`Error`] came from. Serializes as `"Syntax"`,
/// `"Type"`, or `"Runtime"` in the host-facing error shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Syntax,
    Type,
    Runtime,
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

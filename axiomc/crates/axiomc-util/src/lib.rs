//! axiomc-util - Shared infrastructure for the Axiom rule engine
//!
//! This crate holds the error types shared by every pipeline phase.
//! The pipeline (lexer → parser → type checker → interpreter) is pure
//! over its inputs; each phase reports failure through the common
//! [`Error`] type so hosts see one structured shape regardless of
//! which phase rejected the rule.

pub mod error;

pub use error::{Error, ErrorKind, Result, RuntimeError};

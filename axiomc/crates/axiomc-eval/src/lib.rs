//! axiomc-eval - Tree-walking interpreter for the Axiom rule language
//!
//! Given a verified AST and a context (JSON data converted to the runtime
//! value union), evaluation walks the tree left-to-right and returns the
//! value of the rule's last expression statement. Execution is
//! single-threaded, synchronous, and deterministic: no wall clock, no
//! randomness, no external state. The AST is never mutated, so one
//! compiled rule can back any number of executions, each with its own
//! environment.

pub mod builtins;
pub mod context;
pub mod interp;
pub mod value;

pub use context::environment_from_json;
pub use interp::{execute, Interpreter};
pub use value::Value;

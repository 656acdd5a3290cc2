//! axiomc-sem - Type system, contract model, and type checker
//!
//! This crate carries everything the pipeline knows about types:
//!
//! - [`types::Type`]: the tagged union of rule-language types, with the
//!   structural compatibility relation (`Unknown` as wildcard),
//! - [`contract::Contract`]: the typed interface a rule is checked
//!   against: input names/types and an optional output type, interpreted
//!   from JSON type specs,
//! - [`scope::ScopeTree`]: the lexically scoped environment shared in
//!   shape with the interpreter,
//! - [`check`]: the one-pass type checker. If it succeeds, a well-typed
//!   context can only fail at runtime for the enumerated dynamic
//!   conditions (division by zero, missing property, bad timestamp).

pub mod builtins;
pub mod check;
pub mod contract;
pub mod scope;
pub mod types;

pub use check::{check, Checker};
pub use contract::{Contract, ContractError};
pub use scope::ScopeTree;
pub use types::Type;

//! Built-in function signatures.
//!
//! The standard library is a closed set of free functions called by name.
//! `has` and the `.exists` / `.all` macros are not listed here; they have
//! bespoke typing rules in the checker.

use crate::types::Type;

/// Returns `(parameter types, return type)` for a built-in, by name.
pub fn signature(name: &str) -> Option<(Vec<Type>, Type)> {
    match name {
        "startsWith" => Some((vec![Type::String, Type::String], Type::Bool)),
        "endsWith" => Some((vec![Type::String, Type::String], Type::Bool)),
        "contains" => Some((vec![Type::String, Type::String], Type::Bool)),
        "length" => Some((vec![Type::String], Type::Int)),
        // The only way to obtain a date value; parse failure is a
        // runtime error, not a type error.
        "timestamp" => Some((vec![Type::String], Type::Date)),
        _ => None,
    }
}

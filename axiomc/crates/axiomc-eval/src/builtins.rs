//! Runtime implementations of the built-in functions.

use chrono::{DateTime, Utc};

use axiomc_util::RuntimeError;

use crate::value::Value;

/// Calls a built-in by name. The checker has already validated arity and
/// argument types; a shape mismatch here means the context data violated
/// its declared types.
pub fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match (name, args) {
        ("startsWith", [Value::String(s), Value::String(prefix)]) => {
            Ok(Value::Bool(s.starts_with(prefix.as_str())))
        }
        ("endsWith", [Value::String(s), Value::String(suffix)]) => {
            Ok(Value::Bool(s.ends_with(suffix.as_str())))
        }
        ("contains", [Value::String(s), Value::String(needle)]) => {
            Ok(Value::Bool(s.contains(needle.as_str())))
        }
        ("length", [Value::String(s)]) => Ok(Value::Int(s.chars().count() as i64)),
        ("timestamp", [Value::String(s)]) => Ok(Value::Date(parse_timestamp(s)?)),
        (_, args) => Err(RuntimeError::ValueMismatch {
            expected: "string arguments",
            found: args.first().map(Value::type_name).unwrap_or("nothing"),
        }),
    }
}

/// Parses an ISO-8601 instant. The only way a `date` value enters the
/// system: either through this built-in or through a `date`-declared
/// context field.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RuntimeError> {
    DateTime::parse_from_rfc3339(s)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|_| RuntimeError::InvalidTimestamp(s.to_string()))
}

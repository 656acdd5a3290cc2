//! Runtime values.
//!
//! The tagged union the interpreter computes over. Values are immutable;
//! assignment replaces the binding, never the value. `Null` exists only as
//! the "no value produced" result of a rule whose last statement is not an
//! expression; it is not a value in the type system and cannot appear in
//! context data.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value as Json;

use axiomc_sem::Type;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    String(String),
    Bool(bool),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
    Null,
}

impl Value {
    /// Short name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Null => "null",
        }
    }

    /// The dynamic type of the value. For lists, the element type is taken
    /// from the first element (`unknown` when empty), mirroring how the
    /// checker types list literals.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::String(_) => Type::String,
            Value::Bool(_) => Type::Bool,
            Value::Date(_) => Type::Date,
            Value::List(items) => {
                let elem = items.first().map(Value::type_of).unwrap_or(Type::Unknown);
                Type::List(Box::new(elem))
            }
            Value::Object(props) => Type::Object(
                props
                    .iter()
                    .map(|(key, value)| (key.clone(), value.type_of()))
                    .collect(),
            ),
            Value::Null => Type::Unknown,
        }
    }

    /// Serializes the value back to JSON (the reverse of the context
    /// mapping). Dates become RFC 3339 strings; object property order is
    /// preserved.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Int(n) => Json::from(*n),
            Value::String(s) => Json::from(s.clone()),
            Value::Bool(b) => Json::from(*b),
            Value::Date(instant) => {
                Json::from(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(props) => Json::Object(
                props
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Null => Json::Null,
        }
    }
}

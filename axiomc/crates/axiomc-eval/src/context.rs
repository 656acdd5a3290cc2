//! Context conversion: JSON data → runtime environment.
//!
//! The context is a JSON object whose top-level keys match the contract's
//! inputs. Conversion is guided by the declared types for one purpose
//! only: a string under a declared `date` becomes an instant. Everything
//! else converts structurally. Object properties that the contract
//! declares but the data omits are simply absent; that is the condition
//! `has(...)` observes at runtime.

use serde_json::Value as Json;

use axiomc_sem::{Contract, ScopeTree, Type};
use axiomc_util::RuntimeError;

use crate::builtins::parse_timestamp;
use crate::value::Value;

/// Builds the initial environment for an execution from context JSON.
pub fn environment_from_json(
    contract: &Contract,
    context: &Json,
) -> Result<ScopeTree<Value>, RuntimeError> {
    let object = context.as_object().ok_or(RuntimeError::ValueMismatch {
        expected: "a JSON object context",
        found: json_type_name(context),
    })?;

    let mut scope = ScopeTree::new();
    for (key, json) in object {
        let value = match contract.inputs.get(key) {
            Some(declared) => convert(key, json, Some(declared))?,
            None => convert(key, json, None)?,
        };
        scope.declare(key.clone(), value);
    }
    Ok(scope)
}

/// Converts one JSON value, optionally guided by its declared type.
fn convert(key: &str, json: &Json, declared: Option<&Type>) -> Result<Value, RuntimeError> {
    match json {
        Json::Null => Err(RuntimeError::NullInContext(key.to_string())),
        Json::Bool(b) => Ok(Value::Bool(*b)),
        Json::Number(number) => {
            if let Some(n) = number.as_i64() {
                return Ok(Value::Int(n));
            }
            // Integral floats (e.g. 5.0) truncate cleanly; anything with a
            // fractional part is a runtime error.
            if let Some(f) = number.as_f64() {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    return Ok(Value::Int(f as i64));
                }
            }
            Err(RuntimeError::FractionalNumber(key.to_string()))
        }
        Json::String(s) => {
            if matches!(declared, Some(Type::Date)) {
                return Ok(Value::Date(parse_timestamp(s)?));
            }
            Ok(Value::String(s.clone()))
        }
        Json::Array(items) => {
            let elem = match declared {
                Some(Type::List(elem)) => Some(elem.as_ref()),
                _ => None,
            };
            let values = items
                .iter()
                .map(|item| convert(key, item, elem))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values))
        }
        Json::Object(fields) => {
            let declared_props = match declared {
                Some(Type::Object(props)) => Some(props),
                _ => None,
            };
            let mut props = indexmap::IndexMap::new();
            for (field, value) in fields {
                let field_ty = declared_props.and_then(|props| props.get(field));
                props.insert(field.clone(), convert(field, value, field_ty)?);
            }
            Ok(Value::Object(props))
        }
    }
}

fn json_type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

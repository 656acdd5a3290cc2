//! The contract model: the typed interface a rule is checked against.
//!
//! A contract declares the rule's input names and types (the initial typed
//! environment) and, optionally, the type its final expression must
//! produce. The core consumes a *resolved* contract: file references
//! inside type specs are the loader's concern, one layer up.

use indexmap::IndexMap;
use serde_json::Value as Json;
use thiserror::Error;

use crate::types::Type;

/// The typed interface between a rule and its host.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    /// Contract name, for reporting.
    pub name: String,
    /// Input names and types; defines the initial environment.
    pub inputs: IndexMap<String, Type>,
    /// Expected type of the rule's final expression, if constrained.
    pub outputs: Option<Type>,
}

/// Error raised while interpreting contract JSON.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("contract must be a JSON object")]
    NotAnObject,

    #[error("contract field '{0}' is missing or malformed")]
    MissingField(&'static str),

    #[error("'inputs' must be a JSON object mapping names to type specs")]
    MalformedInputs,

    #[error("unknown type spec '{0}'")]
    UnknownTypeSpec(String),

    #[error("unresolved file reference '{0}': references must be resolved before the contract reaches the core")]
    UnresolvedReference(String),

    #[error("a list type spec must be an array with exactly one element shape")]
    MalformedListSpec,

    #[error("a type spec must be a string, array, or object (found {0})")]
    MalformedTypeSpec(&'static str),
}

impl Contract {
    /// Creates a contract from already-built parts.
    pub fn new(
        name: impl Into<String>,
        inputs: IndexMap<String, Type>,
        outputs: Option<Type>,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Interprets contract JSON:
    ///
    /// ```json
    /// { "name": "...", "inputs": { "user": {"name": "string"} }, "outputs": "int" }
    /// ```
    ///
    /// `outputs` may be absent or `null`. Input order is preserved.
    pub fn from_json(json: &Json) -> Result<Contract, ContractError> {
        let obj = json.as_object().ok_or(ContractError::NotAnObject)?;

        let name = obj
            .get("name")
            .and_then(Json::as_str)
            .ok_or(ContractError::MissingField("name"))?
            .to_string();

        let inputs_json = obj
            .get("inputs")
            .ok_or(ContractError::MissingField("inputs"))?;
        let inputs_obj = inputs_json
            .as_object()
            .ok_or(ContractError::MalformedInputs)?;

        let mut inputs = IndexMap::new();
        for (key, spec) in inputs_obj {
            inputs.insert(key.clone(), parse_type_spec(spec)?);
        }

        let outputs = match obj.get("outputs") {
            None | Some(Json::Null) => None,
            Some(spec) => Some(parse_type_spec(spec)?),
        };

        Ok(Contract {
            name,
            inputs,
            outputs,
        })
    }
}

/// Interprets a `TypeSpec` JSON value.
///
/// - `"int" | "string" | "bool" | "date"`: primitive
/// - `"<spec>[]"`: list of the prefix spec
/// - `[ spec ]`: list of the given shape
/// - `{ "key": spec, ... }`: inline object shape
pub fn parse_type_spec(spec: &Json) -> Result<Type, ContractError> {
    match spec {
        Json::String(s) => parse_type_name(s),
        Json::Array(items) => {
            if items.len() != 1 {
                return Err(ContractError::MalformedListSpec);
            }
            Ok(Type::List(Box::new(parse_type_spec(&items[0])?)))
        }
        Json::Object(fields) => {
            let mut props = IndexMap::new();
            for (key, value) in fields {
                props.insert(key.clone(), parse_type_spec(value)?);
            }
            Ok(Type::Object(props))
        }
        Json::Null => Err(ContractError::MalformedTypeSpec("null")),
        Json::Bool(_) => Err(ContractError::MalformedTypeSpec("boolean")),
        Json::Number(_) => Err(ContractError::MalformedTypeSpec("number")),
    }
}

fn parse_type_name(name: &str) -> Result<Type, ContractError> {
    if let Some(prefix) = name.strip_suffix("[]") {
        return Ok(Type::List(Box::new(parse_type_name(prefix)?)));
    }
    match name {
        "int" => Ok(Type::Int),
        "string" => Ok(Type::String),
        "bool" => Ok(Type::Bool),
        "date" => Ok(Type::Date),
        _ if name.ends_with(".json") || name.starts_with("./") || name.starts_with('/') => {
            Err(ContractError::UnresolvedReference(name.to_string()))
        }
        _ => Err(ContractError::UnknownTypeSpec(name.to_string())),
    }
}

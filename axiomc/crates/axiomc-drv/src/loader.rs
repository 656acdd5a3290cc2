//! Contract loading.
//!
//! The core consumes resolved, in-memory contracts; this module is the
//! loader layer in front of it. It reads a contract JSON file, splices in
//! file-referenced type specs (strings ending in `.json` or starting with
//! `./` or `/`, resolved relative to the referencing file), and accepts
//! the legacy flat-schema form (a bare inputs object) as
//! `{ inputs: flat, outputs: none }`.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value as Json;

use axiomc_sem::Contract;

/// References may nest (a referenced file may itself reference others),
/// but not unboundedly.
const MAX_REF_DEPTH: usize = 8;

/// Loads and resolves a contract from a JSON file.
pub fn load_contract(path: &Path) -> anyhow::Result<Contract> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read contract file {}", path.display()))?;
    let mut json: Json = serde_json::from_str(&text)
        .with_context(|| format!("contract file {} is not valid JSON", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_refs(&mut json, base, 0)?;

    let json = normalize(json, path);
    Contract::from_json(&json)
        .with_context(|| format!("invalid contract in {}", path.display()))
}

/// True if a type-spec string is a file reference rather than a type name.
fn is_file_ref(spec: &str) -> bool {
    spec.ends_with(".json") || spec.starts_with("./") || spec.starts_with('/')
}

/// Replaces file-reference strings with the parsed content of the file
/// they point to, recursively.
fn resolve_refs(value: &mut Json, base: &Path, depth: usize) -> anyhow::Result<()> {
    if depth > MAX_REF_DEPTH {
        bail!("contract reference nesting exceeds {MAX_REF_DEPTH} levels");
    }

    match value {
        Json::String(spec) if is_file_ref(spec) => {
            let target = base.join(spec.as_str());
            let text = fs::read_to_string(&target).with_context(|| {
                format!("failed to read referenced type spec {}", target.display())
            })?;
            let mut loaded: Json = serde_json::from_str(&text).with_context(|| {
                format!("referenced type spec {} is not valid JSON", target.display())
            })?;
            let next_base = target.parent().unwrap_or_else(|| Path::new("."));
            resolve_refs(&mut loaded, next_base, depth + 1)?;
            *value = loaded;
        }
        Json::Array(items) => {
            for item in items {
                resolve_refs(item, base, depth)?;
            }
        }
        Json::Object(fields) => {
            for (key, item) in fields {
                // The contract's own name is not a type spec.
                if depth == 0 && key == "name" {
                    continue;
                }
                resolve_refs(item, base, depth)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Accepts the legacy flat-schema form: a JSON object without an
/// `inputs` field is treated as the inputs mapping itself, named after
/// the file.
fn normalize(json: Json, path: &Path) -> Json {
    let is_flat = json
        .as_object()
        .is_some_and(|fields| !fields.contains_key("inputs"));
    if !is_flat {
        return json;
    }
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "contract".to_string());
    serde_json::json!({ "name": name, "inputs": json })
}

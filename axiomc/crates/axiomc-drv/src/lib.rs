//! axiomc-drv - Pipeline driver for the Axiom rule engine
//!
//! The public surface of the engine, composing the phase crates:
//!
//! - [`compile`]: source text → AST (lex + parse)
//! - [`check`]: AST + contract → inferred result type (or type error)
//! - [`execute`]: AST + contract + context JSON → result value
//! - [`eval`]: the three above, chained
//!
//! Compilation and checking may run once; the AST is immutable and can
//! back any number of executions (and be shared across threads; it is
//! owned data with no interior mutability). This crate also hosts the
//! loader layer (contract files, `./*.json` type-spec references, the
//! legacy flat schema form) and the host-facing structured error report.

pub mod loader;
pub mod report;

pub use report::ErrorReport;

use serde_json::Value as Json;
use tracing::debug;

use axiomc_eval::Value;
use axiomc_par::ast::Ast;
use axiomc_sem::{Contract, Type};
use axiomc_util::{Error, Result};

/// Compiles rule source text into an AST.
pub fn compile(source: &str) -> Result<Ast> {
    let tokens = axiomc_lex::tokenize(source)?;
    debug!(tokens = tokens.len(), "lexed rule");
    let ast = axiomc_par::parse(tokens)?;
    debug!(statements = ast.len(), "parsed rule");
    Ok(ast)
}

/// Type-checks an AST against a contract.
///
/// Returns the inferred type of the rule's final expression statement,
/// or `None` when the rule ends without one (legal only for contracts
/// with no declared output).
pub fn check(ast: &Ast, contract: &Contract) -> Result<Option<Type>> {
    let result = axiomc_sem::check(ast, contract)?;
    debug!(contract = %contract.name, result_type = ?result.as_ref().map(Type::to_string), "checked rule");
    Ok(result)
}

/// Executes a verified AST with context JSON.
///
/// The context object is converted to runtime values guided by the
/// contract's declared input types, then the interpreter runs over a
/// fresh environment. The AST is reusable afterwards, even if execution
/// fails.
pub fn execute(ast: &Ast, contract: &Contract, context: &Json) -> Result<Value> {
    let environment = axiomc_eval::environment_from_json(contract, context).map_err(Error::from)?;
    let value = axiomc_eval::execute(ast, environment)?;
    debug!(result_type = value.type_name(), "executed rule");
    Ok(value)
}

/// Convenience: compile, check, and execute in one call.
pub fn eval(source: &str, contract: &Contract, context: &Json) -> Result<Value> {
    let ast = compile(source)?;
    check(&ast, contract)?;
    execute(&ast, contract, context)
}

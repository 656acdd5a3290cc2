//! The tree-walking interpreter.
//!
//! Evaluation is strict left-to-right, top-to-bottom, with three
//! exceptions: `&&`/`||` short-circuit their right operand, `if` runs only
//! the chosen branch, and the list macros stop at the earliest
//! short-circuit point. Integer arithmetic is two's-complement 64-bit and
//! wraps on overflow; only division by zero traps.
//!
//! The environment mirrors the checker's scoping exactly: blocks push and
//! pop a scope, and the macro parameter lives in its own scope that is
//! dropped on every exit path, restoring any outer binding.

use axiomc_par::ast::{
    Ast, BinOp, CallExpr, Expr, LambdaExpr, Literal, MemberExpr, Stmt, UnOp,
};
use axiomc_sem::ScopeTree;
use axiomc_util::RuntimeError;

use crate::builtins;
use crate::value::Value;

/// Runs a verified program in the given environment and returns the value
/// of its last evaluated expression statement, or `Null` if none ran.
pub fn execute(ast: &Ast, environment: ScopeTree<Value>) -> Result<Value, RuntimeError> {
    Interpreter::new(environment).run(ast)
}

/// Interpreter state: the scope stack and the running "last value".
pub struct Interpreter {
    scope: ScopeTree<Value>,
    last_value: Value,
}

impl Interpreter {
    /// Creates an interpreter over an environment seeded from context
    /// data.
    pub fn new(environment: ScopeTree<Value>) -> Self {
        Self {
            scope: environment,
            last_value: Value::Null,
        }
    }

    /// Executes every statement; each expression statement updates the
    /// running last value, which becomes the rule's result.
    pub fn run(&mut self, ast: &Ast) -> Result<Value, RuntimeError> {
        for stmt in ast {
            self.exec_stmt(stmt)?;
        }
        Ok(std::mem::replace(&mut self.last_value, Value::Null))
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::VarDecl(decl) => {
                let value = self.eval_expr(&decl.init)?;
                self.scope.declare(decl.name.clone(), value);
                Ok(())
            }
            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.value)?;
                if self.scope.assign(&assign.name, value) {
                    Ok(())
                } else {
                    Err(RuntimeError::UndefinedVariable(assign.name.clone()))
                }
            }
            Stmt::If(stmt) => {
                // Truthy means exactly Bool(true).
                let cond = self.eval_expr(&stmt.cond)?;
                if cond == Value::Bool(true) {
                    self.exec_stmt(&stmt.then_branch)
                } else if let Some(else_branch) = &stmt.else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::Block(stmts) => {
                self.scope.enter_scope();
                let mut result = Ok(());
                for stmt in stmts {
                    result = self.exec_stmt(stmt);
                    if result.is_err() {
                        break;
                    }
                }
                self.scope.exit_scope();
                result
            }
            Stmt::Expr(expr) => {
                self.last_value = self.eval_expr(expr)?;
                Ok(())
            }
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(n) => Value::Int(*n),
                Literal::Str(s) => Value::String(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
            }),
            Expr::Variable(name) => match self.scope.resolve(name) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::UndefinedVariable(name.clone())),
            },
            Expr::Unary(unary) => {
                let operand = self.eval_expr(&unary.operand)?;
                match (unary.op, operand) {
                    (UnOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (UnOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
                    (UnOp::Not, other) => Err(RuntimeError::ValueMismatch {
                        expected: "bool",
                        found: other.type_name(),
                    }),
                    (UnOp::Neg, other) => Err(RuntimeError::ValueMismatch {
                        expected: "int",
                        found: other.type_name(),
                    }),
                }
            }
            Expr::Binary(binary) => match binary.op {
                BinOp::And => self.eval_logical(&binary.left, &binary.right, false),
                BinOp::Or => self.eval_logical(&binary.left, &binary.right, true),
                op => {
                    let left = self.eval_expr(&binary.left)?;
                    let right = self.eval_expr(&binary.right)?;
                    eval_binary(op, left, right)
                }
            },
            Expr::Member(member) => self.eval_member(member),
            Expr::List(elements) => {
                let values = elements
                    .iter()
                    .map(|element| self.eval_expr(element))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }
            Expr::Object(fields) => {
                let mut props = indexmap::IndexMap::new();
                for (key, value) in fields {
                    let value = self.eval_expr(value)?;
                    props.insert(key.clone(), value);
                }
                Ok(Value::Object(props))
            }
            Expr::Call(call) => self.eval_call(call),
            Expr::Lambda(_) => Err(RuntimeError::ValueMismatch {
                expected: "a macro argument position",
                found: "lambda",
            }),
        }
    }

    /// Short-circuiting `&&` / `||`. The right operand is not evaluated
    /// when the left fixes the result.
    fn eval_logical(
        &mut self,
        left: &Expr,
        right: &Expr,
        short_on: bool,
    ) -> Result<Value, RuntimeError> {
        match self.eval_expr(left)? {
            Value::Bool(b) if b == short_on => Ok(Value::Bool(short_on)),
            Value::Bool(_) => match self.eval_expr(right)? {
                Value::Bool(b) => Ok(Value::Bool(b)),
                other => Err(RuntimeError::ValueMismatch {
                    expected: "bool",
                    found: other.type_name(),
                }),
            },
            other => Err(RuntimeError::ValueMismatch {
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }

    fn eval_member(&mut self, member: &MemberExpr) -> Result<Value, RuntimeError> {
        let object = self.eval_expr(&member.object)?;
        match object {
            Value::Object(props) => match props.get(&member.property) {
                Some(value) => Ok(value.clone()),
                None => Err(RuntimeError::MissingProperty(member.property.clone())),
            },
            other => Err(RuntimeError::NotAnObject {
                property: member.property.clone(),
                found: other.type_name(),
            }),
        }
    }

    /// Call dispatch mirroring the checker: `has`, named built-ins, and
    /// the list macros.
    fn eval_call(&mut self, call: &CallExpr) -> Result<Value, RuntimeError> {
        match call.callee.as_ref() {
            Expr::Variable(name) if name == "has" => {
                let [arg] = call.args.as_slice() else {
                    return Err(RuntimeError::ValueMismatch {
                        expected: "one argument to has",
                        found: "argument list",
                    });
                };
                self.eval_has(arg)
            }
            Expr::Variable(name) => {
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                builtins::call(name, &args)
            }
            Expr::Member(member) => {
                let [Expr::Lambda(lambda)] = call.args.as_slice() else {
                    return Err(RuntimeError::ValueMismatch {
                        expected: "a (parameter, body) macro argument",
                        found: "argument list",
                    });
                };
                self.eval_macro(member, lambda)
            }
            _ => Err(RuntimeError::ValueMismatch {
                expected: "a function or macro name",
                found: "expression",
            }),
        }
    }

    /// `has(e)`: true if `e` evaluates to any value; false if evaluation
    /// fails with a missing property or undefined variable. Any other
    /// runtime error propagates.
    fn eval_has(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match self.eval_expr(expr) {
            Ok(_) => Ok(Value::Bool(true)),
            Err(RuntimeError::MissingProperty(_)) | Err(RuntimeError::UndefinedVariable(_)) => {
                Ok(Value::Bool(false))
            }
            Err(other) => Err(other),
        }
    }

    /// `.exists` / `.all`: iterate the list in index order, binding the
    /// parameter in a fresh scope per element. `exists` stops at the first
    /// true body, `all` at the first false one.
    fn eval_macro(
        &mut self,
        member: &MemberExpr,
        lambda: &LambdaExpr,
    ) -> Result<Value, RuntimeError> {
        let is_exists = member.property == "exists";
        let operation: &'static str = if is_exists { "exists" } else { "all" };

        let items = match self.eval_expr(&member.object)? {
            Value::List(items) => items,
            other => {
                return Err(RuntimeError::NotAList {
                    operation,
                    found: other.type_name(),
                })
            }
        };

        for item in items {
            self.scope.enter_scope();
            self.scope.declare(lambda.param.clone(), item);
            let result = self.eval_expr(&lambda.body);
            self.scope.exit_scope();

            match result? {
                Value::Bool(truthy) => {
                    if truthy == is_exists {
                        return Ok(Value::Bool(is_exists));
                    }
                }
                other => {
                    return Err(RuntimeError::ValueMismatch {
                        expected: "bool",
                        found: other.type_name(),
                    })
                }
            }
        }

        Ok(Value::Bool(!is_exists))
    }
}

/// Non-short-circuiting binary operators over evaluated operands.
fn eval_binary(op: BinOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (op, left, right) {
        (BinOp::Add, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(b))),
        (BinOp::Add, Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (BinOp::Sub, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(b))),
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(b))),
        (BinOp::Div, Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                Err(RuntimeError::DivisionByZero)
            } else {
                Ok(Value::Int(a.wrapping_div(b)))
            }
        }
        (BinOp::Eq, a, b) => Ok(Value::Bool(a == b)),
        (BinOp::Ne, a, b) => Ok(Value::Bool(a != b)),
        (BinOp::Lt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Gt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Le, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a <= b)),
        (BinOp::Ge, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a >= b)),
        (BinOp::Lt, Value::Date(a), Value::Date(b)) => Ok(Value::Bool(a < b)),
        (BinOp::Gt, Value::Date(a), Value::Date(b)) => Ok(Value::Bool(a > b)),
        (BinOp::Le, Value::Date(a), Value::Date(b)) => Ok(Value::Bool(a <= b)),
        (BinOp::Ge, Value::Date(a), Value::Date(b)) => Ok(Value::Bool(a >= b)),
        (BinOp::In, needle, Value::List(items)) => {
            Ok(Value::Bool(items.contains(&needle)))
        }
        (BinOp::In, _, other) => Err(RuntimeError::NotAList {
            operation: "in",
            found: other.type_name(),
        }),
        (op, left, right) => Err(RuntimeError::ValueMismatch {
            expected: operand_expectation(op),
            found: if operand_matches(op, &left) {
                right.type_name()
            } else {
                left.type_name()
            },
        }),
    }
}

fn operand_expectation(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "int or string operands",
        BinOp::Sub | BinOp::Mul | BinOp::Div => "int operands",
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => "int or date operands",
        _ => "matching operands",
    }
}

fn operand_matches(op: BinOp, value: &Value) -> bool {
    match op {
        BinOp::Add => matches!(value, Value::Int(_) | Value::String(_)),
        BinOp::Sub | BinOp::Mul | BinOp::Div => matches!(value, Value::Int(_)),
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
            matches!(value, Value::Int(_) | Value::Date(_))
        }
        _ => true,
    }
}

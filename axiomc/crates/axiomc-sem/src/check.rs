//! The type checker.
//!
//! One left-to-right pass over the statement list. The environment is
//! seeded from the contract's inputs; expressions are inferred bottom-up
//! and statements checked top-down. Blocks push and pop a scope, so
//! declarations inside an `if` body do not leak. If the contract declares
//! an output type, the final statement must be an expression of a
//! compatible type.

use axiomc_par::ast::{
    Ast, BinOp, CallExpr, Expr, Literal, MemberExpr, Stmt, UnOp,
};
use axiomc_util::{Error, Result};

use crate::builtins;
use crate::contract::Contract;
use crate::scope::ScopeTree;
use crate::types::Type;

/// Checks a program against a contract.
///
/// On success, returns the inferred type of the final expression
/// statement, or `None` if the program does not end with one (only legal
/// when the contract declares no output type).
pub fn check(ast: &Ast, contract: &Contract) -> Result<Option<Type>> {
    Checker::new(contract).check_program(ast)
}

/// Checker state: the contract under validation and the scope stack.
pub struct Checker<'a> {
    contract: &'a Contract,
    scope: ScopeTree<Type>,
}

impl<'a> Checker<'a> {
    /// Creates a checker with the environment seeded from the contract.
    pub fn new(contract: &'a Contract) -> Self {
        let mut scope = ScopeTree::new();
        for (name, ty) in &contract.inputs {
            scope.declare(name.clone(), ty.clone());
        }
        Self { contract, scope }
    }

    /// Checks every statement, then validates the result type if the
    /// contract constrains it.
    pub fn check_program(&mut self, ast: &Ast) -> Result<Option<Type>> {
        let mut last = None;
        for stmt in ast {
            last = self.check_stmt(stmt)?;
        }

        if let Some(expected) = &self.contract.outputs {
            match (ast.last(), &last) {
                (Some(Stmt::Expr(_)), Some(actual)) => {
                    self.check_output(actual, expected)?;
                }
                _ => {
                    return Err(Error::type_error(
                        "script does not end with an expression",
                    ))
                }
            }
        }

        Ok(last)
    }

    /// Checks one statement. Returns the inferred type for expression
    /// statements, `None` otherwise.
    fn check_stmt(&mut self, stmt: &Stmt) -> Result<Option<Type>> {
        match stmt {
            Stmt::VarDecl(decl) => {
                let annotation = Type::from_anno(&decl.annotation);
                let init = self.infer_expr(&decl.init)?;
                if !init.compatible(&annotation) {
                    return Err(Error::type_error(format!(
                        "type mismatch in declaration of '{}': expected {annotation}, found {init}",
                        decl.name
                    )));
                }
                if self.scope.is_bound(&decl.name) {
                    return Err(Error::type_error(format!(
                        "duplicate declaration of '{}'",
                        decl.name
                    )));
                }
                self.scope.declare(decl.name.clone(), annotation);
                Ok(None)
            }
            Stmt::Assign(assign) => {
                let bound = match self.scope.resolve(&assign.name) {
                    Some(ty) => ty.clone(),
                    None => {
                        return Err(Error::type_error(format!(
                            "undefined variable '{}'",
                            assign.name
                        )))
                    }
                };
                let value = self.infer_expr(&assign.value)?;
                if !value.compatible(&bound) {
                    return Err(Error::type_error(format!(
                        "type mismatch in assignment to '{}': expected {bound}, found {value}",
                        assign.name
                    )));
                }
                Ok(None)
            }
            Stmt::If(stmt) => {
                let cond = self.infer_expr(&stmt.cond)?;
                if !cond.compatible(&Type::Bool) {
                    return Err(Error::type_error(format!(
                        "if condition must be bool, found {cond}"
                    )));
                }
                self.check_stmt(&stmt.then_branch)?;
                if let Some(else_branch) = &stmt.else_branch {
                    self.check_stmt(else_branch)?;
                }
                Ok(None)
            }
            Stmt::Block(stmts) => {
                self.scope.enter_scope();
                let mut result = Ok(None);
                for stmt in stmts {
                    result = self.check_stmt(stmt);
                    if result.is_err() {
                        break;
                    }
                }
                self.scope.exit_scope();
                result.map(|_| None)
            }
            Stmt::Expr(expr) => Ok(Some(self.infer_expr(expr)?)),
        }
    }

    /// Infers the type of an expression bottom-up.
    fn infer_expr(&mut self, expr: &Expr) -> Result<Type> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(_) => Type::Int,
                Literal::Str(_) => Type::String,
                Literal::Bool(_) => Type::Bool,
            }),
            Expr::Variable(name) => match self.scope.resolve(name) {
                Some(ty) => Ok(ty.clone()),
                None => Err(Error::type_error(format!("undefined variable '{name}'"))),
            },
            Expr::Unary(unary) => {
                let operand = self.infer_expr(&unary.operand)?;
                match unary.op {
                    UnOp::Not => {
                        if !operand.compatible(&Type::Bool) {
                            return Err(Error::type_error(format!(
                                "operator '!' requires bool, found {operand}"
                            )));
                        }
                        Ok(Type::Bool)
                    }
                    UnOp::Neg => {
                        if !operand.compatible(&Type::Int) {
                            return Err(Error::type_error(format!(
                                "operator '-' requires int, found {operand}"
                            )));
                        }
                        Ok(Type::Int)
                    }
                }
            }
            Expr::Binary(binary) => {
                let left = self.infer_expr(&binary.left)?;
                let right = self.infer_expr(&binary.right)?;
                self.infer_binary(binary.op, &left, &right)
            }
            Expr::Member(member) => self.infer_member(member),
            Expr::List(elements) => {
                let Some(first) = elements.first() else {
                    return Ok(Type::List(Box::new(Type::Unknown)));
                };
                let elem = self.infer_expr(first)?;
                for element in &elements[1..] {
                    let ty = self.infer_expr(element)?;
                    if !ty.compatible(&elem) {
                        return Err(Error::type_error(format!(
                            "list elements must be homogeneous: expected {elem}, found {ty}"
                        )));
                    }
                }
                Ok(Type::List(Box::new(elem)))
            }
            Expr::Object(fields) => {
                let mut props = indexmap::IndexMap::new();
                for (key, value) in fields {
                    if props.contains_key(key) {
                        return Err(Error::type_error(format!(
                            "duplicate property '{key}' in object literal"
                        )));
                    }
                    let ty = self.infer_expr(value)?;
                    props.insert(key.clone(), ty);
                }
                Ok(Type::Object(props))
            }
            Expr::Call(call) => self.infer_call(call),
            Expr::Lambda(_) => Err(Error::type_error(
                "lambda expressions may appear only as macro arguments",
            )),
        }
    }

    fn infer_binary(&mut self, op: BinOp, left: &Type, right: &Type) -> Result<Type> {
        let int_ok = |t: &Type| t.compatible(&Type::Int);
        let bool_ok = |t: &Type| t.compatible(&Type::Bool);
        let date_ok = |t: &Type| t.compatible(&Type::Date);
        let string_ok = |t: &Type| t.compatible(&Type::String);

        match op {
            BinOp::Add => {
                if int_ok(left) && int_ok(right) {
                    Ok(Type::Int)
                } else if string_ok(left) && string_ok(right) {
                    Ok(Type::String)
                } else {
                    Err(Error::type_error(format!(
                        "operator '+' requires int or string operands, found {left} and {right}"
                    )))
                }
            }
            BinOp::Sub | BinOp::Mul | BinOp::Div => {
                if int_ok(left) && int_ok(right) {
                    Ok(Type::Int)
                } else {
                    Err(Error::type_error(format!(
                        "operator '{}' requires int operands, found {left} and {right}",
                        op_symbol(op)
                    )))
                }
            }
            BinOp::Eq | BinOp::Ne => {
                if left.compatible(right) {
                    Ok(Type::Bool)
                } else {
                    Err(Error::type_error(format!(
                        "operands of '{}' must have the same type, found {left} and {right}",
                        op_symbol(op)
                    )))
                }
            }
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                if (int_ok(left) && int_ok(right)) || (date_ok(left) && date_ok(right)) {
                    Ok(Type::Bool)
                } else {
                    Err(Error::type_error(format!(
                        "operator '{}' requires int or date operands, found {left} and {right}",
                        op_symbol(op)
                    )))
                }
            }
            BinOp::And | BinOp::Or => {
                if bool_ok(left) && bool_ok(right) {
                    Ok(Type::Bool)
                } else {
                    Err(Error::type_error(format!(
                        "operator '{}' requires bool operands, found {left} and {right}",
                        op_symbol(op)
                    )))
                }
            }
            BinOp::In => match right {
                Type::List(elem) => {
                    if left.compatible(elem) {
                        Ok(Type::Bool)
                    } else {
                        Err(Error::type_error(format!(
                            "'in' requires matching element type: found {left} against {right}"
                        )))
                    }
                }
                Type::Unknown => Ok(Type::Bool),
                _ => Err(Error::type_error(format!(
                    "'in' requires a list on the right, found {right}"
                ))),
            },
        }
    }

    fn infer_member(&mut self, member: &MemberExpr) -> Result<Type> {
        let object = self.infer_expr(&member.object)?;
        match object {
            Type::Object(props) => match props.get(&member.property) {
                Some(ty) => Ok(ty.clone()),
                None => Err(Error::type_error(format!(
                    "property '{}' does not exist on {}",
                    member.property,
                    Type::Object(props.clone())
                ))),
            },
            other => Err(Error::type_error(format!(
                "cannot access property '{}' on {other}",
                member.property
            ))),
        }
    }

    /// Call dispatch: `has`, the list macros, and named built-ins.
    fn infer_call(&mut self, call: &CallExpr) -> Result<Type> {
        match call.callee.as_ref() {
            Expr::Variable(name) if name == "has" => self.infer_has(call),
            Expr::Variable(name) => self.infer_builtin(name, call),
            Expr::Member(member) => self.infer_macro(member, call),
            _ => Err(Error::type_error("expression is not callable")),
        }
    }

    /// `has(e)` where `e` is a property-access chain. Only the root of the
    /// chain must be a bound variable; intermediate property existence is
    /// a dynamic question, which is the point of `has`.
    fn infer_has(&mut self, call: &CallExpr) -> Result<Type> {
        if call.args.len() != 1 {
            return Err(Error::type_error(format!(
                "has expects exactly 1 argument, found {}",
                call.args.len()
            )));
        }

        let Expr::Member(member) = &call.args[0] else {
            return Err(Error::type_error(
                "has expects a property access argument, e.g. has(user.name)",
            ));
        };

        let mut object = member.object.as_ref();
        loop {
            match object {
                Expr::Member(inner) => object = inner.object.as_ref(),
                Expr::Variable(root) => {
                    if !self.scope.is_bound(root) {
                        return Err(Error::type_error(format!("undefined variable '{root}'")));
                    }
                    return Ok(Type::Bool);
                }
                _ => {
                    return Err(Error::type_error(
                        "has expects a property access rooted at a variable",
                    ))
                }
            }
        }
    }

    /// `xs.exists(p, body)` / `xs.all(p, body)`: the receiver must be a
    /// list; the parameter is bound to the element type while the body is
    /// inferred, and must not shadow an existing name.
    fn infer_macro(&mut self, member: &MemberExpr, call: &CallExpr) -> Result<Type> {
        let macro_name = member.property.as_str();
        if macro_name != "exists" && macro_name != "all" {
            return Err(Error::type_error(format!("unknown macro '{macro_name}'")));
        }

        let receiver = self.infer_expr(&member.object)?;
        let elem = match &receiver {
            Type::List(elem) => elem.as_ref().clone(),
            Type::Unknown => Type::Unknown,
            other => {
                return Err(Error::type_error(format!(
                    "{macro_name} requires a list, found {other}"
                )))
            }
        };

        let [Expr::Lambda(lambda)] = call.args.as_slice() else {
            return Err(Error::type_error(format!(
                "{macro_name} expects a single (parameter, body) argument"
            )));
        };

        if self.scope.is_bound(&lambda.param) {
            return Err(Error::type_error(format!(
                "macro parameter '{}' shadows an existing binding",
                lambda.param
            )));
        }

        self.scope.enter_scope();
        self.scope.declare(lambda.param.clone(), elem);
        let body = self.infer_expr(&lambda.body);
        self.scope.exit_scope();
        let body = body?;

        if !body.compatible(&Type::Bool) {
            return Err(Error::type_error(format!(
                "{macro_name} body must be bool, found {body}"
            )));
        }
        Ok(Type::Bool)
    }

    fn infer_builtin(&mut self, name: &str, call: &CallExpr) -> Result<Type> {
        let Some((params, ret)) = builtins::signature(name) else {
            return Err(Error::type_error(format!("unknown function '{name}'")));
        };

        if call.args.len() != params.len() {
            return Err(Error::type_error(format!(
                "{name} expects {} argument{}, found {}",
                params.len(),
                if params.len() == 1 { "" } else { "s" },
                call.args.len()
            )));
        }

        for (index, (arg, param)) in call.args.iter().zip(&params).enumerate() {
            let ty = self.infer_expr(arg)?;
            if !ty.compatible(param) {
                return Err(Error::type_error(format!(
                    "argument {} of {name} must be {param}, found {ty}",
                    index + 1
                )));
            }
        }
        Ok(ret)
    }

    /// Validates the final expression's type against the declared output.
    ///
    /// Object targets are validated property-by-property, reporting the
    /// first mismatching key; a target object with no declared properties
    /// accepts any object.
    fn check_output(&self, actual: &Type, expected: &Type) -> Result<()> {
        if let (Type::Object(expected_props), Type::Object(actual_props)) = (expected, actual) {
            if expected_props.is_empty() {
                return Ok(());
            }
            for (key, expected_ty) in expected_props {
                match actual_props.get(key) {
                    None => {
                        return Err(Error::type_error(format!(
                            "return type mismatch: missing property '{key}'"
                        )))
                    }
                    Some(actual_ty) if !actual_ty.compatible(expected_ty) => {
                        return Err(Error::type_error(format!(
                            "return type mismatch: property '{key}' must be {expected_ty}, found {actual_ty}"
                        )))
                    }
                    Some(_) => {}
                }
            }
            return Ok(());
        }

        if !actual.compatible(expected) {
            return Err(Error::type_error(format!(
                "return type mismatch: expected {expected}, found {actual}"
            )));
        }
        Ok(())
    }
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::Le => "<=",
        BinOp::Ge => ">=",
        BinOp::And => "&&",
        BinOp::Or => "||",
        BinOp::In => "in",
    }
}

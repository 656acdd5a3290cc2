//! axiomc-par - AST node definitions
//!
//! This module contains all AST node definitions produced by the parser.
//! The tree is owned and immutable after parsing; the checker and the
//! interpreter traverse it without rewriting nodes.

/// AST root - a rule is a list of statements.
pub type Ast = Vec<Stmt>;

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration: `let name: anno = init;`
    VarDecl(VarDeclStmt),

    /// Assignment to an existing binding: `name = value;`
    Assign(AssignStmt),

    /// Conditional: `if (cond) then else?`
    If(IfStmt),

    /// Braced statement sequence
    Block(Vec<Stmt>),

    /// Expression statement; the last one is the rule's implicit return
    Expr(Expr),
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub name: String,
    pub annotation: TypeAnno,
    pub init: Expr,
}

/// Assignment
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub name: String,
    pub value: Expr,
}

/// Conditional statement
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

/// Syntactic type annotation: a primitive, optionally list-suffixed
/// (`int[]`). The checker lowers this to its semantic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeAnno {
    pub prim: PrimType,
    pub is_list: bool,
}

/// Primitive type keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimType {
    Int,
    String,
    Bool,
    Date,
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Literal),

    /// Variable reference
    Variable(String),

    /// Unary operation: `!e`, `-e`
    Unary(UnaryExpr),

    /// Binary operation
    Binary(BinaryExpr),

    /// Property access: `object.property`
    Member(MemberExpr),

    /// List literal: `[a, b, c]`
    List(Vec<Expr>),

    /// Object literal: `{key: expr, ...}`; property order is source order
    Object(Vec<(String, Expr)>),

    /// Call: `callee(args...)`. Built-ins are called by name; the macro
    /// forms `.exists` / `.all` parse as a call whose callee is a member
    /// access and whose single argument is a lambda.
    Call(CallExpr),

    /// Lambda: the macro body form `(param, body)`. Lambdas are not
    /// first-class values; they appear only as macro arguments.
    Lambda(LambdaExpr),
}

/// Literal expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Str(String),
    Bool(bool),
}

/// Unary expression
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub operand: Box<Expr>,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// `-` integer negation
    Neg,
    /// `!` boolean not
    Not,
}

/// Binary expression
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    /// List membership: `x in xs`
    In,
}

/// Property access expression
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: String,
}

/// Call expression
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

/// Lambda expression (macro argument only)
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub param: String,
    pub body: Box<Expr>,
}

impl Expr {
    /// Convenience constructor for binary nodes.
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

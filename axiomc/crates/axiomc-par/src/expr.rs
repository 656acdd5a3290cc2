//! Expression parsing using Pratt parsing (top-down operator precedence).
//!
//! Each infix operator has a pair of binding powers; left-associative
//! operators bind tighter on the right (`right_bp = left_bp + 1`). The
//! loop consumes operators while their left binding power is at least the
//! minimum, which yields the precedence ladder documented in the crate
//! root.

use axiomc_lex::TokenKind;
use axiomc_util::Result;

use crate::ast::{BinOp, CallExpr, Expr, LambdaExpr, Literal, MemberExpr, UnOp, UnaryExpr};
use crate::Parser;

/// Binding power levels. Higher numbers bind tighter.
mod bp {
    /// Minimum binding power (start of expression)
    pub const MIN: u8 = 0;

    /// Logical OR: ||
    pub const LOGICAL_OR: u8 = 2;

    /// Logical AND: &&
    pub const LOGICAL_AND: u8 = 4;

    /// Equality: ==, !=
    pub const EQUALITY: u8 = 6;

    /// Comparison and membership: >, >=, <, <=, in
    pub const COMPARISON: u8 = 8;

    /// Additive: +, -
    pub const ADDITIVE: u8 = 10;

    /// Multiplicative: *, /
    pub const MULTIPLICATIVE: u8 = 12;
}

impl Parser {
    /// Main expression entry point.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.parse_expr_bp(bp::MIN)
    }

    /// Pratt parser core: parses an expression consuming only operators
    /// whose left binding power is at least `min_bp`.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;

        while let Some((left_bp, right_bp, op)) = self.infix_binding_power() {
            if left_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(right_bp)?;
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Binding powers for the current token, if it is an infix operator.
    /// All binary operators are left-associative.
    fn infix_binding_power(&self) -> Option<(u8, u8, BinOp)> {
        let (level, op) = match self.current().kind {
            TokenKind::OrOr => (bp::LOGICAL_OR, BinOp::Or),
            TokenKind::AndAnd => (bp::LOGICAL_AND, BinOp::And),
            TokenKind::EqEq => (bp::EQUALITY, BinOp::Eq),
            TokenKind::NotEq => (bp::EQUALITY, BinOp::Ne),
            TokenKind::Gt => (bp::COMPARISON, BinOp::Gt),
            TokenKind::GtEq => (bp::COMPARISON, BinOp::Ge),
            TokenKind::Lt => (bp::COMPARISON, BinOp::Lt),
            TokenKind::LtEq => (bp::COMPARISON, BinOp::Le),
            TokenKind::In => (bp::COMPARISON, BinOp::In),
            TokenKind::Plus => (bp::ADDITIVE, BinOp::Add),
            TokenKind::Minus => (bp::ADDITIVE, BinOp::Sub),
            TokenKind::Star => (bp::MULTIPLICATIVE, BinOp::Mul),
            TokenKind::Slash => (bp::MULTIPLICATIVE, BinOp::Div),
            _ => return None,
        };
        Some((level, level + 1, op))
    }

    /// unary := ('!' | '-') unary | postfix
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current().kind {
            TokenKind::Bang => UnOp::Not,
            TokenKind::Minus => UnOp::Neg,
            _ => return self.parse_postfix(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
        }))
    }

    /// postfix := primary ( '(' args? ')' | '.' IDENT macroArgs? )*
    ///
    /// A member access immediately followed by `(` is the macro form
    /// `expr.name(param, body)`, which parses to a call whose callee is
    /// the member access and whose single argument is a lambda. The
    /// checker decides whether `name` is a macro it knows.
    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(TokenKind::LParen) {
                let args = self.parse_call_args()?;
                expr = Expr::Call(CallExpr {
                    callee: Box::new(expr),
                    args,
                });
            } else if self.match_token(TokenKind::Dot) {
                let property = self.expect(TokenKind::Ident, "after '.'")?.lexeme;
                let member = Expr::Member(MemberExpr {
                    object: Box::new(expr),
                    property,
                });
                if self.match_token(TokenKind::LParen) {
                    let lambda = self.parse_macro_lambda()?;
                    expr = Expr::Call(CallExpr {
                        callee: Box::new(member),
                        args: vec![lambda],
                    });
                } else {
                    expr = member;
                }
            } else {
                return Ok(expr);
            }
        }
    }

    /// args := expression (',' expression)*
    fn parse_call_args(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "to close argument list")?;
        Ok(args)
    }

    /// macroArgs := IDENT ',' expression ')'  (the '(' is consumed)
    fn parse_macro_lambda(&mut self) -> Result<Expr> {
        let param = self
            .expect(TokenKind::Ident, "as macro parameter name")?
            .lexeme;
        self.expect(TokenKind::Comma, "after macro parameter")?;
        let body = self.parse_expression()?;
        self.expect(TokenKind::RParen, "to close macro call")?;
        Ok(Expr::Lambda(LambdaExpr {
            param,
            body: Box::new(body),
        }))
    }

    /// primary := NUMBER | STRING | 'true' | 'false' | IDENT
    ///          | '(' expression ')' | list literal | object literal
    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current().kind {
            TokenKind::Number => {
                let token = self.advance();
                let value: i64 = token.lexeme.parse().map_err(|_| {
                    axiomc_util::Error::syntax(
                        token.line,
                        format!("integer literal '{}' is out of range", token.lexeme),
                    )
                })?;
                Ok(Expr::Literal(Literal::Int(value)))
            }
            TokenKind::Str => {
                let token = self.advance();
                Ok(Expr::Literal(Literal::Str(token.lexeme)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::Ident => {
                let token = self.advance();
                Ok(Expr::Variable(token.lexeme))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "to close grouping")?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            other => Err(self.error_at_current(format!("expected expression, found {other}"))),
        }
    }

    /// '[' (expression (',' expression)*)? ']'
    fn parse_list_literal(&mut self) -> Result<Expr> {
        self.advance(); // '['
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "to close list literal")?;
        Ok(Expr::List(elements))
    }

    /// '{' (IDENT ':' expression (',' IDENT ':' expression)*)? '}'
    fn parse_object_literal(&mut self) -> Result<Expr> {
        self.advance(); // '{'
        let mut fields = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                let key = self.expect(TokenKind::Ident, "as object key")?.lexeme;
                self.expect(TokenKind::Colon, "after object key")?;
                let value = self.parse_expression()?;
                fields.push((key, value));
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "to close object literal")?;
        Ok(Expr::Object(fields))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_source;

    /// Parses a source consisting of a single expression statement.
    fn parse_expr(source: &str) -> Expr {
        match parse_source(source).unwrap().remove(0) {
            Stmt::Expr(expr) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expr("1 + 2 * 3");
        match expr {
            Expr::Binary(add) => {
                assert_eq!(add.op, BinOp::Add);
                assert!(matches!(*add.right, Expr::Binary(ref m) if m.op == BinOp::Mul));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_left_associativity() {
        // 10 - 4 - 3 parses as (10 - 4) - 3
        let expr = parse_expr("10 - 4 - 3");
        match expr {
            Expr::Binary(outer) => {
                assert_eq!(outer.op, BinOp::Sub);
                assert!(matches!(*outer.left, Expr::Binary(ref i) if i.op == BinOp::Sub));
                assert_eq!(*outer.right, Expr::Literal(Literal::Int(3)));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_comparison_binds_tighter_than_logic() {
        // a > 1 && b < 2 parses as (a > 1) && (b < 2)
        let expr = parse_expr("a > 1 && b < 2");
        match expr {
            Expr::Binary(and) => {
                assert_eq!(and.op, BinOp::And);
                assert!(matches!(*and.left, Expr::Binary(ref c) if c.op == BinOp::Gt));
                assert!(matches!(*and.right, Expr::Binary(ref c) if c.op == BinOp::Lt));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse_expr("a || b && c");
        match expr {
            Expr::Binary(or) => {
                assert_eq!(or.op, BinOp::Or);
                assert!(matches!(*or.right, Expr::Binary(ref a) if a.op == BinOp::And));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        let expr = parse_expr("(1 + 2) * 3");
        match expr {
            Expr::Binary(mul) => {
                assert_eq!(mul.op, BinOp::Mul);
                assert!(matches!(*mul.left, Expr::Binary(ref a) if a.op == BinOp::Add));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_in_operator_at_comparison_level() {
        let expr = parse_expr(r#""admin" in roles && active"#);
        match expr {
            Expr::Binary(and) => {
                assert_eq!(and.op, BinOp::And);
                assert!(matches!(*and.left, Expr::Binary(ref i) if i.op == BinOp::In));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_operators() {
        let expr = parse_expr("!a");
        assert!(matches!(expr, Expr::Unary(ref u) if u.op == UnOp::Not));

        let expr = parse_expr("-1 + 2");
        match expr {
            Expr::Binary(add) => {
                assert!(matches!(*add.left, Expr::Unary(ref u) if u.op == UnOp::Neg));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_double_negation() {
        let expr = parse_expr("!!a");
        match expr {
            Expr::Unary(outer) => {
                assert!(matches!(*outer.operand, Expr::Unary(_)));
            }
            other => panic!("expected Unary, got {other:?}"),
        }
    }

    #[test]
    fn test_member_chain() {
        let expr = parse_expr("user.company.address");
        match expr {
            Expr::Member(outer) => {
                assert_eq!(outer.property, "address");
                assert!(matches!(*outer.object, Expr::Member(ref m) if m.property == "company"));
            }
            other => panic!("expected Member, got {other:?}"),
        }
    }

    #[test]
    fn test_function_call() {
        let expr = parse_expr(r#"startsWith(name, "A")"#);
        match expr {
            Expr::Call(call) => {
                assert_eq!(*call.callee, Expr::Variable("startsWith".into()));
                assert_eq!(call.args.len(), 2);
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn test_macro_parses_to_call_with_lambda() {
        let expr = parse_expr("items.exists(n, n > 2)");
        match expr {
            Expr::Call(call) => {
                match *call.callee {
                    Expr::Member(ref m) => {
                        assert_eq!(m.property, "exists");
                        assert_eq!(*m.object, Expr::Variable("items".into()));
                    }
                    ref other => panic!("expected Member callee, got {other:?}"),
                }
                assert_eq!(call.args.len(), 1);
                match &call.args[0] {
                    Expr::Lambda(lambda) => {
                        assert_eq!(lambda.param, "n");
                        assert!(matches!(*lambda.body, Expr::Binary(_)));
                    }
                    other => panic!("expected Lambda argument, got {other:?}"),
                }
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn test_macro_on_list_literal() {
        let expr = parse_expr("[1, 2, 3].all(n, n > 0)");
        match expr {
            Expr::Call(call) => match *call.callee {
                Expr::Member(ref m) => {
                    assert_eq!(m.property, "all");
                    assert!(matches!(*m.object, Expr::List(_)));
                }
                ref other => panic!("expected Member callee, got {other:?}"),
            },
            other => panic!("expected Call, got {other:?}"),
        }
    }

    #[test]
    fn test_macro_requires_parameter_name() {
        let err = parse_source("items.exists(1 + 1, n > 2)").unwrap_err();
        assert!(err.to_string().contains("macro parameter"));
    }

    #[test]
    fn test_list_literal() {
        let expr = parse_expr(r#"["user", "admin"]"#);
        assert_eq!(
            expr,
            Expr::List(vec![
                Expr::Literal(Literal::Str("user".into())),
                Expr::Literal(Literal::Str("admin".into())),
            ])
        );
    }

    #[test]
    fn test_empty_list_literal() {
        assert_eq!(parse_expr("[]"), Expr::List(vec![]));
    }

    #[test]
    fn test_object_literal_preserves_field_order() {
        let expr = parse_expr("({b: 2, a: 1})");
        match expr {
            Expr::Object(fields) => {
                let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["b", "a"]);
            }
            other => panic!("expected object literal, got {other:?}"),
        }
    }

    #[test]
    fn test_object_literal_inside_expression_position() {
        // At statement level `{` starts a block; object literals appear in
        // expression positions (here, a declaration initializer).
        let ast = parse_source(r#"let u: int = 0; [{tag: "a"}]"#).unwrap();
        match &ast[1] {
            Stmt::Expr(Expr::List(elements)) => {
                assert!(matches!(&elements[0], Expr::Object(_)));
            }
            other => panic!("expected list of objects, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_object_literal() {
        assert_eq!(parse_expr("({})"), Expr::Object(vec![]));
    }

    #[test]
    fn test_string_and_bool_literals() {
        assert_eq!(
            parse_expr(r#""hello""#),
            Expr::Literal(Literal::Str("hello".into()))
        );
        assert_eq!(parse_expr("true"), Expr::Literal(Literal::Bool(true)));
        assert_eq!(parse_expr("false"), Expr::Literal(Literal::Bool(false)));
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = parse_source("99999999999999999999").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_call_on_call_result_parses() {
        // Grammatically fine; the checker rejects it.
        let expr = parse_expr("f(1)(2)");
        assert!(matches!(expr, Expr::Call(_)));
    }
}

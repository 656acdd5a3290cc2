//! Statement parsing.

use axiomc_lex::TokenKind;
use axiomc_util::Result;

use crate::ast::{AssignStmt, IfStmt, Stmt, VarDeclStmt};
use crate::Parser;

impl Parser {
    /// Parses one statement.
    ///
    /// Dispatch is predictive: `let` starts a declaration, `if` a
    /// conditional, `{` a block. An identifier followed by `=` (the one
    /// place two-token lookahead is needed) is an assignment; anything
    /// else is an expression statement.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        match self.current().kind {
            TokenKind::Let => self.parse_var_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Ident if self.peek_kind(1) == TokenKind::Eq => self.parse_assignment(),
            _ => self.parse_expr_stmt(),
        }
    }

    /// varDecl := 'let' IDENT ':' typeAnno '=' expression ';'
    fn parse_var_decl(&mut self) -> Result<Stmt> {
        self.advance(); // 'let'
        let name = self.expect(TokenKind::Ident, "after 'let'")?.lexeme;
        self.expect(TokenKind::Colon, "after variable name")?;
        let annotation = self.parse_type_anno()?;
        self.expect(TokenKind::Eq, "after type annotation")?;
        let init = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "after declaration")?;
        Ok(Stmt::VarDecl(VarDeclStmt {
            name,
            annotation,
            init,
        }))
    }

    /// ifStmt := 'if' '(' expression ')' statement ('else' statement)?
    fn parse_if(&mut self) -> Result<Stmt> {
        self.advance(); // 'if'
        self.expect(TokenKind::LParen, "after 'if'")?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen, "after condition")?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            cond,
            then_branch,
            else_branch,
        }))
    }

    /// block := '{' statement* '}'
    fn parse_block(&mut self) -> Result<Stmt> {
        self.advance(); // '{'
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace, "to close block")?;
        Ok(Stmt::Block(stmts))
    }

    /// assignment := IDENT '=' expression ';'
    fn parse_assignment(&mut self) -> Result<Stmt> {
        let name = self.advance().lexeme;
        self.advance(); // '='
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "after assignment")?;
        Ok(Stmt::Assign(AssignStmt { name, value }))
    }

    /// exprStmt := expression (';' | ε before '}' or EOF)
    ///
    /// The semicolon may only be omitted where the statement is the last
    /// of a block or of the program (the implicit-return position).
    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let expr = self.parse_expression()?;
        if self.match_token(TokenKind::Semicolon)
            || self.check(TokenKind::RBrace)
            || self.check(TokenKind::Eof)
        {
            Ok(Stmt::Expr(expr))
        } else {
            Err(self.error_at_current(format!(
                "expected ';' after expression, found {}",
                self.current().kind
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse_source;

    #[test]
    fn test_var_decl() {
        let ast = parse_source("let x: int = 42;").unwrap();
        assert_eq!(
            ast,
            vec![Stmt::VarDecl(VarDeclStmt {
                name: "x".into(),
                annotation: TypeAnno {
                    prim: PrimType::Int,
                    is_list: false
                },
                init: Expr::Literal(Literal::Int(42)),
            })]
        );
    }

    #[test]
    fn test_var_decl_list_annotation() {
        let ast = parse_source("let xs: string[] = [];").unwrap();
        match &ast[0] {
            Stmt::VarDecl(decl) => {
                assert_eq!(
                    decl.annotation,
                    TypeAnno {
                        prim: PrimType::String,
                        is_list: true
                    }
                );
                assert_eq!(decl.init, Expr::List(vec![]));
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn test_var_decl_requires_semicolon() {
        let err = parse_source("let x: int = 42").unwrap_err();
        assert!(err.to_string().contains("';'"));
    }

    #[test]
    fn test_assignment_vs_equality() {
        // `d = 50;` is an assignment; `d == 50` is an expression statement.
        let ast = parse_source("d = 50;").unwrap();
        assert!(matches!(&ast[0], Stmt::Assign(a) if a.name == "d"));

        let ast = parse_source("d == 50").unwrap();
        assert!(matches!(&ast[0], Stmt::Expr(Expr::Binary(b)) if b.op == BinOp::Eq));
    }

    #[test]
    fn test_if_with_block() {
        let ast = parse_source("if (is_vip) { d = 50; }").unwrap();
        match &ast[0] {
            Stmt::If(stmt) => {
                assert_eq!(stmt.cond, Expr::Variable("is_vip".into()));
                assert!(matches!(*stmt.then_branch, Stmt::Block(_)));
                assert!(stmt.else_branch.is_none());
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn test_if_else_chain() {
        let ast = parse_source("if (a) { 1; } else if (b) { 2; } else { 3; }").unwrap();
        match &ast[0] {
            Stmt::If(stmt) => match stmt.else_branch.as_deref() {
                Some(Stmt::If(inner)) => assert!(inner.else_branch.is_some()),
                other => panic!("expected nested If, got {other:?}"),
            },
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn test_if_branch_may_be_bare_statement() {
        let ast = parse_source("if (is_vip) d = 50;").unwrap();
        match &ast[0] {
            Stmt::If(stmt) => assert!(matches!(*stmt.then_branch, Stmt::Assign(_))),
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn test_implicit_return_at_eof() {
        let ast = parse_source("base_price - d").unwrap();
        assert!(matches!(&ast[0], Stmt::Expr(Expr::Binary(_))));
    }

    #[test]
    fn test_implicit_return_at_block_end() {
        let ast = parse_source("{ 1 + 2 }").unwrap();
        match &ast[0] {
            Stmt::Block(stmts) => assert!(matches!(&stmts[0], Stmt::Expr(_))),
            other => panic!("expected Block, got {other:?}"),
        }
    }

    #[test]
    fn test_semicolon_required_between_statements() {
        let err = parse_source("1 + 2 let x: int = 1;").unwrap_err();
        assert!(err.to_string().contains("expected ';'"));
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_source("{ 1;").unwrap_err();
        assert!(err.to_string().contains("'}'"));
    }
}

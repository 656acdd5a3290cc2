//! axiomc-par - Parser for the Axiom rule language
//!
//! Recursive-descent parser over the token stream from `axiomc-lex`.
//! Statements are predictive with single-token lookahead, plus one
//! two-token peek to tell an assignment (`x = ...;`) from an expression
//! statement. Expressions use Pratt parsing (top-down operator
//! precedence) with explicit binding powers.
//!
//! # Grammar
//!
//! ```ebnf
//! program    = { statement } ;
//! statement  = varDecl | ifStmt | block | assignment | exprStmt ;
//! varDecl    = "let" IDENT ":" typeAnno "=" expression ";" ;
//! typeAnno   = ( "int" | "string" | "bool" | "date" ) [ "[" "]" ] ;
//! ifStmt     = "if" "(" expression ")" statement [ "else" statement ] ;
//! block      = "{" { statement } "}" ;
//! assignment = IDENT "=" expression ";" ;
//! exprStmt   = expression ( ";" | (* omitted before "}" or EOF *) ) ;
//! ```
//!
//! The value of the final expression statement is the rule's implicit
//! return; only there may the trailing semicolon be omitted.
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `\|\|` | Left |
//! | 2 | `&&` | Left |
//! | 3 | `==`, `!=` | Left |
//! | 4 | `>`, `>=`, `<`, `<=`, `in` | Left |
//! | 5 | `+`, `-` | Left |
//! | 6 | `*`, `/` | Left |
//! | 7 | `!`, `-` (unary) | Prefix |
//! | 8 | `.`, `(...)` | Postfix |

pub mod ast;
mod expr;
mod stmt;
mod types;

pub use ast::*;

use axiomc_lex::{Token, TokenKind};
use axiomc_util::{Error, Result};

/// Parses a token stream into a program (list of statements).
pub fn parse(tokens: Vec<Token>) -> Result<Ast> {
    Parser::new(tokens).parse_program()
}

/// Parser state over a token stream.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Creates a parser over the given tokens. The lexer always ends the
    /// stream with `Eof`; one is appended if missing so lookahead can
    /// never run off the end.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(TokenKind::Eof, "", line));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the whole program.
    pub fn parse_program(&mut self) -> Result<Ast> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::Eof) {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    /// The current token.
    pub(crate) fn current(&self) -> &Token {
        // Position never passes the trailing Eof.
        &self.tokens[self.position]
    }

    /// The kind of the token at the given offset from the current one.
    pub(crate) fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.position + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// True if the current token is of the given kind.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Advances past the current token and returns it.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    /// Consumes the current token if it is of the given kind.
    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or fails, naming what was
    /// being parsed.
    pub(crate) fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(format!(
                "expected {} {}, found {}",
                kind,
                context,
                self.current().kind
            )))
        }
    }

    /// Builds a syntax error citing the current token's line.
    pub(crate) fn error_at_current(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.current().line, message)
    }
}

#[cfg(test)]
pub(crate) fn parse_source(source: &str) -> Result<Ast> {
    parse(axiomc_lex::tokenize(source)?)
}

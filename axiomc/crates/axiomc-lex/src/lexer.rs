//! Core lexer implementation.
//!
//! Dispatches on the current character: punctuation and operators are
//! handled inline (maximal munch via [`Cursor::match_char`]), and the
//! multi-character classes (numbers, strings, identifiers) each have their
//! own lexing method.

use axiomc_util::{Error, Result};

use crate::cursor::Cursor;
use crate::token::{keyword_from_str, Token, TokenKind};

/// Lexer for the Axiom rule language.
///
/// Produces tokens one at a time via [`Lexer::next_token`], or the whole
/// stream via [`Lexer::tokenize`]. The first lexical error aborts with
/// `Error::Syntax` citing the line.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Starting byte position of the token being lexed.
    token_start: usize,

    /// Line on which the token being lexed starts (1-based).
    token_line: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given rule source.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_line: 1,
        }
    }

    /// Tokenizes the entire source, including the terminating `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token from the source.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character. Returns `Token` with kind `Eof` at end of input.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_line = self.cursor.line();

        if self.cursor.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, "", self.token_line));
        }

        let c = self.cursor.current_char();
        match c {
            '(' => Ok(self.single_char(TokenKind::LParen)),
            ')' => Ok(self.single_char(TokenKind::RParen)),
            '{' => Ok(self.single_char(TokenKind::LBrace)),
            '}' => Ok(self.single_char(TokenKind::RBrace)),
            '[' => Ok(self.single_char(TokenKind::LBracket)),
            ']' => Ok(self.single_char(TokenKind::RBracket)),
            ';' => Ok(self.single_char(TokenKind::Semicolon)),
            ':' => Ok(self.single_char(TokenKind::Colon)),
            ',' => Ok(self.single_char(TokenKind::Comma)),
            '.' => Ok(self.single_char(TokenKind::Dot)),
            '+' => Ok(self.single_char(TokenKind::Plus)),
            '-' => Ok(self.single_char(TokenKind::Minus)),
            '*' => Ok(self.single_char(TokenKind::Star)),
            // Comments were skipped above, so a slash here is division.
            '/' => Ok(self.single_char(TokenKind::Slash)),
            '=' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.emit(TokenKind::EqEq))
                } else {
                    Ok(self.emit(TokenKind::Eq))
                }
            }
            '!' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.emit(TokenKind::NotEq))
                } else {
                    Ok(self.emit(TokenKind::Bang))
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.emit(TokenKind::GtEq))
                } else {
                    Ok(self.emit(TokenKind::Gt))
                }
            }
            '<' => {
                self.cursor.advance();
                if self.cursor.match_char('=') {
                    Ok(self.emit(TokenKind::LtEq))
                } else {
                    Ok(self.emit(TokenKind::Lt))
                }
            }
            '&' => {
                self.cursor.advance();
                if self.cursor.match_char('&') {
                    Ok(self.emit(TokenKind::AndAnd))
                } else {
                    Err(self.error("stray '&' (expected '&&')"))
                }
            }
            '|' => {
                self.cursor.advance();
                if self.cursor.match_char('|') {
                    Ok(self.emit(TokenKind::OrOr))
                } else {
                    Err(self.error("stray '|' (expected '||')"))
                }
            }
            '"' => self.lex_string(),
            c if c.is_ascii_digit() => Ok(self.lex_number()),
            c if is_ident_start(c) => Ok(self.lex_identifier()),
            c => {
                self.cursor.advance();
                Err(self.error(format!("unexpected character '{c}'")))
            }
        }
    }

    /// Lexes a string literal.
    ///
    /// The token's lexeme is the content between the quotes, verbatim; no
    /// escape sequences are processed. A newline or end of input before the
    /// closing quote is a syntax error.
    fn lex_string(&mut self) -> Result<Token> {
        self.cursor.advance();
        let content_start = self.cursor.position();

        loop {
            if self.cursor.is_at_end() {
                return Err(self.error("unterminated string literal"));
            }
            match self.cursor.current_char() {
                '"' => {
                    let content = self.cursor.slice_from(content_start).to_string();
                    self.cursor.advance();
                    return Ok(Token::new(TokenKind::Str, content, self.token_line));
                }
                '\n' => return Err(self.error("unterminated string literal")),
                _ => self.cursor.advance(),
            }
        }
    }

    /// Lexes a number literal: a greedy digit run. The numeric value is
    /// parsed later, by the parser.
    fn lex_number(&mut self) -> Token {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        self.emit(TokenKind::Number)
    }

    /// Lexes an identifier or keyword.
    fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, text, self.token_line)
    }

    /// Skips whitespace and `//` line comments. Called before each token.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' if self.cursor.char_at(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Emits a one-character token.
    fn single_char(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.emit(kind)
    }

    /// Builds a token spanning from the token start to the cursor.
    fn emit(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.cursor.slice_from(self.token_start), self.token_line)
    }

    /// Builds a syntax error at the current token's line.
    fn error(&self, message: impl Into<String>) -> Error {
        Error::syntax(self.token_line, message)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

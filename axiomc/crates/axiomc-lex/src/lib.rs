//! axiomc-lex - Lexer for the Axiom rule language
//!
//! The lexer transforms rule source text into a stream of tokens. It is a
//! single pass over the source with one-character lookahead:
//!
//! - whitespace and `//`-to-end-of-line comments are skipped,
//! - `[0-9]+` runs become number tokens,
//! - `"`-delimited strings carry their content verbatim (no escape
//!   processing; backslashes are literal),
//! - identifiers are `[A-Za-z_][A-Za-z0-9_]*`, with reserved words
//!   (`let if else true false int string bool date in`) mapped to their
//!   keyword tokens,
//! - multi-character operators (`==` `!=` `>=` `<=` `&&` `||`) win by
//!   maximal munch over their one-character prefixes.
//!
//! Lexing is fail-fast: the first invalid character, stray `&`/`|`, or
//! unterminated string aborts with a syntax error citing the line. The
//! token stream returned on success always ends with an `Eof` token.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use axiomc_util::Result;

/// Convenience: tokenize an entire rule into a `Vec<Token>`.
///
/// The returned vector includes the final `Eof` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

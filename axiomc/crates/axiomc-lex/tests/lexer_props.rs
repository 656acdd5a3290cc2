//! Property tests: the lexer is total.
//!
//! For any input, tokenization either yields an `Eof`-terminated stream or
//! a syntax error citing a line. It must never panic.

use axiomc_lex::{tokenize, TokenKind};
use proptest::prelude::*;

proptest! {
    #[test]
    fn lexing_never_panics(source in "\\PC*") {
        match tokenize(&source) {
            Ok(tokens) => {
                prop_assert!(!tokens.is_empty());
                prop_assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
            }
            Err(err) => {
                prop_assert!(err.line().is_some());
            }
        }
    }

    #[test]
    fn lexing_handles_newlines_and_comments(
        lines in prop::collection::vec("[ -~]{0,40}", 0..8)
    ) {
        let source = lines.join("\n");
        let _ = tokenize(&source);
    }

    #[test]
    fn well_formed_declarations_lex(n in 0i64..1_000_000, name in "[a-z_][a-z0-9_]{0,8}") {
        let source = format!("let {name}: int = {n}; {name} + 1");
        let tokens = tokenize(&source).unwrap();
        prop_assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }
}

//! Type annotation parsing.

use axiomc_lex::TokenKind;
use axiomc_util::Result;

use crate::ast::{PrimType, TypeAnno};
use crate::Parser;

impl Parser {
    /// typeAnno := ('int'|'string'|'bool'|'date') ('[' ']')?
    pub(crate) fn parse_type_anno(&mut self) -> Result<TypeAnno> {
        let prim = match self.current().kind {
            TokenKind::TyInt => PrimType::Int,
            TokenKind::TyString => PrimType::String,
            TokenKind::TyBool => PrimType::Bool,
            TokenKind::TyDate => PrimType::Date,
            other => {
                return Err(self.error_at_current(format!(
                    "expected type annotation ('int', 'string', 'bool' or 'date'), found {other}"
                )))
            }
        };
        self.advance();

        let is_list = if self.match_token(TokenKind::LBracket) {
            self.expect(TokenKind::RBracket, "in list type annotation")?;
            true
        } else {
            false
        };

        Ok(TypeAnno { prim, is_list })
    }
}

//! Symbol token lexing (spec §4.4).
//!
//! A symbol starts with an alphabetic character or one of the punctuation
//! characters `~!@#$%^&*-_=+:/?<>`, and continues with alphanumeric or the
//! same punctuation set, up to [`crate::SYMBOL_MAX_LEN`] bytes.

use mlisp_util::SourceError;

use crate::lexer::core::is_symbol_continue;
use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_symbol(&mut self, start: usize) -> Result<TokenKind, SourceError> {
        while is_symbol_continue(self.cursor.current_char()) {
            self.cursor.advance();
            if self.cursor.position() - start > crate::SYMBOL_MAX_LEN {
                return Err(SourceError::new(start, "Symbol name too long"));
            }
        }
        Ok(TokenKind::Symbol(self.cursor.slice_from(start).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn lex(source: &str) -> Result<TokenKind, SourceError> {
        Lexer::new(source).next_token().map(|t| t.kind)
    }

    #[test]
    fn alphabetic_symbol() {
        assert_eq!(
            lex("define").unwrap(),
            TokenKind::Symbol("define".to_string())
        );
    }

    #[test]
    fn punctuation_only_symbol() {
        assert_eq!(lex("+").unwrap(), TokenKind::Symbol("+".to_string()));
        assert_eq!(lex("<=").unwrap(), TokenKind::Symbol("<=".to_string()));
    }

    #[test]
    fn mixed_alphanumeric_and_punctuation() {
        assert_eq!(
            lex("set-q!").unwrap(),
            TokenKind::Symbol("set-q!".to_string())
        );
    }

    #[test]
    fn overlong_symbol_is_an_error() {
        let long = "a".repeat(crate::SYMBOL_MAX_LEN + 1);
        let err = lex(&long).unwrap_err();
        assert_eq!(err.message, "Symbol name too long");
    }
}

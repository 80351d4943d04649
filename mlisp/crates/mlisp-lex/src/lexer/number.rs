//! Integer literal lexing (spec §4.4: "one or more decimal digits; a
//! leading `-` is part of the integer only if immediately followed by a
//! digit").

use mlisp_util::SourceError;

use crate::token::TokenKind;
use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_int(&mut self) -> Result<TokenKind, SourceError> {
        let start = self.cursor.position();
        if self.cursor.current_char() == '-' {
            self.cursor.advance();
        }
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        // spec.md's grammar places no digit-count bound on an integer
        // literal (unlike the explicit 200-char symbol cap), so a digit
        // run that overflows `i64` is syntactically valid input and must
        // be reported as an ordinary source error, not a panic.
        text.parse()
            .map(TokenKind::Int)
            .map_err(|_| SourceError::new(start, format!("Integer literal out of range: {text}")))
    }
}

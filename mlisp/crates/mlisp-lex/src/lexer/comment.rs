//! Whitespace and comment skipping (spec §4.4).
//!
//! Whitespace is space, tab, CR, or LF. Comments run from `;` to end of
//! line (`\n`, `\r`, or `\r\n`). There are no block comments in this
//! grammar.

use crate::Lexer;

impl<'a> Lexer<'a> {
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                ';' => {
                    while !self.cursor.is_at_end()
                        && self.cursor.current_char() != '\n'
                        && self.cursor.current_char() != '\r'
                    {
                        self.cursor.advance();
                    }
                }
                _ => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::token::TokenKind;
    use crate::Lexer;

    #[test]
    fn skips_leading_whitespace() {
        let mut lexer = Lexer::new("  \t\n(foo)");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LParen);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let mut lexer = Lexer::new("; a comment\n(foo)");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LParen);
    }

    #[test]
    fn comment_at_end_of_input_with_no_trailing_newline() {
        let mut lexer = Lexer::new("(foo) ; trailing");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::LParen);
        lexer.next_token().unwrap();
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Cparen);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}

//! Recursive-descent S-expression reader (spec §4.4).
//!
//! ```text
//! expr   ::= INT | SYMBOL | '(' list | "'" expr
//! list   ::= ')'                        ; empty list -> Nil
//!          | expr ')'                   ; proper tail
//!          | expr '.' expr ')'          ; dotted pair
//!          | expr list                  ; cons and recurse
//! ```
//!
//! One recursive function per production, the way the teacher's own
//! `expr.rs` is the single entry point its Pratt parser recurses through.
//! There is no operator precedence here — every form is fully
//! parenthesized — so there is no precedence-climbing loop to write, just
//! the four productions above.

use mlisp_heap::{Heap, RootStack, Value};
use mlisp_lex::{Lexer, Token, TokenKind};
use mlisp_util::SourceError;

use crate::error::{ReaderError, ReaderResult};
use crate::interner::Interner;

/// Reads one top-level form at a time from a single source buffer.
pub struct Reader<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a str) -> Self {
        Reader {
            lexer: Lexer::new(source),
            peeked: None,
        }
    }

    fn peek(&mut self) -> ReaderResult<Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(self.peeked.clone().unwrap())
    }

    fn bump(&mut self) -> ReaderResult<Token> {
        match self.peeked.take() {
            Some(t) => Ok(t),
            None => Ok(self.lexer.next_token()?),
        }
    }

    /// Reads the next top-level expression, or `None` at end of input
    /// (spec §4.4: "on each call it returns the next complete expression,
    /// or a sentinel meaning end-of-input").
    pub fn read(
        &mut self,
        heap: &mut Heap,
        roots: &RootStack,
        interner: &mut impl Interner,
    ) -> ReaderResult<Option<Value>> {
        let tok = self.peek()?;
        if tok.kind == TokenKind::Eof {
            return Ok(None);
        }
        Ok(Some(self.read_expr(heap, roots, interner)?))
    }

    /// Byte offset the next token starts at, for the host's error index
    /// (spec §6: `error_index()`).
    pub fn position(&mut self) -> usize {
        match self.peek() {
            Ok(tok) => tok.start,
            Err(_) => 0,
        }
    }

    fn read_expr(
        &mut self,
        heap: &mut Heap,
        roots: &RootStack,
        interner: &mut impl Interner,
    ) -> ReaderResult<Value> {
        let tok = self.bump()?;
        match tok.kind {
            TokenKind::Int(n) => Ok(heap.make_int(roots, n)?),
            TokenKind::Symbol(name) => Ok(interner.intern(heap, roots, &name)?),
            TokenKind::LParen => self.read_list(heap, roots, interner),
            TokenKind::Quote => self.read_quoted(heap, roots, interner),
            TokenKind::Dot => Err(SourceError::new(tok.start, "Stray dot").into()),
            TokenKind::Cparen => {
                Err(SourceError::new(tok.start, "Stray close parenthesis").into())
            }
            TokenKind::Eof => Err(SourceError::new(tok.start, "Unclosed parenthesis").into()),
        }
    }

    /// `"'" expr` rewrites to `(quote expr)`.
    fn read_quoted(
        &mut self,
        heap: &mut Heap,
        roots: &RootStack,
        interner: &mut impl Interner,
    ) -> ReaderResult<Value> {
        let scope = roots.push_frame(3);
        let quoted = scope.slot(0);
        let quote_sym = scope.slot(1);
        let tail = scope.slot(2);

        quoted.set(self.read_expr(heap, roots, interner)?);
        quote_sym.set(interner.intern(heap, roots, "quote")?);
        tail.set(Value::nil());

        let inner = heap.cons(roots, &quoted, &tail)?;
        tail.set(inner);
        Ok(heap.cons(roots, &quote_sym, &tail)?)
    }

    /// `list ::= ')' | expr ')' | expr '.' expr ')' | expr list`
    fn read_list(
        &mut self,
        heap: &mut Heap,
        roots: &RootStack,
        interner: &mut impl Interner,
    ) -> ReaderResult<Value> {
        let tok = self.peek()?;
        if tok.kind == TokenKind::Cparen {
            self.bump()?;
            return Ok(Value::nil());
        }
        if tok.kind == TokenKind::Eof {
            return Err(SourceError::new(tok.start, "Unclosed parenthesis").into());
        }

        let scope = roots.push_frame(2);
        let head = scope.slot(0);
        let rest = scope.slot(1);

        head.set(self.read_expr(heap, roots, interner)?);

        let tok2 = self.peek()?;
        match tok2.kind {
            TokenKind::Cparen => {
                self.bump()?;
                rest.set(Value::nil());
            }
            TokenKind::Dot => {
                self.bump()?;
                rest.set(self.read_expr(heap, roots, interner)?);
                let close = self.bump()?;
                if close.kind != TokenKind::Cparen {
                    return Err(SourceError::new(
                        close.start,
                        "Closed parenthesis expected after dot",
                    )
                    .into());
                }
            }
            TokenKind::Eof => {
                return Err(SourceError::new(tok2.start, "Unclosed parenthesis").into());
            }
            _ => {
                rest.set(self.read_list(heap, roots, interner)?);
            }
        }

        Ok(heap.cons(roots, &head, &rest)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interner::testing::TestInterner;
    use mlisp_heap::{HeapConfig, Tag};

    fn read_one(source: &str) -> ReaderResult<Option<Value>> {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let roots = RootStack::new();
        let mut interner = TestInterner::default();
        let mut reader = Reader::new(source);
        let scope = roots.push_frame(1);
        let slot = scope.slot(0);
        match reader.read(&mut heap, &roots, &mut interner)? {
            Some(v) => {
                slot.set(v);
                Ok(Some(slot.get()))
            }
            None => Ok(None),
        }
    }

    #[test]
    fn reads_an_integer() {
        assert_eq!(read_one("42").unwrap().unwrap().as_int(), Some(42));
    }

    #[test]
    fn reads_a_symbol() {
        let v = read_one("foo").unwrap().unwrap();
        assert_eq!(v.tag(), Tag::Symbol);
        assert_eq!(v.symbol_name(), "foo");
    }

    #[test]
    fn reads_empty_list_as_nil() {
        assert!(read_one("()").unwrap().unwrap().is_nil());
    }

    #[test]
    fn reads_a_proper_list() {
        let v = read_one("(1 2 3)").unwrap().unwrap();
        assert_eq!(v.car().as_int(), Some(1));
        assert_eq!(v.cdr().car().as_int(), Some(2));
        assert_eq!(v.cdr().cdr().car().as_int(), Some(3));
        assert!(v.cdr().cdr().cdr().is_nil());
    }

    #[test]
    fn reads_a_dotted_pair() {
        let v = read_one("(1 . 2)").unwrap().unwrap();
        assert_eq!(v.car().as_int(), Some(1));
        assert_eq!(v.cdr().as_int(), Some(2));
    }

    #[test]
    fn reads_a_nested_list() {
        let v = read_one("((1 2) 3)").unwrap().unwrap();
        assert_eq!(v.car().car().as_int(), Some(1));
        assert_eq!(v.car().cdr().car().as_int(), Some(2));
        assert_eq!(v.cdr().car().as_int(), Some(3));
    }

    #[test]
    fn quote_rewrites_to_quote_form() {
        let v = read_one("'x").unwrap().unwrap();
        assert_eq!(v.car().symbol_name(), "quote");
        assert_eq!(v.cdr().car().symbol_name(), "x");
        assert!(v.cdr().cdr().is_nil());
    }

    #[test]
    fn empty_input_reads_as_none() {
        assert!(read_one("").unwrap().is_none());
    }

    #[test]
    fn unclosed_paren_is_an_error() {
        let err = read_one("(1 2").unwrap_err();
        assert!(matches!(err, ReaderError::Source(_)));
    }

    #[test]
    fn stray_close_paren_is_an_error() {
        let err = read_one(")").unwrap_err();
        assert!(matches!(err, ReaderError::Source(_)));
    }

    #[test]
    fn stray_dot_is_an_error() {
        let err = read_one(".").unwrap_err();
        assert!(matches!(err, ReaderError::Source(_)));
    }

    #[test]
    fn missing_close_paren_after_dot_is_an_error() {
        let err = read_one("(1 . 2 3)").unwrap_err();
        assert!(matches!(err, ReaderError::Source(_)));
    }

    #[test]
    fn symbols_with_identical_names_intern_to_the_same_object() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let roots = RootStack::new();
        let mut interner = TestInterner::default();
        let mut reader = Reader::new("foo foo");
        let scope = roots.push_frame(2);
        let a = scope.slot(0);
        let b = scope.slot(1);
        a.set(reader.read(&mut heap, &roots, &mut interner).unwrap().unwrap());
        b.set(reader.read(&mut heap, &roots, &mut interner).unwrap().unwrap());
        assert_eq!(a.get(), b.get());
    }
}

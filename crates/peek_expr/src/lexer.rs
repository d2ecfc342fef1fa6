//! Lexical analyzer for trigger expressions.
//!
//! Produces identifiers (a name segment with an optional `[n]` index suffix,
//! so uniquified peeker names like `sig[1]` stay addressable), integer
//! literals (decimal, `0x`, `0b`, with `_` separators), real literals,
//! operators and punctuation. Whitespace is skipped.

use crate::error::ExprError;
use crate::token::{Span, Token, TokenKind};

/// Lexes an expression into tokens.
///
/// The returned vector always ends with a [`TokenKind::Eof`] token.
///
/// # Errors
///
/// Returns [`ExprError::Lex`] at the first character that cannot start a token
/// or a malformed numeric literal.
pub fn lex(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, ExprError> {
        let mut tokens = Vec::new();
        loop {
            while self.peek().is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(self.pos, self.pos),
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ExprError {
        ExprError::Lex {
            offset,
            message: message.into(),
        }
    }

    fn next_token(&mut self) -> Result<Token, ExprError> {
        let start = self.pos;
        let c = self.peek();

        if c.is_ascii_alphabetic() || c == b'_' {
            return Ok(self.lex_ident(start));
        }
        if c.is_ascii_digit() {
            return self.lex_number(start);
        }

        let (kind, len) = match (c, self.peek_at(1)) {
            (b'*', b'*') => (TokenKind::StarStar, 2),
            (b'/', b'/') => (TokenKind::SlashSlash, 2),
            (b'<', b'<') => (TokenKind::Shl, 2),
            (b'>', b'>') => (TokenKind::Shr, 2),
            (b'=', b'=') => (TokenKind::EqEq, 2),
            (b'!', b'=') => (TokenKind::NotEq, 2),
            (b'<', b'=') => (TokenKind::Le, 2),
            (b'>', b'=') => (TokenKind::Ge, 2),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', _) => (TokenKind::Star, 1),
            (b'/', _) => (TokenKind::Slash, 1),
            (b'%', _) => (TokenKind::Percent, 1),
            (b'&', _) => (TokenKind::Amp, 1),
            (b'|', _) => (TokenKind::Pipe, 1),
            (b'^', _) => (TokenKind::Caret, 1),
            (b'~', _) => (TokenKind::Tilde, 1),
            (b'!', _) => (TokenKind::Bang, 1),
            (b'<', _) => (TokenKind::Lt, 1),
            (b'>', _) => (TokenKind::Gt, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b'.', _) => (TokenKind::Dot, 1),
            (b'=', _) => return Err(self.error(start, "unexpected '=' (use '==' to compare)")),
            _ => {
                let ch = std::str::from_utf8(&self.source[start..])
                    .ok()
                    .and_then(|s| s.chars().next())
                    .unwrap_or('?');
                return Err(self.error(start, format!("unexpected character '{ch}'")));
            }
        };
        self.pos += len;
        Ok(Token {
            kind,
            span: Span::new(start, self.pos),
        })
    }

    fn lex_ident(&mut self, start: usize) -> Token {
        while self.peek().is_ascii_alphanumeric() || matches!(self.peek(), b'_' | b'$') {
            self.pos += 1;
        }
        // index suffix: `name[12]`
        if self.peek() == b'[' {
            let mut end = self.pos + 1;
            while self.source.get(end).is_some_and(u8::is_ascii_digit) {
                end += 1;
            }
            if end > self.pos + 1 && self.source.get(end) == Some(&b']') {
                self.pos = end + 1;
            }
        }
        Token {
            kind: TokenKind::Ident,
            span: Span::new(start, self.pos),
        }
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, ExprError> {
        let radix_digits: Option<fn(u8) -> bool> = match (self.peek(), self.peek_at(1)) {
            (b'0', b'x' | b'X') => Some(|b: u8| b.is_ascii_hexdigit()),
            (b'0', b'b' | b'B') => Some(|b: u8| matches!(b, b'0' | b'1')),
            _ => None,
        };
        if let Some(is_digit) = radix_digits {
            self.pos += 2;
            let digits_start = self.pos;
            while is_digit(self.peek()) || self.peek() == b'_' {
                self.pos += 1;
            }
            if self.pos == digits_start || self.peek().is_ascii_alphanumeric() {
                return Err(self.error(start, "malformed integer literal"));
            }
            return Ok(Token {
                kind: TokenKind::Int,
                span: Span::new(start, self.pos),
            });
        }

        let mut kind = TokenKind::Int;
        self.eat_digits();
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            kind = TokenKind::Real;
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(), b'e' | b'E') {
            let sign = usize::from(matches!(self.peek_at(1), b'+' | b'-'));
            if self.peek_at(1 + sign).is_ascii_digit() {
                kind = TokenKind::Real;
                self.pos += 1 + sign;
                self.eat_digits();
            }
        }
        if self.peek().is_ascii_alphabetic() || self.peek() == b'_' {
            return Err(self.error(start, "malformed numeric literal"));
        }
        Ok(Token {
            kind,
            span: Span::new(start, self.pos),
        })
    }

    fn eat_digits(&mut self) {
        while self.peek().is_ascii_digit() || self.peek() == b'_' {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn texts(src: &str) -> Vec<String> {
        lex(src)
            .unwrap()
            .into_iter()
            .map(|t| t.span.text(src).to_string())
            .collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   "), vec![TokenKind::Eof]);
    }

    #[test]
    fn hierarchical_name_and_postfix_delay() {
        use TokenKind::*;
        assert_eq!(
            kinds("top.clk & ~top.clk.delay(1)"),
            vec![
                Ident, Dot, Ident, Amp, Tilde, Ident, Dot, Ident, Dot, Ident, LParen, Int, RParen,
                Eof
            ]
        );
    }

    #[test]
    fn two_char_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("a ** b // c << d >> e == f != g <= h >= i"),
            vec![
                Ident, StarStar, Ident, SlashSlash, Ident, Shl, Ident, Shr, Ident, EqEq, Ident,
                NotEq, Ident, Le, Ident, Ge, Ident, Eof
            ]
        );
    }

    #[test]
    fn single_char_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("+-*/%&|^~!<>(),."),
            vec![
                Plus, Minus, Star, Slash, Percent, Amp, Pipe, Caret, Tilde, Bang, Lt, Gt, LParen,
                RParen, Comma, Dot, Eof
            ]
        );
    }

    #[test]
    fn numeric_literals() {
        use TokenKind::*;
        assert_eq!(
            kinds("42 0x1F 0b1010 1_000 1.5 2e3 3.0E-2"),
            vec![Int, Int, Int, Int, Real, Real, Real, Eof]
        );
        assert_eq!(texts("0xff_ff"), vec!["0xff_ff", ""]);
    }

    #[test]
    fn index_suffix_is_part_of_identifier() {
        assert_eq!(texts("sig[1] + data[12]"), vec!["sig[1]", "+", "data[12]", ""]);
        // a non-numeric bracket is not swallowed
        assert!(lex("sig[a]").is_err());
    }

    #[test]
    fn identifier_characters() {
        assert_eq!(texts("_tmp$1 x2"), vec!["_tmp$1", "x2", ""]);
    }

    #[test]
    fn spans_are_byte_offsets() {
        let toks = lex("  clk  &  rst").unwrap();
        assert_eq!(toks[0].span, Span::new(2, 5));
        assert_eq!(toks[1].span, Span::new(7, 8));
        assert_eq!(toks[2].span, Span::new(10, 13));
        assert_eq!(toks[3].span, Span::new(13, 13));
    }

    #[test]
    fn unexpected_character_reports_offset() {
        let err = lex("clk @ 3").unwrap_err();
        assert_eq!(err.offset(), 4);
        assert!(err.to_string().contains("unexpected character '@'"));
    }

    #[test]
    fn single_equals_is_rejected() {
        let err = lex("a = 1").unwrap_err();
        assert_eq!(err.offset(), 2);
        assert!(err.to_string().contains("=="));
    }

    #[test]
    fn malformed_numbers() {
        assert!(lex("0x").is_err());
        assert!(lex("0b102").is_err());
        assert!(lex("12abc").is_err());
    }
}

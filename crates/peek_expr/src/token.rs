//! Token types for the trigger expression lexer.
//!
//! Literal values are not stored in the token; the parser reads them back from
//! the source text through the token's [`Span`].

use serde::{Deserialize, Serialize};

/// A byte range in the expression source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// The source text this span covers.
    pub fn text(self, source: &str) -> &str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// A trigger expression token kind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    /// Signal or function name segment, e.g. `clk` or `sig[1]`.
    Ident,
    /// Integer literal: decimal, `0x` hex or `0b` binary.
    Int,
    /// Real literal, e.g. `1.5` or `2e-3`.
    Real,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `//`
    SlashSlash,
    /// `%`
    Percent,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Human-readable description for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer",
            TokenKind::Real => "real number",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::StarStar => "'**'",
            TokenKind::Slash => "'/'",
            TokenKind::SlashSlash => "'//'",
            TokenKind::Percent => "'%'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Amp => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Tilde => "'~'",
            TokenKind::Bang => "'!'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Eof => "end of expression",
        }
    }
}

/// A token with its source location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Where the token appears in the source.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_and_text() {
        let src = "top.clk & rst";
        let a = Span::new(0, 7);
        let b = Span::new(10, 13);
        assert_eq!(a.merge(b), Span::new(0, 13));
        assert_eq!(b.merge(a), Span::new(0, 13));
        assert_eq!(a.text(src), "top.clk");
        assert_eq!(Span::new(20, 30).text(src), "");
    }

    #[test]
    fn token_serializes() {
        let tok = Token {
            kind: TokenKind::StarStar,
            span: Span::new(3, 5),
        };
        let json = serde_json::to_string(&tok).unwrap();
        assert_eq!(json, r#"{"kind":"StarStar","span":{"start":3,"end":5}}"#);
    }

    #[test]
    fn describe_is_quoted_for_punctuation() {
        assert_eq!(TokenKind::SlashSlash.describe(), "'//'");
        assert_eq!(TokenKind::Eof.describe(), "end of expression");
    }
}

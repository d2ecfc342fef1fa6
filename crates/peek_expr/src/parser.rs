//! Pratt parser for trigger expressions.
//!
//! | BP (L,R)  | Operators |
//! |-----------|-----------|
//! | (1,2)     | `\|` |
//! | (3,4)     | `^` |
//! | (5,6)     | `&` |
//! | (7,8)     | `==` `!=` |
//! | (9,10)    | `<` `<=` `>` `>=` |
//! | (11,12)   | `<<` `>>` |
//! | (13,14)   | `+` `-` |
//! | (15,16)   | `*` `/` `//` `%` |
//! | (18,17)   | `**` (right-assoc) |
//! | prefix 19 | `~` `!` `-` |
//! | postfix   | `.delay(n)` |
//!
//! Names are dotted hierarchical paths. A `.delay` segment followed by `(` is
//! the postfix delay, never part of a name. `abs`, `delay`, `posedge` and
//! `negedge` followed by `(` are calls.

use num::{BigInt, Num};
use peek_trace::{BinaryOp, UnaryOp};

use crate::ast::{Edge, Expr};
use crate::error::ExprError;
use crate::lexer::lex;
use crate::token::{Span, Token, TokenKind};

const PREFIX_BP: u8 = 19;

/// Deepest expression tree, and deepest parenthesis nesting, accepted.
const MAX_DEPTH: usize = 256;

/// Binding power for binary operators. Returns (left_bp, right_bp).
fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::BitOr => (1, 2),
        BinaryOp::BitXor => (3, 4),
        BinaryOp::BitAnd => (5, 6),
        BinaryOp::Eq | BinaryOp::Ne => (7, 8),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => (9, 10),
        BinaryOp::Shl | BinaryOp::Shr => (11, 12),
        BinaryOp::Add | BinaryOp::Sub => (13, 14),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod => (15, 16),
        BinaryOp::Pow => (18, 17), // right-associative
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::Ne,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Le => BinaryOp::Le,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Ge => BinaryOp::Ge,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::SlashSlash => BinaryOp::FloorDiv,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::StarStar => BinaryOp::Pow,
        _ => return None,
    })
}

fn unary_op(kind: TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Tilde => Some(UnaryOp::Invert),
        TokenKind::Bang => Some(UnaryOp::Not),
        TokenKind::Minus => Some(UnaryOp::Neg),
        _ => None,
    }
}

/// Parses a complete trigger expression.
///
/// # Errors
///
/// Returns [`ExprError::Lex`] or [`ExprError::Parse`] with the byte offset of
/// the first problem. Trailing tokens after a complete expression are an error.
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = lex(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
    };
    let (expr, _) = parser.parse_expr_bp(0)?;
    if !parser.at(TokenKind::Eof) {
        return Err(parser.unexpected("operator or end of expression"));
    }
    Ok(expr)
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

/// A parsed subexpression and the height of its tree.
type Parsed = (Expr, usize);

impl Parser<'_> {
    fn current(&self) -> Token {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> Token {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[(self.pos + n).min(last)]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.current();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn text(&self, tok: Token) -> &str {
        tok.span.text(self.source)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ExprError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        let tok = self.current();
        let found = match tok.kind {
            TokenKind::Ident | TokenKind::Int | TokenKind::Real => {
                format!("'{}'", self.text(tok))
            }
            kind => kind.describe().to_string(),
        };
        ExprError::Parse {
            offset: tok.span.start,
            message: format!("expected {expected}, found {found}"),
        }
    }

    /// `.delay(` starting at the current token.
    fn at_postfix_delay(&self) -> bool {
        self.at(TokenKind::Dot)
            && self.nth(1).kind == TokenKind::Ident
            && self.text(self.nth(1)) == "delay"
            && self.nth(2).kind == TokenKind::LParen
    }

    fn too_deep(&self, offset: usize) -> ExprError {
        ExprError::Parse {
            offset,
            message: "expression nested too deeply".into(),
        }
    }

    /// Wraps a new node over children of height `height`.
    fn node(&self, expr: Expr, height: usize) -> Result<Parsed, ExprError> {
        if height >= MAX_DEPTH {
            return Err(self.too_deep(expr.span().start));
        }
        Ok((expr, height + 1))
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Parsed, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.too_deep(self.current().span.start));
        }
        self.depth += 1;
        let parsed = self.parse_infix(min_bp);
        self.depth -= 1;
        parsed
    }

    fn parse_infix(&mut self, min_bp: u8) -> Result<Parsed, ExprError> {
        let (mut lhs, mut height) = self.parse_prefix_expr()?;

        loop {
            if self.at_postfix_delay() {
                self.advance(); // .
                self.advance(); // delay
                self.advance(); // (
                let (ticks, ticks_height) = self.parse_expr_bp(0)?;
                let close = self.expect(TokenKind::RParen)?;
                let span = lhs.span().merge(close.span);
                let delayed = Expr::Delay {
                    operand: Box::new(lhs),
                    ticks: Box::new(ticks),
                    span,
                };
                (lhs, height) = self.node(delayed, height.max(ticks_height))?;
                continue;
            }

            let Some(op) = binary_op(self.current().kind) else {
                break;
            };
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.advance();

            let (rhs, rhs_height) = self.parse_expr_bp(r_bp)?;
            let span = lhs.span().merge(rhs.span());
            let binary = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
                span,
            };
            (lhs, height) = self.node(binary, height.max(rhs_height))?;
        }

        Ok((lhs, height))
    }

    fn parse_prefix_expr(&mut self) -> Result<Parsed, ExprError> {
        let tok = self.current();

        if let Some(op) = unary_op(tok.kind) {
            self.advance();
            let (operand, height) = self.parse_expr_bp(PREFIX_BP)?;
            let span = tok.span.merge(operand.span());
            let unary = Expr::Unary {
                op,
                operand: Box::new(operand),
                span,
            };
            return self.node(unary, height);
        }

        match tok.kind {
            TokenKind::Int => {
                self.advance();
                let value = self.int_value(tok)?;
                Ok((
                    Expr::Int {
                        value,
                        span: tok.span,
                    },
                    1,
                ))
            }
            TokenKind::Real => {
                self.advance();
                let value = self
                    .text(tok)
                    .replace('_', "")
                    .parse()
                    .map_err(|_| ExprError::Parse {
                        offset: tok.span.start,
                        message: format!("invalid real literal '{}'", self.text(tok)),
                    })?;
                Ok((
                    Expr::Real {
                        value,
                        span: tok.span,
                    },
                    1,
                ))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr_bp(0)?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident if self.nth(1).kind == TokenKind::LParen => self.parse_call(),
            TokenKind::Ident => Ok((self.parse_name(), 1)),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn int_value(&self, tok: Token) -> Result<BigInt, ExprError> {
        let text = self.text(tok).replace('_', "");
        let (digits, radix) = match text.get(..2) {
            Some("0x" | "0X") => (&text[2..], 16),
            Some("0b" | "0B") => (&text[2..], 2),
            _ => (text.as_str(), 10),
        };
        BigInt::from_str_radix(digits, radix).map_err(|_| ExprError::Parse {
            offset: tok.span.start,
            message: format!("invalid integer literal '{}'", self.text(tok)),
        })
    }

    /// Dotted name; stops before a postfix `.delay(`.
    fn parse_name(&mut self) -> Expr {
        let first = self.advance();
        let mut name = self.text(first).to_string();
        let mut span = first.span;
        while self.at(TokenKind::Dot)
            && self.nth(1).kind == TokenKind::Ident
            && !self.at_postfix_delay()
        {
            self.advance();
            let seg = self.advance();
            name.push('.');
            name.push_str(self.text(seg));
            span = span.merge(seg.span);
        }
        Expr::Signal { name, span }
    }

    fn parse_call(&mut self) -> Result<Parsed, ExprError> {
        let func = self.advance();
        let name = self.text(func).to_string();
        self.expect(TokenKind::LParen)?;
        let (operand, mut height) = self.parse_expr_bp(0)?;
        let operand = Box::new(operand);

        let expr = match name.as_str() {
            "delay" => {
                self.expect(TokenKind::Comma)?;
                let (ticks, ticks_height) = self.parse_expr_bp(0)?;
                height = height.max(ticks_height);
                let close = self.expect(TokenKind::RParen)?;
                Expr::Delay {
                    operand,
                    ticks: Box::new(ticks),
                    span: func.span.merge(close.span),
                }
            }
            "abs" | "posedge" | "negedge" => {
                let close = self.expect(TokenKind::RParen)?;
                let span = func.span.merge(close.span);
                match name.as_str() {
                    "abs" => Expr::Unary {
                        op: UnaryOp::Abs,
                        operand,
                        span,
                    },
                    "posedge" => Expr::Edge {
                        edge: Edge::Pos,
                        operand,
                        span,
                    },
                    _ => Expr::Edge {
                        edge: Edge::Neg,
                        operand,
                        span,
                    },
                }
            }
            _ => {
                return Err(ExprError::Parse {
                    offset: func.span.start,
                    message: format!("unknown function '{name}'"),
                })
            }
        };
        self.node(expr, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(src: &str) -> String {
        parse(src).unwrap().to_string()
    }

    #[test]
    fn signal_names() {
        assert_eq!(show("clk"), "clk");
        assert_eq!(show("top.cpu.clk"), "top.cpu.clk");
        assert_eq!(show("top.sig[1]"), "top.sig[1]");
    }

    #[test]
    fn literals() {
        assert_eq!(show("42"), "42");
        assert_eq!(show("0x1f"), "31");
        assert_eq!(show("0b1010"), "10");
        assert_eq!(show("1_000"), "1000");
        assert_eq!(show("1.5"), "1.5");
        assert_eq!(show("2e1"), "20.0");
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(show("a + b * c"), "(a + (b * c))");
        assert_eq!(show("a * b + c"), "((a * b) + c)");
        assert_eq!(show("a - b - c"), "((a - b) - c)");
        assert_eq!(show("a // b % c"), "((a // b) % c)");
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(show("a ** b ** c"), "(a ** (b ** c))");
        assert_eq!(show("a * b ** c"), "(a * (b ** c))");
        assert_eq!(show("2 ** -1"), "(2 ** -1)");
    }

    #[test]
    fn bitwise_and_comparison_precedence() {
        assert_eq!(show("a | b ^ c & d"), "(a | (b ^ (c & d)))");
        assert_eq!(show("a & b == c"), "(a & (b == c))");
        assert_eq!(show("a == b < c"), "(a == (b < c))");
        assert_eq!(show("a < b << 1"), "(a < (b << 1))");
        assert_eq!(show("a << b + 1"), "(a << (b + 1))");
    }

    #[test]
    fn prefix_operators() {
        assert_eq!(show("~a & b"), "(~a & b)");
        assert_eq!(show("!a | -b"), "(!a | -b)");
        assert_eq!(show("-a ** 2"), "(-a ** 2)");
        assert_eq!(show("~~a"), "~~a");
    }

    #[test]
    fn postfix_delay() {
        assert_eq!(show("clk.delay(1)"), "clk.delay(1)");
        assert_eq!(show("top.clk.delay(2)"), "top.clk.delay(2)");
        assert_eq!(show("~clk.delay(1)"), "~clk.delay(1)");
        assert_eq!(show("(a + b).delay(3)"), "(a + b).delay(3)");
        assert_eq!(show("clk.delay(1).delay(2)"), "clk.delay(1).delay(2)");

        let Expr::Unary { operand, .. } = parse("~clk.delay(1)").unwrap() else {
            panic!("expected unary");
        };
        assert!(matches!(*operand, Expr::Delay { .. }));
    }

    #[test]
    fn delay_as_name_segment() {
        // without a call, `delay` is just part of the hierarchical name
        assert_eq!(show("top.delay.q"), "top.delay.q");
    }

    #[test]
    fn calls() {
        assert_eq!(show("abs(a - b)"), "abs((a - b))");
        assert_eq!(show("delay(clk, 2)"), "clk.delay(2)");
        assert_eq!(show("posedge(top.clk)"), "posedge(top.clk)");
        assert_eq!(show("negedge(rst) & en"), "(negedge(rst) & en)");
    }

    #[test]
    fn classic_rising_edge() {
        assert_eq!(
            show("top.clk & ~top.clk.delay(1)"),
            "(top.clk & ~top.clk.delay(1))"
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(show("(a + b) * c"), "((a + b) * c)");
    }

    #[test]
    fn spans_cover_source() {
        let src = "top.clk & ~rst";
        let e = parse(src).unwrap();
        assert_eq!(e.span(), Span::new(0, 14));
        let Expr::Binary { left, right, .. } = e else {
            panic!("expected binary");
        };
        assert_eq!(left.span().text(src), "top.clk");
        assert_eq!(right.span().text(src), "~rst");
    }

    #[test]
    fn signals_in_source_order() {
        let e = parse("a.x + delay(b, n) * abs(a.x)").unwrap();
        assert_eq!(e.signals(), vec!["a.x", "b", "n", "a.x"]);
    }

    #[test]
    fn errors_carry_offsets() {
        let err = parse("a +").unwrap_err();
        assert_eq!(err.offset(), 3);
        assert!(err.to_string().contains("expected expression"));

        let err = parse("(a & b").unwrap_err();
        assert_eq!(err.offset(), 6);
        assert!(err.to_string().contains("expected ')'"));

        let err = parse("a b").unwrap_err();
        assert_eq!(err.offset(), 2);
        assert!(err.to_string().contains("found 'b'"));

        let err = parse("frob(a)").unwrap_err();
        assert_eq!(err.offset(), 0);
        assert!(err.to_string().contains("unknown function 'frob'"));

        let err = parse("delay(a)").unwrap_err();
        assert!(err.to_string().contains("expected ','"));
    }

    #[test]
    fn empty_expression_is_an_error() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, ExprError::Parse { offset: 0, .. }));
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let src = format!("{}clk{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = parse(&src).unwrap_err();
        assert!(err.to_string().contains("nested too deeply"));

        let src = format!("{}clk", "~".repeat(10_000));
        assert!(matches!(parse(&src), Err(ExprError::Parse { .. })));

        let src = format!("{}1", "2 ** ".repeat(10_000));
        assert!(matches!(parse(&src), Err(ExprError::Parse { .. })));
    }

    #[test]
    fn long_operator_chains_are_bounded() {
        let src = vec!["clk"; 10_000].join(" + ");
        let err = parse(&src).unwrap_err();
        assert!(err.to_string().contains("nested too deeply"));

        let src = format!("clk{}", ".delay(1)".repeat(10_000));
        assert!(matches!(parse(&src), Err(ExprError::Parse { .. })));
    }

    #[test]
    fn moderate_nesting_parses() {
        let src = format!("{}clk{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(show(&src), "clk");
        let src = vec!["clk"; 100].join(" + ");
        assert!(parse(&src).is_ok());
    }

    #[test]
    fn lex_errors_propagate() {
        assert!(matches!(parse("a $ b"), Err(ExprError::Lex { offset: 2, .. })));
    }
}

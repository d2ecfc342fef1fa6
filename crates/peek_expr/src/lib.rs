//! Trigger expressions over recorded signals.
//!
//! A trigger expression is written the way the trace algebra reads, e.g.
//! `top.clk & ~top.clk.delay(1)` or `posedge(top.clk) & (top.state == 3)`.
//! [`parse`] turns text into an [`Expr`], and [`evaluate`] resolves its signal
//! names through a [`SignalSource`] (such as a
//! [`PeekerGroup`](peek_probe::PeekerGroup)) to produce a derived trace.
//!
//! # Usage
//!
//! ```
//! use peek_expr::eval_str;
//! use peek_probe::PeekerGroup;
//!
//! let mut group = PeekerGroup::new();
//! let clk = group.add("top.clk", 1);
//! for (t, v) in [(0, 0), (3, 1), (6, 0), (9, 1)] {
//!     group.peeker_mut(clk).unwrap().observe(t, v).unwrap();
//! }
//! let trigger = eval_str("clk & ~clk.delay(1)", &group).unwrap();
//! assert_eq!(trigger.trig_times(12), vec![3, 9]);
//! ```
//!
//! # Modules
//!
//! - `error`: Lex, parse and evaluation errors with byte offsets
//! - `token`: Token kinds and spans
//! - `lexer`: Source text to tokens
//! - `ast`: Expression tree
//! - `parser`: Pratt parser
//! - `eval`: Evaluation against a signal source

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Edge, Expr};
pub use error::ExprError;
pub use eval::{eval_str, evaluate, evaluate_node, Evaluated, SignalSource};
pub use lexer::lex;
pub use parser::parse;
pub use token::{Span, Token, TokenKind};

//! FILENAME: core/order-parser/src/token.rs
//! PURPOSE: Token definitions for the order-string lexer.

use crate::axis::Axis;

/// Tokens recognized by the order lexer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// One of the axis letters H, G, I, J, T, F.
    Axis(Axis),
    /// The `,` between row axes and column axes.
    Separator,
    EOF,
    Illegal(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Axis(axis) => write!(f, "{}", axis.code()),
            Token::Separator => write!(f, ","),
            Token::EOF => write!(f, "EOF"),
            Token::Illegal(c) => write!(f, "ILLEGAL({})", c),
        }
    }
}

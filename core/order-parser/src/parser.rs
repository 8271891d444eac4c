//! FILENAME: core/order-parser/src/parser.rs
//! PURPOSE: Parser that turns an order string into an immutable OrderSpec.
//! CONTEXT: Second stage after the Lexer. The order language is tiny, but the
//! parser still validates it fully so that no enumeration ever starts on a
//! malformed layout.
//!
//! GRAMMAR:
//!   order      --> axes "," axes
//!   axes       --> AXIS+
//!   AXIS       --> "H" | "G" | "I" | "J" | "T" | "F"
//!
//! Every axis appears at most once, and G is never combined with I or J.

use crate::axis::{Axis, AxisList, Dimension, AXIS_COUNT};
use crate::lexer::Lexer;
use crate::token::Token;

/// Errors raised while parsing an order string.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OrderError {
    /// Wrong number or position of separators, or a character outside the
    /// order alphabet.
    Malformed { order: String, reason: String },
    /// The same axis letter appears twice.
    DuplicateAxis { order: String, axis: Axis },
    /// `G` combined with `I` or `J`.
    ConflictingAxis { order: String },
}

impl OrderError {
    fn malformed(order: &str, reason: impl Into<String>) -> Self {
        OrderError::Malformed {
            order: order.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::Malformed { order, reason } => {
                write!(f, "Malformed order '{}': {}", order, reason)
            }
            OrderError::DuplicateAxis { order, axis } => {
                write!(f, "Axis {} appears more than once in order '{}'", axis, order)
            }
            OrderError::ConflictingAxis { order } => write!(
                f,
                "Order '{}' mixes G with the detector axes I/J",
                order
            ),
        }
    }
}

impl std::error::Error for OrderError {}

pub type OrderResult<T> = Result<T, OrderError>;

/// A validated order: which axes run down the rows and which across the
/// columns, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    text: String,
    row_axes: AxisList,
    column_axes: AxisList,
}

impl OrderSpec {
    /// Canonical text of the order (whitespace removed).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn row_axes(&self) -> &[Axis] {
        &self.row_axes
    }

    pub fn column_axes(&self) -> &[Axis] {
        &self.column_axes
    }

    pub fn axes(&self, dimension: Dimension) -> &[Axis] {
        match dimension {
            Dimension::Rows => &self.row_axes,
            Dimension::Columns => &self.column_axes,
        }
    }

    /// Dimension and depth of `axis`, or None if the order omits it.
    pub fn position(&self, axis: Axis) -> Option<(Dimension, usize)> {
        if let Some(depth) = self.row_axes.iter().position(|a| *a == axis) {
            return Some((Dimension::Rows, depth));
        }
        self.column_axes
            .iter()
            .position(|a| *a == axis)
            .map(|depth| (Dimension::Columns, depth))
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.position(axis).is_some()
    }

    /// Whether groups are addressed through the detector grid (I/J).
    pub fn uses_detector_grid(&self) -> bool {
        self.contains(Axis::DetectorRow) || self.contains(Axis::DetectorColumn)
    }

    /// The natural axis list the nested-iteration driver walks for this order.
    pub fn natural_axes(&self) -> &'static [Axis] {
        if self.uses_detector_grid() {
            &Axis::NATURAL_DETECTOR
        } else {
            &Axis::NATURAL_GROUPED
        }
    }

    /// Iteration order over `natural`, as indices into `natural`, outermost
    /// first. Axes the order omits come first (they only ever take index 0),
    /// then the row axes, then the column axes.
    pub fn permutation(&self, natural: &[Axis]) -> Vec<usize> {
        let index_of = |axis: &Axis| natural.iter().position(|n| n == axis);
        let mut order: Vec<usize> = natural
            .iter()
            .enumerate()
            .filter(|(_, axis)| !self.contains(**axis))
            .map(|(i, _)| i)
            .collect();
        order.extend(self.row_axes.iter().filter_map(index_of));
        order.extend(self.column_axes.iter().filter_map(index_of));
        order
    }
}

impl std::fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for OrderSpec {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// The Parser holds the lexer and the current token.
pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            source: input,
            lexer,
            current_token,
        }
    }

    /// Parses the whole input into an OrderSpec.
    pub fn parse(&mut self) -> OrderResult<OrderSpec> {
        if self.current_token == Token::EOF {
            return Err(OrderError::malformed(self.source, "empty order"));
        }

        let row_axes = self.parse_axes()?;
        if self.current_token != Token::Separator {
            return Err(OrderError::malformed(
                self.source,
                "expected exactly one ',' between row and column axes",
            ));
        }
        self.advance();
        let column_axes = self.parse_axes()?;

        // parse_axes stops only on Separator, EOF or an error
        if self.current_token == Token::Separator {
            return Err(OrderError::malformed(self.source, "more than one ','"));
        }

        if row_axes.is_empty() {
            return Err(OrderError::malformed(self.source, "',' must not come first"));
        }
        if column_axes.is_empty() {
            return Err(OrderError::malformed(self.source, "',' must not come last"));
        }

        let mut seen = [false; AXIS_COUNT];
        for axis in row_axes.iter().chain(column_axes.iter()) {
            if std::mem::replace(&mut seen[axis.slot()], true) {
                return Err(OrderError::DuplicateAxis {
                    order: self.source.to_string(),
                    axis: *axis,
                });
            }
        }

        let grouped = seen[Axis::Group.slot()];
        let detector = seen[Axis::DetectorRow.slot()] || seen[Axis::DetectorColumn.slot()];
        if grouped && detector {
            return Err(OrderError::ConflictingAxis {
                order: self.source.to_string(),
            });
        }

        let mut text: String = row_axes.iter().map(|a| a.code()).collect();
        text.push(',');
        text.extend(column_axes.iter().map(|a| a.code()));

        Ok(OrderSpec {
            text,
            row_axes,
            column_axes,
        })
    }

    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    fn parse_axes(&mut self) -> OrderResult<AxisList> {
        let mut axes = AxisList::new();
        loop {
            match self.current_token {
                Token::Axis(axis) => {
                    axes.push(axis);
                    self.advance();
                }
                Token::Separator | Token::EOF => return Ok(axes),
                Token::Illegal(ch) => {
                    return Err(OrderError::malformed(
                        self.source,
                        format!("illegal character '{}'", ch),
                    ));
                }
            }
        }
    }
}

/// Convenience function to parse an order string.
pub fn parse(input: &str) -> OrderResult<OrderSpec> {
    let mut parser = Parser::new(input);
    parser.parse()
}

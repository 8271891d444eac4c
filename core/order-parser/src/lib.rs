//! FILENAME: core/order-parser/src/lib.rs
//! PURPOSE: Library root for the table order-string parser.
//! CONTEXT: An order string such as "HGT,F" tells the projection engine which
//! axes of the data space are enumerated down the table rows (before the
//! comma, slowest first) and which across the columns (after the comma).
//!
//! PIPELINE: Order String --> Lexer --> Tokens --> Parser --> OrderSpec
//!
//! ALPHABET:
//! - H: data set
//! - G: group (mutually exclusive with I/J)
//! - I, J: detector row / detector column decomposition of a group
//! - T: time sample
//! - F: selected field
//! - `,`: separator between row axes and column axes

pub mod axis;
pub mod lexer;
pub mod parser;
pub mod token;


pub use axis::{Axis, AxisList, Dimension, AXIS_COUNT};
pub use lexer::Lexer;
pub use parser::{parse, OrderError, OrderResult, OrderSpec, Parser};
pub use token::Token;

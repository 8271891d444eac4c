//! FILENAME: core/order-parser/src/lexer.rs
//! PURPOSE: Scans a raw order string and produces a stream of Tokens.
//! CONTEXT: First stage of the order pipeline. Letters are case-sensitive;
//! anything outside the alphabet becomes `Token::Illegal` and is rejected by
//! the parser rather than here.

use crate::axis::Axis;
use crate::token::Token;
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.chars().peekable(),
        }
    }

    /// Advances the lexer and returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some(',') => Token::Separator,
            Some(ch) => match Axis::from_code(ch) {
                Some(axis) => Token::Axis(axis),
                None => Token::Illegal(ch),
            },
            None => Token::EOF,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.input.peek() {
            if !ch.is_ascii_whitespace() {
                break;
            }
            self.input.next();
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        match self.next_token() {
            Token::EOF => None,
            token => Some(token),
        }
    }
}

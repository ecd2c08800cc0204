//! Lexing and parsing for the scripting-language subset.
//!
//! - [`token`] — token kinds and the two-channel token stream
//! - [`lexer`] — hand-written byte-based lexer, trivia kept as hidden tokens
//! - [`ast`] — tree nodes carrying token-range spans
//! - [`parser`] — recursive-descent parser, fails on the first error

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

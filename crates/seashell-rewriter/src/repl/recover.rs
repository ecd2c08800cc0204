//! Continuation detection for interactive input.
//!
//! Decides whether a failed submission is plausibly an unfinished multi-line
//! entry (keep reading) or a hard syntax error (report now). The decision
//! reuses the real lexer and parser rather than pattern-matching on message
//! strings.

use crate::error::ErrorCode;
use crate::syntax::lexer::Lexer;
use crate::syntax::parser::Parser;

/// True when `code` should be treated as an incomplete entry awaiting
/// continuation lines.
///
/// Input starting with `{` is ambiguous between a block statement and an
/// object literal; it is retried with a `(` prefix so an unfinished object
/// literal counts as incomplete too.
pub fn is_recoverable(code: &str) -> bool {
    if code.trim_start().starts_with('{') && classify(&format!("({code}")) {
        return true;
    }
    classify(code)
}

fn classify(code: &str) -> bool {
    let tokens = match Lexer::new(code).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            return match e.code {
                // open template literals and block comments legally span lines
                ErrorCode::L003 | ErrorCode::L004 => true,
                // an open string continues only via backslash-newline
                ErrorCode::L002 => ends_with_line_continuation(code),
                _ => false,
            };
        }
    };
    match Parser::new(&tokens).parse() {
        Ok(_) => false,
        // only running out of input is recoverable; a bad token mid-stream
        // will not be fixed by more lines
        Err(e) => e.code == ErrorCode::P003,
    }
}

fn ends_with_line_continuation(code: &str) -> bool {
    let stripped = code
        .strip_suffix("\r\n")
        .or_else(|| code.strip_suffix('\n'))
        .or_else(|| code.strip_suffix('\r'))
        .or_else(|| code.strip_suffix('\u{2028}'))
        .or_else(|| code.strip_suffix('\u{2029}'));
    matches!(stripped, Some(rest) if rest.ends_with('\\'))
}

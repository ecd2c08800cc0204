use thiserror::Error as ThisError;

/// Error codes prefixed by phase: L = lexer, P = parser.
///
/// The codes matter beyond diagnostics: the recoverable-error classifier
/// keys off L002/L003/L004 and P003 to decide whether a failure just means
/// "ran out of input".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character
    L002, // unterminated string literal
    L003, // unterminated template literal
    L004, // unterminated block comment

    // Parser
    P001, // unexpected token
    P002, // missing expected token
    P003, // unexpected end of input
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::L003 => "L003",
            Self::L004 => "L004",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse failure. Surfaced verbatim to the caller; the rewriter itself
/// never recovers from one.
#[derive(Debug, Clone, ThisError)]
#[error("[{code}] {line}:{column} — {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

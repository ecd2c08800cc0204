/// Lexer channel. Hidden tokens (whitespace and comments) are invisible to
/// the parser but kept in the stream so rendering can reproduce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Default,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals / names. `true`, `false`, `null`, `undefined` and `this`
    // lex as plain identifiers; the rewriter never needs to tell them apart.
    Ident,
    Number,
    Str,
    Template,

    // Keywords
    Var,
    Let,
    Const,
    Function,
    Class,
    Return,
    If,
    Else,
    While,
    For,
    New,
    Await,
    Typeof,

    // Operators
    Assign,      // =
    PlusAssign,  // +=
    MinusAssign, // -=
    StarAssign,  // *=
    SlashAssign, // /=
    EqEq,        // ==
    EqEqEq,      // ===
    BangEq,      // !=
    BangEqEq,    // !==
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=
    Plus,        // +
    Minus,       // -
    Star,        // *
    Slash,       // /
    Percent,     // %
    PlusPlus,    // ++
    MinusMinus,  // --
    Bang,        // !
    AmpAmp,      // &&
    PipePipe,    // ||
    QuestionQuestion, // ??
    Arrow,       // =>

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semi,      // ;
    Comma,     // ,
    Dot,       // .
    Colon,     // :
    Question,  // ?

    // Hidden channel: one token per run of whitespace/comments.
    Trivia,

    Eof,
}

impl TokenKind {
    pub fn is_assign_op(&self) -> bool {
        matches!(
            self,
            Self::Assign | Self::PlusAssign | Self::MinusAssign | Self::StarAssign | Self::SlashAssign
        )
    }

    pub fn is_unary_op(&self) -> bool {
        matches!(
            self,
            Self::Bang | Self::Minus | Self::Plus | Self::Typeof | Self::Await
                | Self::PlusPlus | Self::MinusMinus
        )
    }

    pub fn is_decl_keyword(&self) -> bool {
        matches!(self, Self::Var | Self::Let | Self::Const)
    }
}

/// Maps an identifier string to its keyword token, or returns `Ident`.
pub fn keyword_or_ident(s: &str) -> TokenKind {
    match s {
        "var"      => TokenKind::Var,
        "let"      => TokenKind::Let,
        "const"    => TokenKind::Const,
        "function" => TokenKind::Function,
        "class"    => TokenKind::Class,
        "return"   => TokenKind::Return,
        "if"       => TokenKind::If,
        "else"     => TokenKind::Else,
        "while"    => TokenKind::While,
        "for"      => TokenKind::For,
        "new"      => TokenKind::New,
        "await"    => TokenKind::Await,
        "typeof"   => TokenKind::Typeof,
        _          => TokenKind::Ident,
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Verbatim lexeme, exactly as it appeared in the source.
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub channel: Channel,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        let channel = if kind == TokenKind::Trivia { Channel::Hidden } else { Channel::Default };
        Self { kind, text: text.into(), line, column, channel }
    }
}

use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind, keyword_or_ident};

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, bytes: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    /// Tokenize the whole input. The stream interleaves significant tokens
    /// with at most one hidden `Trivia` token per whitespace/comment run and
    /// always ends with `Eof`. Fails on the first lexical error.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();

        loop {
            if let Some(trivia) = self.lex_trivia()? {
                tokens.push(trivia);
            }

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
                return Ok(tokens);
            }

            tokens.push(self.next_token()?);
        }
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        let line = self.line;
        let col = self.column;
        let ch = self.advance();

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b';' => TokenKind::Semi,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b':' => TokenKind::Colon,
            b'%' => TokenKind::Percent,

            b'?' => {
                if self.peek() == b'?' { self.advance(); TokenKind::QuestionQuestion }
                else { TokenKind::Question }
            }
            b'=' => {
                if self.peek() == b'=' {
                    self.advance();
                    if self.peek() == b'=' { self.advance(); TokenKind::EqEqEq }
                    else { TokenKind::EqEq }
                } else if self.peek() == b'>' { self.advance(); TokenKind::Arrow }
                else { TokenKind::Assign }
            }
            b'!' => {
                if self.peek() == b'=' {
                    self.advance();
                    if self.peek() == b'=' { self.advance(); TokenKind::BangEqEq }
                    else { TokenKind::BangEq }
                } else { TokenKind::Bang }
            }
            b'<' => {
                if self.peek() == b'=' { self.advance(); TokenKind::LtEq }
                else { TokenKind::Lt }
            }
            b'>' => {
                if self.peek() == b'=' { self.advance(); TokenKind::GtEq }
                else { TokenKind::Gt }
            }
            b'+' => {
                if self.peek() == b'+' { self.advance(); TokenKind::PlusPlus }
                else if self.peek() == b'=' { self.advance(); TokenKind::PlusAssign }
                else { TokenKind::Plus }
            }
            b'-' => {
                if self.peek() == b'-' { self.advance(); TokenKind::MinusMinus }
                else if self.peek() == b'=' { self.advance(); TokenKind::MinusAssign }
                else { TokenKind::Minus }
            }
            b'*' => {
                if self.peek() == b'=' { self.advance(); TokenKind::StarAssign }
                else { TokenKind::Star }
            }
            // comments were consumed as trivia, so a slash here is division
            b'/' => {
                if self.peek() == b'=' { self.advance(); TokenKind::SlashAssign }
                else { TokenKind::Slash }
            }
            b'&' => {
                if self.peek() == b'&' { self.advance(); TokenKind::AmpAmp }
                else {
                    return Err(Error::new(ErrorCode::L001, line, col, "unexpected character `&`"));
                }
            }
            b'|' => {
                if self.peek() == b'|' { self.advance(); TokenKind::PipePipe }
                else {
                    return Err(Error::new(ErrorCode::L001, line, col, "unexpected character `|`"));
                }
            }

            b'"' | b'\'' => {
                self.read_string(ch, line, col)?;
                TokenKind::Str
            }
            b'`' => {
                self.read_template(line, col)?;
                TokenKind::Template
            }
            b'0'..=b'9' => {
                self.read_number();
                TokenKind::Number
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$' => {
                self.read_ident();
                keyword_or_ident(&self.source[start..self.pos])
            }

            other => {
                return Err(Error::new(ErrorCode::L001, line, col,
                    format!("unexpected character `{}`", other as char)));
            }
        };

        Ok(Token::new(kind, &self.source[start..self.pos], line, col))
    }

    /// Consume one run of whitespace and comments into a single hidden token.
    fn lex_trivia(&mut self) -> Result<Option<Token>, Error> {
        let start = self.pos;
        let line = self.line;
        let col = self.column;

        loop {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => { self.advance(); }
                b'/' if self.peek_next() == b'/' => {
                    while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
                }
                b'/' if self.peek_next() == b'*' => {
                    let c_line = self.line;
                    let c_col = self.column;
                    self.advance(); // /
                    self.advance(); // *
                    loop {
                        if self.is_at_end() {
                            return Err(Error::new(ErrorCode::L004, c_line, c_col,
                                "unterminated block comment"));
                        }
                        if self.peek() == b'*' && self.peek_next() == b'/' {
                            self.advance();
                            self.advance();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }

        if self.pos > start {
            Ok(Some(Token::new(TokenKind::Trivia, &self.source[start..self.pos], line, col)))
        } else {
            Ok(None)
        }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// Scan a quoted literal without interpreting escapes; the lexeme is kept
    /// verbatim. A backslash-newline pair is a legal line continuation; a raw
    /// newline or end of input is an unterminated literal.
    fn read_string(&mut self, quote: u8, start_line: usize, start_col: usize) -> Result<(), Error> {
        loop {
            if self.is_at_end() {
                return Err(Error::new(ErrorCode::L002, start_line, start_col,
                    "unterminated string literal"));
            }
            match self.peek() {
                b'\n' | b'\r' => {
                    return Err(Error::new(ErrorCode::L002, start_line, start_col,
                        "unterminated string literal"));
                }
                b'\\' => {
                    self.advance();
                    if self.peek() == b'\r' {
                        self.advance();
                        if self.peek() == b'\n' { self.advance(); }
                    } else if !self.is_at_end() {
                        self.advance();
                    }
                }
                c => {
                    self.advance();
                    if c == quote { return Ok(()); }
                }
            }
        }
    }

    /// Templates may span lines. Substitutions are not parsed; the whole
    /// literal up to the closing backtick is one token.
    fn read_template(&mut self, start_line: usize, start_col: usize) -> Result<(), Error> {
        loop {
            if self.is_at_end() {
                return Err(Error::new(ErrorCode::L003, start_line, start_col,
                    "unterminated template literal"));
            }
            match self.advance() {
                b'`' => return Ok(()),
                b'\\' => {
                    if !self.is_at_end() { self.advance(); }
                }
                _ => {}
            }
        }
    }

    fn read_number(&mut self) {
        // radix prefix: 0x / 0o / 0b
        if self.bytes[self.pos - 1] == b'0'
            && matches!(self.peek(), b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
        {
            self.advance();
            while self.peek().is_ascii_alphanumeric() { self.advance(); }
            return;
        }
        while self.peek().is_ascii_digit() { self.advance(); }
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() { self.advance(); }
        }
        if matches!(self.peek(), b'e' | b'E') {
            let mut i = self.pos + 1;
            if matches!(self.bytes.get(i), Some(b'+') | Some(b'-')) { i += 1; }
            if self.bytes.get(i).is_some_and(|b| b.is_ascii_digit()) {
                while self.pos < i { self.advance(); }
                while self.peek().is_ascii_digit() { self.advance(); }
            }
        }
    }

    fn read_ident(&mut self) {
        while matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'$') {
            self.advance();
        }
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.bytes[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.bytes[self.pos] }
    }

    fn peek_next(&self) -> u8 {
        if self.pos + 1 >= self.bytes.len() { 0 } else { self.bytes[self.pos + 1] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::token::Channel;

    fn lex(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().unwrap()
    }

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src)
            .into_iter()
            .filter(|t| t.channel == Channel::Default)
            .map(|t| t.kind)
            .collect()
    }

    fn lex_err(src: &str) -> Error {
        Lexer::new(src).tokenize().unwrap_err()
    }

    #[test]
    fn empty() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn member_call_chain() {
        assert_eq!(
            kinds("db.coll.find()"),
            vec![
                TokenKind::Ident, TokenKind::Dot, TokenKind::Ident, TokenKind::Dot,
                TokenKind::Ident, TokenKind::LParen, TokenKind::RParen, TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(kinds("var"), vec![TokenKind::Var, TokenKind::Eof]);
        assert_eq!(kinds("await"), vec![TokenKind::Await, TokenKind::Eof]);
        assert_eq!(kinds("function"), vec![TokenKind::Function, TokenKind::Eof]);
        // literals-as-identifiers
        assert_eq!(kinds("true"), vec![TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(kinds("undefined"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(kinds("==="), vec![TokenKind::EqEqEq, TokenKind::Eof]);
        assert_eq!(kinds("!=="), vec![TokenKind::BangEqEq, TokenKind::Eof]);
        assert_eq!(kinds("=>"), vec![TokenKind::Arrow, TokenKind::Eof]);
        assert_eq!(kinds("??"), vec![TokenKind::QuestionQuestion, TokenKind::Eof]);
        assert_eq!(kinds("&&"), vec![TokenKind::AmpAmp, TokenKind::Eof]);
    }

    #[test]
    fn trivia_is_one_hidden_token_per_run() {
        let tokens = lex("a  /* c */ b");
        let texts: Vec<(&str, Channel)> =
            tokens.iter().map(|t| (t.text.as_str(), t.channel)).collect();
        assert_eq!(
            texts,
            vec![
                ("a", Channel::Default),
                ("  /* c */ ", Channel::Hidden),
                ("b", Channel::Default),
                ("", Channel::Default),
            ]
        );
    }

    #[test]
    fn line_comment_is_trivia() {
        let tokens = lex("x // note\ny");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Trivia && t.text.contains("// note")));
    }

    #[test]
    fn lexemes_are_verbatim() {
        let tokens = lex("0x1F 'a\\'b' `t${x}` 1.5e-3");
        let texts: Vec<&str> = tokens
            .iter()
            .filter(|t| t.channel == Channel::Default && t.kind != TokenKind::Eof)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["0x1F", "'a\\'b'", "`t${x}`", "1.5e-3"]);
    }

    #[test]
    fn string_line_continuation() {
        assert_eq!(kinds("'a\\\nb'"), vec![TokenKind::Str, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(lex_err("'oops").code, ErrorCode::L002);
        assert_eq!(lex_err("'oops\nx'").code, ErrorCode::L002);
    }

    #[test]
    fn unterminated_template() {
        assert_eq!(lex_err("`oops").code, ErrorCode::L003);
    }

    #[test]
    fn unterminated_block_comment() {
        assert_eq!(lex_err("a /* oops").code, ErrorCode::L004);
    }

    #[test]
    fn unexpected_character() {
        assert_eq!(lex_err("a # b").code, ErrorCode::L001);
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = lex("a\nb");
        let sig: Vec<&Token> = tokens.iter().filter(|t| t.channel == Channel::Default).collect();
        assert_eq!((sig[0].line, sig[0].column), (1, 1));
        assert_eq!((sig[1].line, sig[1].column), (2, 1));
    }
}

use crate::error::{Error, ErrorCode};
use crate::syntax::ast::*;
use crate::syntax::token::{Channel, Token, TokenKind};

/// Recursive-descent parser over the full token stream. The parser only ever
/// looks at significant tokens; hidden trivia is skipped but stays addressed
/// by every node's `Span` token range for verbatim re-emission.
///
/// Fails with the first error; no recovery is attempted here. Recovery policy
/// lives entirely in `repl::recover`.
pub struct Parser<'a> {
    tokens: &'a [Token],
    /// Raw index of the current significant token.
    pos: usize,
    /// Raw index one past the most recently consumed significant token.
    prev_end: usize,
}

/// Span bookmark: (lo, line, column) of a node's first token.
type Mark = (usize, usize, usize);

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let mut p = Self { tokens, pos: 0, prev_end: 0 };
        p.pos = p.next_significant(0);
        p
    }

    pub fn parse(mut self) -> Result<Program, Error> {
        let mut body = Vec::new();
        while !self.is_at_end() {
            body.push(self.parse_stmt()?);
        }
        // lo 0 / hi at the Eof token: the program range covers leading and
        // trailing trivia so an untouched program re-emits byte-for-byte
        let span = Span::new(1, 1, 0, self.tokens.len() - 1);
        Ok(Program { body, span })
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        match self.peek_kind() {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let mark = self.mark();
                let decl = self.parse_var_decl_core()?;
                self.matches(TokenKind::Semi);
                Ok(Stmt::VarDecl(VarDecl { span: self.span(mark), ..decl }))
            }
            TokenKind::Function => {
                let func = self.parse_function(true)?;
                Ok(Stmt::FuncDecl(func))
            }
            TokenKind::Class => self.parse_class(),
            TokenKind::Return => self.parse_return(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::LBrace => self.parse_block_stmt(),
            TokenKind::Semi => {
                let mark = self.mark();
                self.bump();
                Ok(Stmt::Empty(self.span(mark)))
            }
            _ => {
                let mark = self.mark();
                let expr = self.parse_expr()?;
                self.matches(TokenKind::Semi);
                Ok(Stmt::Expr(ExprStmt { expr, span: self.span(mark) }))
            }
        }
    }

    /// `var/let/const a = 1, b` without the trailing semicolon, so the
    /// classic-for initializer can reuse it.
    fn parse_var_decl_core(&mut self) -> Result<VarDecl, Error> {
        let mark = self.mark();
        let kind = match self.bump().kind {
            TokenKind::Var => DeclKind::Var,
            TokenKind::Let => DeclKind::Let,
            TokenKind::Const => DeclKind::Const,
            _ => unreachable!("caller checked for a declaration keyword"),
        };

        let mut declarators = Vec::new();
        loop {
            let d_mark = self.mark();
            let name = self.expect_ident()?;
            let init = if self.matches(TokenKind::Assign) {
                Some(self.parse_assign_expr()?)
            } else {
                None
            };
            declarators.push(Declarator { name, init, span: self.span(d_mark) });
            if !self.matches(TokenKind::Comma) { break; }
        }

        Ok(VarDecl { kind, declarators, span: self.span(mark) })
    }

    /// `function name(params) { body }`; the name is optional in expression
    /// position.
    fn parse_function(&mut self, require_name: bool) -> Result<Func, Error> {
        let mark = self.mark();
        self.expect(TokenKind::Function)?;
        let name = if self.check(TokenKind::Ident) {
            Some(self.expect_ident()?)
        } else if require_name {
            return Err(self.unexpected("function name"));
        } else {
            None
        };
        self.expect(TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_braced_stmts()?;
        Ok(Func { name, params, body, span: self.span(mark) })
    }

    fn parse_class(&mut self) -> Result<Stmt, Error> {
        let mark = self.mark();
        self.expect(TokenKind::Class)?;
        let name = self.expect_ident()?;
        // optional `extends Base` — `extends` is not a reserved word here
        if self.check(TokenKind::Ident) && self.peek().text == "extends" {
            self.bump();
            self.parse_call_member()?;
        }
        self.expect(TokenKind::LBrace)?;
        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.matches(TokenKind::Semi) { continue; }
            let m_mark = self.mark();
            let m_name = self.expect_ident()?;
            self.expect(TokenKind::LParen)?;
            let params = self.parse_param_list()?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_braced_stmts()?;
            methods.push(Func { name: Some(m_name), params, body, span: self.span(m_mark) });
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::ClassDecl(ClassDecl { name, methods, span: self.span(mark) }))
    }

    fn parse_return(&mut self) -> Result<Stmt, Error> {
        let mark = self.mark();
        self.expect(TokenKind::Return)?;
        let value = if self.check(TokenKind::Semi) || self.check(TokenKind::RBrace) || self.is_at_end() {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.matches(TokenKind::Semi);
        Ok(Stmt::Return(ReturnStmt { value, span: self.span(mark) }))
    }

    fn parse_if(&mut self) -> Result<Stmt, Error> {
        let mark = self.mark();
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.matches(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt { condition, then_branch, else_branch, span: self.span(mark) }))
    }

    fn parse_while(&mut self) -> Result<Stmt, Error> {
        let mark = self.mark();
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::While(WhileStmt { condition, body, span: self.span(mark) }))
    }

    fn parse_for(&mut self) -> Result<Stmt, Error> {
        let mark = self.mark();
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init = if self.check(TokenKind::Semi) {
            None
        } else if self.peek_kind().is_decl_keyword() {
            let d_mark = self.mark();
            let decl = self.parse_var_decl_core()?;
            Some(Box::new(Stmt::VarDecl(VarDecl { span: self.span(d_mark), ..decl })))
        } else {
            let e_mark = self.mark();
            let expr = self.parse_expr()?;
            Some(Box::new(Stmt::Expr(ExprStmt { expr, span: self.span(e_mark) })))
        };
        self.expect(TokenKind::Semi)?;

        let condition = if self.check(TokenKind::Semi) { None } else { Some(self.parse_expr()?) };
        self.expect(TokenKind::Semi)?;

        let step = if self.check(TokenKind::RParen) { None } else { Some(self.parse_expr()?) };
        self.expect(TokenKind::RParen)?;

        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For(ForStmt { init, condition, step, body, span: self.span(mark) }))
    }

    fn parse_block_stmt(&mut self) -> Result<Stmt, Error> {
        let mark = self.mark();
        let body = self.parse_braced_stmts()?;
        Ok(Stmt::Block(BlockStmt { body, span: self.span(mark) }))
    }

    fn parse_braced_stmts(&mut self) -> Result<Vec<Stmt>, Error> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    // ─── Expressions (precedence climbing) ───────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, Error> {
        self.parse_assign_expr()
    }

    fn parse_assign_expr(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let left = self.parse_ternary()?;
        if self.peek_kind().is_assign_op() {
            let op = self.bump().kind;
            let value = self.parse_assign_expr()?;
            return Ok(Expr::Assign {
                op,
                target: Box::new(left),
                value: Box::new(value),
                span: self.span(mark),
            });
        }
        Ok(left)
    }

    fn parse_ternary(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let expr = self.parse_or()?;
        if self.matches(TokenKind::Question) {
            let then_expr = self.parse_assign_expr()?;
            self.expect(TokenKind::Colon)?;
            let else_expr = self.parse_assign_expr()?;
            return Ok(Expr::Ternary {
                condition: Box::new(expr),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
                span: self.span(mark),
            });
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut left = self.parse_and()?;
        while matches!(self.peek_kind(), TokenKind::PipePipe | TokenKind::QuestionQuestion) {
            let op = self.bump().kind;
            let right = self.parse_and()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span(mark),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::AmpAmp) {
            let op = self.bump().kind;
            let right = self.parse_equality()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span(mark),
            };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut left = self.parse_comparison()?;
        while matches!(
            self.peek_kind(),
            TokenKind::EqEq | TokenKind::EqEqEq | TokenKind::BangEq | TokenKind::BangEqEq
        ) {
            let op = self.bump().kind;
            let right = self.parse_comparison()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span(mark),
            };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut left = self.parse_addition()?;
        while matches!(
            self.peek_kind(),
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq
        ) {
            let op = self.bump().kind;
            let right = self.parse_addition()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span(mark),
            };
        }
        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut left = self.parse_multiplication()?;
        while matches!(self.peek_kind(), TokenKind::Plus | TokenKind::Minus) {
            let op = self.bump().kind;
            let right = self.parse_multiplication()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span(mark),
            };
        }
        Ok(left)
    }

    fn parse_multiplication(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut left = self.parse_unary()?;
        while matches!(self.peek_kind(), TokenKind::Star | TokenKind::Slash | TokenKind::Percent) {
            let op = self.bump().kind;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span: self.span(mark),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Error> {
        if self.peek_kind().is_unary_op() {
            let mark = self.mark();
            let op = self.bump().kind;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary { op, operand: Box::new(operand), span: self.span(mark) });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut expr = self.parse_call_member()?;
        while matches!(self.peek_kind(), TokenKind::PlusPlus | TokenKind::MinusMinus) {
            self.bump();
            expr = Expr::Postfix { operand: Box::new(expr), span: self.span(mark) };
        }
        Ok(expr)
    }

    /// Member access, computed access and calls, tightest-binding tier.
    fn parse_call_member(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        let mut expr = if self.check(TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.bump();
                    let property = self.expect_member_name()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                        span: self.span(mark),
                    };
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                        span: self.span(mark),
                    };
                }
                TokenKind::LParen => {
                    self.bump();
                    let args = self.parse_arg_list()?;
                    self.expect(TokenKind::RParen)?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        span: self.span(mark),
                    };
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// `new a.b.C(args)` — the callee binds member accesses but not calls.
    fn parse_new(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        self.expect(TokenKind::New)?;

        let mut callee = if self.check(TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.bump();
                    let property = self.expect_member_name()?;
                    callee = Expr::Member {
                        object: Box::new(callee),
                        property,
                        span: self.span(mark),
                    };
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    callee = Expr::Index {
                        object: Box::new(callee),
                        index: Box::new(index),
                        span: self.span(mark),
                    };
                }
                _ => break,
            }
        }

        let args = if self.matches(TokenKind::LParen) {
            let args = self.parse_arg_list()?;
            self.expect(TokenKind::RParen)?;
            args
        } else {
            Vec::new()
        };

        Ok(Expr::New { callee: Box::new(callee), args, span: self.span(mark) })
    }

    fn parse_primary(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        match self.peek_kind() {
            TokenKind::Number | TokenKind::Str | TokenKind::Template => {
                self.bump();
                Ok(Expr::Literal(self.span(mark)))
            }

            TokenKind::Ident => {
                // single-parameter arrow: `x => body`
                if self.peek_next_kind() == TokenKind::Arrow {
                    let param = self.expect_ident()?;
                    self.bump(); // =>
                    let body = self.parse_arrow_body()?;
                    return Ok(Expr::Arrow { params: vec![param], body, span: self.span(mark) });
                }
                let name = self.expect_ident()?;
                Ok(Expr::Ident(name, self.span(mark)))
            }

            TokenKind::LParen => {
                if self.lparen_starts_arrow() {
                    self.bump();
                    let params = self.parse_param_list()?;
                    self.expect(TokenKind::RParen)?;
                    self.expect(TokenKind::Arrow)?;
                    let body = self.parse_arrow_body()?;
                    return Ok(Expr::Arrow { params, body, span: self.span(mark) });
                }
                // grouping: the parens stay in the surrounding token range,
                // so the inner expression is returned as-is
                self.bump();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            TokenKind::LBracket => {
                self.bump();
                let mut elements = Vec::new();
                while !self.check(TokenKind::RBracket) && !self.is_at_end() {
                    elements.push(self.parse_assign_expr()?);
                    if !self.matches(TokenKind::Comma) { break; }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Array(elements, self.span(mark)))
            }

            TokenKind::LBrace => self.parse_object(),

            TokenKind::Function => {
                let func = self.parse_function(false)?;
                Ok(Expr::Func(func))
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    /// Object literal. Only the property values become AST children; keys and
    /// punctuation are reproduced from the token range.
    fn parse_object(&mut self) -> Result<Expr, Error> {
        let mark = self.mark();
        self.expect(TokenKind::LBrace)?;
        let mut values = Vec::new();

        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            match self.peek_kind() {
                // computed key: `[expr]: value`
                TokenKind::LBracket => {
                    self.bump();
                    values.push(self.parse_assign_expr()?);
                    self.expect(TokenKind::RBracket)?;
                    self.expect(TokenKind::Colon)?;
                    values.push(self.parse_assign_expr()?);
                }
                TokenKind::Ident | TokenKind::Str | TokenKind::Number => {
                    let key_mark = self.mark();
                    let key = self.bump();
                    if self.matches(TokenKind::Colon) {
                        values.push(self.parse_assign_expr()?);
                    } else if key.kind == TokenKind::Ident {
                        // shorthand `{a}` — the value is the identifier itself
                        values.push(Expr::Ident(key.text, self.span(key_mark)));
                    } else {
                        return Err(self.unexpected("`:`"));
                    }
                }
                _ => return Err(self.unexpected("property name")),
            }
            if !self.matches(TokenKind::Comma) { break; }
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Expr::Object(values, self.span(mark)))
    }

    fn parse_arrow_body(&mut self) -> Result<ArrowBody, Error> {
        if self.check(TokenKind::LBrace) {
            Ok(ArrowBody::Block(self.parse_braced_stmts()?))
        } else {
            Ok(ArrowBody::Expr(Box::new(self.parse_assign_expr()?)))
        }
    }

    fn parse_param_list(&mut self) -> Result<Vec<String>, Error> {
        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            params.push(self.expect_ident()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok(params)
    }

    fn parse_arg_list(&mut self) -> Result<Vec<Expr>, Error> {
        let mut args = Vec::new();
        while !self.check(TokenKind::RParen) && !self.is_at_end() {
            args.push(self.parse_assign_expr()?);
            if !self.matches(TokenKind::Comma) { break; }
        }
        Ok(args)
    }

    // ─── Lookahead ───────────────────────────────────────────────────────────

    /// True when the `(` at the current position opens an arrow-function
    /// parameter list: the matching `)` is directly followed by `=>`.
    fn lparen_starts_arrow(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        while i < self.tokens.len() {
            match self.tokens[i].kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let after = self.next_significant(i + 1);
                        return self.tokens[after].kind == TokenKind::Arrow;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn next_significant(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.tokens.len() && self.tokens[i].channel == Channel::Hidden {
            i += 1;
        }
        i.min(self.tokens.len() - 1)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    fn peek_next_kind(&self) -> TokenKind {
        self.tokens[self.next_significant(self.pos + 1)].kind
    }

    fn bump(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if tok.kind != TokenKind::Eof {
            self.prev_end = self.pos + 1;
            self.pos = self.next_significant(self.pos + 1);
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.bump(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind) {
            Ok(self.bump())
        } else if self.is_at_end() {
            Err(self.unexpected("more input"))
        } else {
            let tok = self.peek();
            Err(Error::new(
                ErrorCode::P002,
                tok.line,
                tok.column,
                format!("expected {:?}, found `{}`", kind, tok.text),
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, Error> {
        if self.check(TokenKind::Ident) {
            Ok(self.bump().text)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Property names after `.` may be identifiers or keywords.
    fn expect_member_name(&mut self) -> Result<String, Error> {
        match self.peek_kind() {
            TokenKind::Ident
            | TokenKind::Var | TokenKind::Let | TokenKind::Const
            | TokenKind::Function | TokenKind::Class | TokenKind::Return
            | TokenKind::If | TokenKind::Else | TokenKind::While | TokenKind::For
            | TokenKind::New | TokenKind::Await | TokenKind::Typeof => Ok(self.bump().text),
            _ => Err(self.unexpected("property name")),
        }
    }

    fn unexpected(&self, what: &str) -> Error {
        let tok = self.peek();
        if tok.kind == TokenKind::Eof {
            Error::new(ErrorCode::P003, tok.line, tok.column,
                format!("unexpected end of input, expected {what}"))
        } else {
            Error::new(ErrorCode::P001, tok.line, tok.column,
                format!("expected {what}, found `{}`", tok.text))
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    fn mark(&self) -> Mark {
        let tok = self.peek();
        (self.pos, tok.line, tok.column)
    }

    fn span(&self, (lo, line, column): Mark) -> Span {
        Span::new(line, column, lo, self.prev_end)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::Lexer;

    fn parse(src: &str) -> Program {
        let tokens = Lexer::new(src).tokenize().expect("lex failed");
        Parser::new(&tokens).parse().unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    fn parse_err(src: &str) -> Error {
        let tokens = Lexer::new(src).tokenize().expect("lex failed");
        Parser::new(&tokens).parse().expect_err("expected parse failure")
    }

    fn only_expr(src: &str) -> Expr {
        let mut program = parse(src);
        assert_eq!(program.body.len(), 1, "expected a single statement");
        match program.body.remove(0) {
            Stmt::Expr(e) => e.expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn member_call_chain() {
        let expr = only_expr("db.coll.find().toArray()");
        // outermost: call of a member of a call
        let Expr::Call { callee, .. } = expr else { panic!("expected call") };
        let Expr::Member { property, object, .. } = *callee else { panic!("expected member") };
        assert_eq!(property, "toArray");
        assert!(matches!(*object, Expr::Call { .. }));
    }

    #[test]
    fn assignment_binds_right() {
        let expr = only_expr("x = y = 1");
        let Expr::Assign { value, .. } = expr else { panic!("expected assignment") };
        assert!(matches!(*value, Expr::Assign { .. }));
    }

    #[test]
    fn grouping_is_transparent() {
        // the parens live in the token range, not the tree
        let expr = only_expr("(db)");
        assert!(matches!(expr, Expr::Ident(name, _) if name == "db"));
    }

    #[test]
    fn var_decl_multiple_declarators() {
        let program = parse("let a = 1, b;");
        let Stmt::VarDecl(decl) = &program.body[0] else { panic!("expected var decl") };
        assert_eq!(decl.kind, DeclKind::Let);
        assert_eq!(decl.declarators.len(), 2);
        assert!(decl.declarators[0].init.is_some());
        assert!(decl.declarators[1].init.is_none());
    }

    #[test]
    fn function_declaration() {
        let program = parse("function f(a, b) { return a; }");
        let Stmt::FuncDecl(f) = &program.body[0] else { panic!("expected function") };
        assert_eq!(f.name.as_deref(), Some("f"));
        assert_eq!(f.params, vec!["a", "b"]);
        assert_eq!(f.body.len(), 1);
    }

    #[test]
    fn class_with_methods() {
        let program = parse("class C extends B { m() { return 1; } n() {} }");
        let Stmt::ClassDecl(c) = &program.body[0] else { panic!("expected class") };
        assert_eq!(c.name, "C");
        assert_eq!(c.methods.len(), 2);
    }

    #[test]
    fn arrow_functions() {
        assert!(matches!(only_expr("x => x + 1"), Expr::Arrow { .. }));
        assert!(matches!(only_expr("(a, b) => { return a; }"), Expr::Arrow { .. }));
        assert!(matches!(only_expr("() => 1"), Expr::Arrow { .. }));
    }

    #[test]
    fn await_parses_anywhere() {
        let expr = only_expr("1 + await p");
        let Expr::Binary { right, .. } = expr else { panic!("expected binary") };
        assert!(matches!(*right, Expr::Unary { op: TokenKind::Await, .. }));
    }

    #[test]
    fn object_literal_values() {
        let Expr::Object(values, _) = only_expr("({a: 1, b, [k]: c})") else {
            panic!("expected object")
        };
        // a's value, shorthand b, computed key k, c's value
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn new_expression() {
        let expr = only_expr("new a.C(1)");
        let Expr::New { callee, args, .. } = expr else { panic!("expected new") };
        assert!(matches!(*callee, Expr::Member { .. }));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn classic_for() {
        let program = parse("for (let i = 0; i < 3; i++) { work(); }");
        assert!(matches!(&program.body[0], Stmt::For(_)));
    }

    #[test]
    fn block_not_object_at_statement_level() {
        let program = parse("{ f(); }");
        assert!(matches!(&program.body[0], Stmt::Block(_)));
    }

    #[test]
    fn error_at_end_of_input_is_p003() {
        assert_eq!(parse_err("db.coll.find(").code, ErrorCode::P003);
        assert_eq!(parse_err("function f() {").code, ErrorCode::P003);
    }

    #[test]
    fn error_mid_input_is_not_p003() {
        let err = parse_err("let 1 = x");
        assert_eq!(err.code, ErrorCode::P001);
    }

    #[test]
    fn spans_cover_token_ranges() {
        let src = "db.coll.find()";
        let tokens = Lexer::new(src).tokenize().unwrap();
        let program = Parser::new(&tokens).parse().unwrap();
        let span = program.body[0].span();
        let text: String = tokens[span.lo..span.hi].iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, src);
    }
}

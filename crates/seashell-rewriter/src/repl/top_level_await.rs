//! Top-level `await` support for interactive submissions.
//!
//! Wraps one submission in an immediately invoked async arrow so `await` is
//! legal at the top level. Variable declarations become assignments so the
//! same name can be declared again in a later, independently wrapped
//! submission, and the last bare expression becomes the wrapper's return
//! value.

use std::collections::HashMap;

use crate::syntax::ast::*;
use crate::syntax::lexer::Lexer;
use crate::syntax::parser::Parser;
use crate::syntax::token::{Token, TokenKind};

/// Transforms `src` for top-level `await`, or `None` when the submission
/// should run unmodified: it does not use `await` at its top level, it
/// contains a top-level `return` (left for the evaluator's own error), or it
/// does not parse at all.
pub fn process_top_level_await(src: &str) -> Option<String> {
    let tokens = Lexer::new(src).tokenize().ok()?;
    let program = Parser::new(&tokens).parse().ok()?;

    let mut scan = Scan::default();
    scan.stmts(&program.body);
    if !scan.has_await || scan.has_return {
        return None;
    }

    let mut edits = Edits::default();
    edits.collect(&program.body, true);
    if let Some(Stmt::Expr(last)) = program.body.last() {
        // anchor at the statement, not the expression: grouping parens are
        // part of the statement's tokens but outside the expression node
        edits.insert(last.span.lo, "return (");
        edits.insert(last.expr.span().hi, ")");
    }

    Some(edits.apply(&tokens))
}

// ─── Await/return detection ──────────────────────────────────────────────────

/// Looks for `await` and `return` reachable at the submission's top level.
/// Function, arrow and method bodies are their own await context and are not
/// descended into; nested blocks and loop bodies are.
#[derive(Default)]
struct Scan {
    has_await: bool,
    has_return: bool,
}

impl Scan {
    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(s) => self.expr(&s.expr),
            Stmt::VarDecl(decl) => {
                for declarator in &decl.declarators {
                    if let Some(init) = &declarator.init {
                        self.expr(init);
                    }
                }
            }
            Stmt::Return(s) => {
                self.has_return = true;
                if let Some(value) = &s.value {
                    self.expr(value);
                }
            }
            Stmt::If(s) => {
                self.expr(&s.condition);
                self.stmt(&s.then_branch);
                if let Some(else_branch) = &s.else_branch {
                    self.stmt(else_branch);
                }
            }
            Stmt::While(s) => {
                self.expr(&s.condition);
                self.stmt(&s.body);
            }
            Stmt::For(s) => {
                if let Some(init) = &s.init {
                    self.stmt(init);
                }
                if let Some(condition) = &s.condition {
                    self.expr(condition);
                }
                if let Some(step) = &s.step {
                    self.expr(step);
                }
                self.stmt(&s.body);
            }
            Stmt::Block(s) => self.stmts(&s.body),
            Stmt::FuncDecl(_) | Stmt::ClassDecl(_) | Stmt::Empty(_) => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Unary { op, operand, .. } => {
                if *op == TokenKind::Await {
                    self.has_await = true;
                }
                self.expr(operand);
            }
            Expr::Member { object, .. } => self.expr(object),
            Expr::Index { object, index, .. } => {
                self.expr(object);
                self.expr(index);
            }
            Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            Expr::Assign { target, value, .. } => {
                self.expr(target);
                self.expr(value);
            }
            Expr::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::Ternary { condition, then_expr, else_expr, .. } => {
                self.expr(condition);
                self.expr(then_expr);
                self.expr(else_expr);
            }
            Expr::Postfix { operand, .. } => self.expr(operand),
            Expr::Array(elements, _) | Expr::Object(elements, _) => {
                for element in elements {
                    self.expr(element);
                }
            }
            // function bodies are separate await contexts
            Expr::Func(_) | Expr::Arrow { .. } => {}
            Expr::Ident(..) | Expr::Literal(_) => {}
        }
    }
}

// ─── Token-level edits ───────────────────────────────────────────────────────

/// Insertions before a token index and whole-token replacements, applied in
/// one pass over the stream. Insertions at the same index keep push order.
#[derive(Default)]
struct Edits {
    inserts: HashMap<usize, String>,
    replacements: HashMap<usize, String>,
}

impl Edits {
    fn insert(&mut self, index: usize, text: &str) {
        self.inserts.entry(index).or_default().push_str(text);
    }

    fn replace(&mut self, index: usize, text: &str) {
        self.replacements.insert(index, text.to_string());
    }

    /// Declaration-to-assignment rewrites. All declaration forms are
    /// rewritten at the top level; in nested statement bodies and `for`
    /// headers only `var` is, since block-scoped names are invisible
    /// outside the submission anyway.
    fn collect(&mut self, stmts: &[Stmt], top_level: bool) {
        for stmt in stmts {
            self.collect_stmt(stmt, top_level);
        }
    }

    fn collect_stmt(&mut self, stmt: &Stmt, top_level: bool) {
        match stmt {
            Stmt::VarDecl(decl) if top_level || decl.kind == DeclKind::Var => {
                self.rewrite_decl(decl);
            }
            Stmt::FuncDecl(func) => {
                if let Some(name) = &func.name {
                    self.insert(func.span.lo, &format!("{name}="));
                }
            }
            Stmt::ClassDecl(decl) => {
                self.insert(decl.span.lo, &format!("{}=", decl.name));
            }
            Stmt::If(s) => {
                self.collect_stmt(&s.then_branch, false);
                if let Some(else_branch) = &s.else_branch {
                    self.collect_stmt(else_branch, false);
                }
            }
            Stmt::While(s) => self.collect_stmt(&s.body, false),
            Stmt::For(s) => {
                // a rewritten `var` initializer is a plain expression, which
                // is still a legal `for` header
                if let Some(init) = &s.init {
                    if let Stmt::VarDecl(decl) = init.as_ref() {
                        if decl.kind == DeclKind::Var {
                            self.rewrite_decl(decl);
                        }
                    }
                }
                self.collect_stmt(&s.body, false);
            }
            Stmt::Block(s) => self.collect(&s.body, false),
            _ => {}
        }
    }

    /// `var a = 1, b;` becomes `void ( (a = 1), (b=undefined));` so the
    /// names land on the enclosing scope as plain assignments.
    fn rewrite_decl(&mut self, decl: &VarDecl) {
        self.replace(decl.span.lo, "void (");
        for declarator in &decl.declarators {
            self.insert(declarator.span.lo, "(");
            if declarator.init.is_some() {
                self.insert(declarator.span.hi, ")");
            } else {
                self.insert(declarator.span.hi, "=undefined)");
            }
        }
        if let Some(last) = decl.declarators.last() {
            self.insert(last.span.hi, ")");
        }
    }

    /// The trailing newline before `})()` guards against a line comment at
    /// the end of the submission swallowing the wrapper's close.
    fn apply(&self, tokens: &[Token]) -> String {
        let mut out = String::from("(async () => { ");
        for (i, token) in tokens.iter().enumerate() {
            if let Some(inserted) = self.inserts.get(&i) {
                out.push_str(inserted);
            }
            if token.kind == TokenKind::Eof {
                continue;
            }
            match self.replacements.get(&i) {
                Some(replacement) => out.push_str(replacement),
                None => out.push_str(&token.text),
            }
        }
        out.push_str("\n})()");
        out
    }
}

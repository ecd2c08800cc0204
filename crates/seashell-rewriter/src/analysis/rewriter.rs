//! Type-inferring rewriter.
//!
//! A single bottom-up pass over the tree produces, per node, the rendered
//! source text and the inferred type. Rendering splices: every token the
//! node owns but no child claims is copied verbatim from the token stream,
//! trivia included, so untouched code survives byte-for-byte. The only
//! synthesized text is the `(await …)` wrapper around calls whose callee is
//! catalogued as deferred-returning.

use crate::analysis::symbols::SymbolTable;
use crate::syntax::ast::*;
use crate::syntax::token::{Token, TokenKind};
use crate::types::{SignatureRegistry, TypeDesc};

/// Result of emitting one node.
struct Emit {
    text: String,
    /// Type directly assigned to this node, if the rules assign one.
    ty: Option<TypeDesc>,
    /// First assigned type found depth-first from here. Never absent: leaves
    /// without an assigned type report [`TypeDesc::Unknown`], so every
    /// search bottoms out.
    dfs: TypeDesc,
}

impl Emit {
    fn plain(text: String) -> Self {
        Self { text, ty: None, dfs: TypeDesc::Unknown }
    }

    fn typed(text: String, ty: TypeDesc) -> Self {
        Self { text, ty: Some(ty.clone()), dfs: ty }
    }
}

pub struct Rewriter<'a> {
    tokens: &'a [Token],
    registry: &'a SignatureRegistry,
    symbols: &'a mut SymbolTable,
}

impl<'a> Rewriter<'a> {
    pub fn new(
        tokens: &'a [Token],
        registry: &'a SignatureRegistry,
        symbols: &'a mut SymbolTable,
    ) -> Self {
        Self { tokens, registry, symbols }
    }

    /// Renders the whole program, wrapping deferred calls and updating the
    /// symbol table as declarations and assignments are encountered.
    pub fn rewrite_program(&mut self, program: &Program) -> String {
        let (text, _) = self.emit_stmt_list(program.span, &program.body);
        text
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn emit_stmt(&mut self, stmt: &Stmt) -> Emit {
        match stmt {
            Stmt::Expr(s) => {
                let e = self.emit_expr(&s.expr);
                let text = self.splice(s.span, &[(s.expr.span(), e.text)]);
                Emit { text, ty: e.ty, dfs: e.dfs }
            }

            Stmt::VarDecl(decl) => self.emit_var_decl(decl),

            Stmt::Return(s) => match &s.value {
                Some(value) => {
                    let e = self.emit_expr(value);
                    let text = self.splice(s.span, &[(value.span(), e.text)]);
                    // the returned value's search type becomes the statement
                    // type, which the enclosing function picks up
                    Emit { text, ty: Some(e.dfs.clone()), dfs: e.dfs }
                }
                None => Emit::typed(self.raw(s.span), TypeDesc::Unknown),
            },

            Stmt::FuncDecl(func) => self.emit_function(func, true),

            Stmt::ClassDecl(decl) => {
                let mut children = Vec::with_capacity(decl.methods.len());
                for method in &decl.methods {
                    let e = self.emit_function(method, false);
                    children.push((method.span, e.text));
                }
                self.symbols.add(decl.name.clone(), TypeDesc::Unknown);
                Emit::plain(self.splice(decl.span, &children))
            }

            Stmt::If(s) => {
                let cond = self.emit_expr(&s.condition);
                let mut children = vec![(s.condition.span(), cond.text)];
                let then = self.emit_stmt(&s.then_branch);
                children.push((s.then_branch.span(), then.text));
                if let Some(else_branch) = &s.else_branch {
                    let e = self.emit_stmt(else_branch);
                    children.push((else_branch.span(), e.text));
                }
                Emit { text: self.splice(s.span, &children), ty: None, dfs: cond.dfs }
            }

            Stmt::While(s) => {
                let cond = self.emit_expr(&s.condition);
                let body = self.emit_stmt(&s.body);
                let children = [(s.condition.span(), cond.text), (s.body.span(), body.text)];
                Emit { text: self.splice(s.span, &children), ty: None, dfs: cond.dfs }
            }

            Stmt::For(s) => {
                let mut children = Vec::new();
                let mut dfs = TypeDesc::Unknown;
                let mut first = true;
                if let Some(init) = &s.init {
                    let e = self.emit_stmt(init);
                    if first { dfs = e.dfs.clone(); first = false; }
                    children.push((init.span(), e.text));
                }
                if let Some(condition) = &s.condition {
                    let e = self.emit_expr(condition);
                    if first { dfs = e.dfs.clone(); first = false; }
                    children.push((condition.span(), e.text));
                }
                if let Some(step) = &s.step {
                    let e = self.emit_expr(step);
                    if first { dfs = e.dfs.clone(); }
                    children.push((step.span(), e.text));
                }
                let body = self.emit_stmt(&s.body);
                children.push((s.body.span(), body.text));
                Emit { text: self.splice(s.span, &children), ty: None, dfs }
            }

            Stmt::Block(s) => {
                let (text, ty) = self.emit_stmt_list(s.span, &s.body);
                let dfs = ty.clone().unwrap_or(TypeDesc::Unknown);
                Emit { text, ty: None, dfs }
            }

            Stmt::Empty(span) => Emit::plain(self.raw(*span)),
        }
    }

    fn emit_var_decl(&mut self, decl: &VarDecl) -> Emit {
        let mut children = Vec::new();
        let mut dfs = TypeDesc::Unknown;
        for (i, declarator) in decl.declarators.iter().enumerate() {
            match &declarator.init {
                Some(init) => {
                    let e = self.emit_expr(init);
                    self.symbols.add(declarator.name.clone(), e.dfs.clone());
                    if i == 0 { dfs = e.dfs.clone(); }
                    children.push((init.span(), e.text));
                }
                None => {
                    self.symbols.add(declarator.name.clone(), TypeDesc::Unknown);
                }
            }
        }
        Emit { text: self.splice(decl.span, &children), ty: None, dfs }
    }

    /// Statement sequence covering `span`. The second return is the type of
    /// the first statement that has one, which is how a function body yields
    /// the function's return type.
    fn emit_stmt_list(&mut self, span: Span, stmts: &[Stmt]) -> (String, Option<TypeDesc>) {
        let mut children = Vec::with_capacity(stmts.len());
        let mut ty = None;
        for stmt in stmts {
            let e = self.emit_stmt(stmt);
            if ty.is_none() {
                ty = e.ty;
            }
            children.push((stmt.span(), e.text));
        }
        (self.splice(span, &children), ty)
    }

    // ─── Expressions ─────────────────────────────────────────────────────────

    fn emit_expr(&mut self, expr: &Expr) -> Emit {
        match expr {
            Expr::Ident(name, span) => {
                Emit::typed(self.raw(*span), self.symbols.lookup(name))
            }

            Expr::Literal(span) => Emit::plain(self.raw(*span)),

            Expr::Member { object, property, span } => {
                let o = self.emit_expr(object);
                let ty = self.member_type(&o, property);
                let text = self.splice(*span, &[(object.span(), o.text)]);
                let dfs = ty.clone().unwrap_or(o.dfs);
                Emit { text, ty, dfs }
            }

            Expr::Call { callee, args, span } => {
                let c = self.emit_expr(callee);
                let mut children = vec![(callee.span(), c.text)];
                for arg in args {
                    let e = self.emit_expr(arg);
                    children.push((arg.span(), e.text));
                }
                let mut text = self.splice(*span, &children);

                let ty = match c.ty {
                    Some(TypeDesc::Function { returns_deferred, ret }) => {
                        if returns_deferred {
                            text = format!("(await {text})");
                        }
                        Some(*ret)
                    }
                    _ => None,
                };
                let dfs = ty.clone().unwrap_or(c.dfs);
                Emit { text, ty, dfs }
            }

            Expr::Assign { op, target, value, span } => {
                let t = self.emit_expr(target);
                let v = self.emit_expr(value);
                if *op == TokenKind::Assign {
                    if let Expr::Ident(name, _) = target.as_ref() {
                        self.symbols.add(name.clone(), v.dfs.clone());
                    }
                }
                let children = [(target.span(), t.text), (value.span(), v.text)];
                Emit { text: self.splice(*span, &children), ty: None, dfs: v.dfs }
            }

            Expr::Index { object, index, span } => {
                let o = self.emit_expr(object);
                let i = self.emit_expr(index);
                let children = [(object.span(), o.text), (index.span(), i.text)];
                Emit { text: self.splice(*span, &children), ty: None, dfs: o.dfs }
            }

            Expr::New { callee, args, span } => {
                let c = self.emit_expr(callee);
                let mut children = vec![(callee.span(), c.text)];
                for arg in args {
                    let e = self.emit_expr(arg);
                    children.push((arg.span(), e.text));
                }
                Emit { text: self.splice(*span, &children), ty: None, dfs: c.dfs }
            }

            Expr::Unary { operand, span, .. } => {
                let e = self.emit_expr(operand);
                let text = self.splice(*span, &[(operand.span(), e.text)]);
                Emit { text, ty: None, dfs: e.dfs }
            }

            Expr::Postfix { operand, span } => {
                let e = self.emit_expr(operand);
                let text = self.splice(*span, &[(operand.span(), e.text)]);
                Emit { text, ty: None, dfs: e.dfs }
            }

            Expr::Binary { left, right, span, .. } => {
                let l = self.emit_expr(left);
                let r = self.emit_expr(right);
                let children = [(left.span(), l.text), (right.span(), r.text)];
                Emit { text: self.splice(*span, &children), ty: None, dfs: l.dfs }
            }

            Expr::Ternary { condition, then_expr, else_expr, span } => {
                let c = self.emit_expr(condition);
                let t = self.emit_expr(then_expr);
                let e = self.emit_expr(else_expr);
                let children = [
                    (condition.span(), c.text),
                    (then_expr.span(), t.text),
                    (else_expr.span(), e.text),
                ];
                Emit { text: self.splice(*span, &children), ty: None, dfs: c.dfs }
            }

            Expr::Array(elements, span) | Expr::Object(elements, span) => {
                let mut children = Vec::with_capacity(elements.len());
                let mut dfs = TypeDesc::Unknown;
                for (i, element) in elements.iter().enumerate() {
                    let e = self.emit_expr(element);
                    if i == 0 { dfs = e.dfs.clone(); }
                    children.push((element.span(), e.text));
                }
                Emit { text: self.splice(*span, &children), ty: None, dfs }
            }

            Expr::Func(func) => self.emit_function(func, true),

            Expr::Arrow { params, body, span } => {
                self.symbols.push_scope();
                for param in params {
                    self.symbols.add(param.clone(), TypeDesc::Unknown);
                }
                let (text, ret) = match body {
                    ArrowBody::Expr(expr) => {
                        let e = self.emit_expr(expr);
                        let text = self.splice(*span, &[(expr.span(), e.text)]);
                        (text, e.dfs)
                    }
                    ArrowBody::Block(stmts) => {
                        let (text, ty) = self.emit_stmt_list(*span, stmts);
                        (text, ty.unwrap_or(TypeDesc::Unknown))
                    }
                };
                self.symbols.pop_scope();
                let fty = TypeDesc::Function { returns_deferred: false, ret: Box::new(ret) };
                Emit::typed(text, fty)
            }
        }
    }

    /// Type of `object.property`. The connection root hands out the default
    /// child class for any attribute it does not catalogue, which is what
    /// makes `db.<anything>` act as a collection.
    fn member_type(&self, object: &Emit, property: &str) -> Option<TypeDesc> {
        match object.ty {
            Some(TypeDesc::Class(id)) => match self.registry.attr(id, property) {
                Some(ty) => Some(ty),
                None if id == self.registry.root() => {
                    Some(TypeDesc::Class(self.registry.default_child()))
                }
                None => None,
            },
            _ => None,
        }
    }

    /// User-defined functions never infer as deferred-returning themselves;
    /// any deferred call inside the body is already wrapped in place.
    fn emit_function(&mut self, func: &Func, bind_name: bool) -> Emit {
        self.symbols.push_scope();
        for param in &func.params {
            self.symbols.add(param.clone(), TypeDesc::Unknown);
        }
        let (text, body_ty) = self.emit_stmt_list(func.span, &func.body);
        self.symbols.pop_scope();

        let fty = TypeDesc::Function {
            returns_deferred: false,
            ret: Box::new(body_ty.unwrap_or(TypeDesc::Unknown)),
        };
        if bind_name {
            if let Some(name) = &func.name {
                self.symbols.add(name.clone(), fty.clone());
            }
        }
        Emit::typed(text, fty)
    }

    // ─── Rendering ───────────────────────────────────────────────────────────

    /// Copies `span`'s tokens verbatim, substituting each child's rendered
    /// text for the child's token range. Children arrive in source order.
    fn splice(&self, span: Span, children: &[(Span, String)]) -> String {
        let mut out = String::new();
        let mut cursor = span.lo;
        for (child, text) in children {
            out.push_str(&self.raw_range(cursor, child.lo));
            out.push_str(text);
            cursor = child.hi;
        }
        out.push_str(&self.raw_range(cursor, span.hi));
        out
    }

    fn raw(&self, span: Span) -> String {
        self.raw_range(span.lo, span.hi)
    }

    fn raw_range(&self, lo: usize, hi: usize) -> String {
        self.tokens[lo..hi].iter().map(|t| t.text.as_str()).collect()
    }
}

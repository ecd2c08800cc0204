use crate::syntax::token::TokenKind;

/// Source location plus the node's raw token range.
///
/// `lo..hi` indexes into the *full* token stream (hidden tokens included):
/// `lo` is the node's first token, `hi` is the index one past its last
/// significant token. Rendering a node verbatim is re-emitting that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub lo: usize,
    pub hi: usize,
}

impl Span {
    pub fn new(line: usize, column: usize, lo: usize, hi: usize) -> Self {
        Self { line, column, lo, hi }
    }
}

// ─── Top level ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `var/let/const a = 1, b;`
    VarDecl(VarDecl),
    /// `function f(a, b) { ... }`
    FuncDecl(Func),
    /// `class C { m() { ... } }`
    ClassDecl(ClassDecl),
    /// `return expr` or bare `return`
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Block(BlockStmt),
    /// A standalone expression used as a statement.
    Expr(ExprStmt),
    /// A lone `;`
    Empty(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(d)   => d.span,
            Stmt::FuncDecl(f)  => f.span,
            Stmt::ClassDecl(c) => c.span,
            Stmt::Return(r)    => r.span,
            Stmt::If(i)        => i.span,
            Stmt::While(w)     => w.span,
            Stmt::For(f)       => f.span,
            Stmt::Block(b)     => b.span,
            Stmt::Expr(e)      => e.span,
            Stmt::Empty(s)     => *s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub kind: DeclKind,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

/// Shared by function declarations, function expressions and class methods.
#[derive(Debug, Clone)]
pub struct Func {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    pub methods: Vec<Func>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub step: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(String, Span),
    /// Number, string or template literal. The text lives in the token
    /// stream; the value is never needed.
    Literal(Span),
    /// `[a, b]` — elements only, punctuation is reproduced from tokens.
    Array(Vec<Expr>, Span),
    /// `{k: v, w}` — property *value* expressions in source order
    /// (computed keys appear as their own entries).
    Object(Vec<Expr>, Span),

    /// `obj.prop`
    Member {
        object: Box<Expr>,
        property: String,
        span: Span,
    },

    /// `obj[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        span: Span,
    },

    /// `callee(args…)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },

    /// `new Callee(args…)`
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },

    /// Prefix: `!x`, `-x`, `typeof x`, `await x`, `++x`
    Unary {
        op: TokenKind,
        operand: Box<Expr>,
        span: Span,
    },

    /// Postfix `x++` / `x--`
    Postfix {
        operand: Box<Expr>,
        span: Span,
    },

    Binary {
        op: TokenKind,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },

    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        span: Span,
    },

    /// `target = value` (or a compound assignment operator)
    Assign {
        op: TokenKind,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },

    /// `function [name](params) { ... }`
    Func(Func),

    /// `(a, b) => body` or `a => body`
    Arrow {
        params: Vec<String>,
        body: ArrowBody,
        span: Span,
    },
}

#[derive(Debug, Clone)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(_, s)          => *s,
            Expr::Literal(s)           => *s,
            Expr::Array(_, s)          => *s,
            Expr::Object(_, s)         => *s,
            Expr::Member { span, .. }  => *span,
            Expr::Index { span, .. }   => *span,
            Expr::Call { span, .. }    => *span,
            Expr::New { span, .. }     => *span,
            Expr::Unary { span, .. }   => *span,
            Expr::Postfix { span, .. } => *span,
            Expr::Binary { span, .. }  => *span,
            Expr::Ternary { span, .. } => *span,
            Expr::Assign { span, .. }  => *span,
            Expr::Func(f)              => f.span,
            Expr::Arrow { span, .. }   => *span,
        }
    }
}

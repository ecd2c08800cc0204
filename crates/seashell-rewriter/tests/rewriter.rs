//! End-to-end rewriting through the session API.

use seashell_rewriter::syntax::{lexer::Lexer, parser::Parser};
use seashell_rewriter::Session;

fn rewrite(source: &str) -> String {
    Session::new().rewrite(source).expect("rewrite failed")
}

fn parses(source: &str) -> bool {
    Lexer::new(source)
        .tokenize()
        .map(|tokens| Parser::new(&tokens).parse().is_ok())
        .unwrap_or(false)
}

#[test]
fn terminal_cursor_call_is_awaited() {
    assert_eq!(
        rewrite("db.coll.find().toArray()"),
        "(await db.coll.find().toArray())"
    );
}

#[test]
fn bindings_persist_across_submissions() {
    let mut session = Session::new();
    session.rewrite("let items = db.inventory;").unwrap();
    assert_eq!(
        session.rewrite("items.findOne({sku: 'abc'})").unwrap(),
        "(await items.findOne({sku: 'abc'}))"
    );
}

#[test]
fn plain_code_round_trips_exactly() {
    let sources = [
        "let total = 0;",
        "for (let i = 0; i < 10; i++) { total = total + i; }",
        "const f = (a, b) => a + b; // sum\nf(1, 2)",
        "class Point { move(dx) { this.x = this.x + dx; } }",
    ];
    for source in sources {
        assert_eq!(rewrite(source), source);
    }
}

#[test]
fn rewritten_output_is_parseable() {
    let sources = [
        "db.coll.findOne()",
        "db.coll.find().sort({a: 1}).toArray()",
        "let n = db.coll.countDocuments({}) * 2;",
        "function f() { return db.coll.findOne(); }",
        "db.orders.aggregate([{a: 1}]).toArray()",
    ];
    for source in sources {
        let out = rewrite(source);
        assert!(parses(&out), "output of {source:?} did not parse: {out:?}");
    }
}

#[test]
fn each_deferred_call_is_wrapped_once() {
    let out = rewrite("db.a.drop(); db.b.drop()");
    assert_eq!(out, "(await db.a.drop()); (await db.b.drop())");
}

#[test]
fn fresh_sessions_do_not_share_bindings() {
    let mut first = Session::new();
    first.rewrite("c = db.coll").unwrap();
    let mut second = Session::new();
    assert_eq!(second.rewrite("c.findOne()").unwrap(), "c.findOne()");
}

#[test]
fn hard_syntax_errors_surface_as_errors() {
    let mut session = Session::new();
    let err = session.rewrite("let 1 = x").unwrap_err();
    // formatted with code and position for the shell's error report
    assert!(err.to_string().starts_with("[P001]"));
}

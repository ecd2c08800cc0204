use crate::analysis::{Rewriter, SymbolTable};
use crate::syntax::lexer::Lexer;
use crate::syntax::parser::Parser;
use crate::types::{SignatureRegistry, TypeDesc};

fn session_symbols() -> SymbolTable {
    let mut symbols = SymbolTable::new();
    symbols.add(seashell_api::ROOT_BINDING, SignatureRegistry::global().root_type());
    symbols
}

fn rewrite_with(src: &str, symbols: &mut SymbolTable) -> String {
    let tokens = Lexer::new(src).tokenize().expect("lex failed");
    let program = Parser::new(&tokens).parse().expect("parse failed");
    Rewriter::new(&tokens, SignatureRegistry::global(), symbols).rewrite_program(&program)
}

fn rewrite(src: &str) -> String {
    rewrite_with(src, &mut session_symbols())
}

#[test]
fn plain_code_is_untouched() {
    let src = "let x = 1 + 2; // note\nf(x)";
    assert_eq!(rewrite(src), src);
}

#[test]
fn deferred_call_is_wrapped() {
    assert_eq!(rewrite("db.coll.findOne()"), "(await db.coll.findOne())");
}

#[test]
fn builder_chain_wraps_only_the_terminal_call() {
    assert_eq!(
        rewrite("db.coll.find().toArray()"),
        "(await db.coll.find().toArray())"
    );
    // cursor builders alone stay untouched
    assert_eq!(rewrite("db.coll.find().limit(5)"), "db.coll.find().limit(5)");
}

#[test]
fn arguments_survive_the_wrap() {
    assert_eq!(
        rewrite("db.coll.findOne({a: 1}, opts)"),
        "(await db.coll.findOne({a: 1}, opts))"
    );
}

#[test]
fn comments_inside_a_wrapped_call_are_kept() {
    assert_eq!(
        rewrite("db.coll.findOne(/* all */ {})"),
        "(await db.coll.findOne(/* all */ {}))"
    );
}

#[test]
fn unrecognized_root_attribute_falls_back_to_collection() {
    assert_eq!(
        rewrite("db.movies.insertOne({})"),
        "(await db.movies.insertOne({}))"
    );
}

#[test]
fn value_attribute_is_not_a_call_target() {
    assert_eq!(rewrite("db.coll.name"), "db.coll.name");
}

#[test]
fn unknown_receiver_is_left_alone() {
    assert_eq!(rewrite("other.coll.findOne()"), "other.coll.findOne()");
}

#[test]
fn assignment_carries_the_type_across_statements() {
    let mut symbols = session_symbols();
    assert_eq!(rewrite_with("c = db.coll", &mut symbols), "c = db.coll");
    assert_eq!(rewrite_with("c.findOne()", &mut symbols), "(await c.findOne())");
}

#[test]
fn declaration_carries_the_type_across_statements() {
    let mut symbols = session_symbols();
    rewrite_with("const c = db.coll;", &mut symbols);
    assert_eq!(rewrite_with("c.findOne()", &mut symbols), "(await c.findOne())");
}

#[test]
fn chained_assignment_binds_both_names() {
    let mut symbols = session_symbols();
    rewrite_with("a = b = db.coll", &mut symbols);
    assert_eq!(symbols.lookup("a"), symbols.lookup("b"));
    assert!(!symbols.lookup("a").is_unknown());
}

#[test]
fn parameters_shadow_session_bindings() {
    // inside the body `db` is the parameter, not the connection root
    assert_eq!(
        rewrite("function f(db) { return db.coll.findOne(); }"),
        "function f(db) { return db.coll.findOne(); }"
    );
}

#[test]
fn deferred_calls_inside_function_bodies_are_wrapped() {
    assert_eq!(
        rewrite("function f() { return db.coll.findOne(); }"),
        "function f() { return (await db.coll.findOne()); }"
    );
}

#[test]
fn function_scope_bindings_do_not_leak() {
    let mut symbols = session_symbols();
    rewrite_with("function f() { let c = db.coll; }", &mut symbols);
    assert!(symbols.lookup("c").is_unknown());
}

#[test]
fn call_of_user_function_returning_collection_types_through() {
    let mut symbols = session_symbols();
    rewrite_with("function g() { return db.coll; }", &mut symbols);
    assert_eq!(rewrite_with("g().findOne()", &mut symbols), "(await g().findOne())");
    // the call to g itself is not wrapped
    assert_eq!(rewrite_with("g()", &mut symbols), "g()");
}

#[test]
fn function_type_is_bound_in_enclosing_scope() {
    let mut symbols = session_symbols();
    rewrite_with("function g() { return db.coll; }", &mut symbols);
    assert!(matches!(
        symbols.lookup("g"),
        TypeDesc::Function { returns_deferred: false, .. }
    ));
}

#[test]
fn arrow_callback_arguments_are_rewritten_in_place() {
    assert_eq!(
        rewrite("db.coll.find().forEach(d => print(d))"),
        "(await db.coll.find().forEach(d => print(d)))"
    );
}

#[test]
fn wrap_inside_larger_expressions() {
    assert_eq!(
        rewrite("let n = db.coll.countDocuments() + 1;"),
        "let n = (await db.coll.countDocuments()) + 1;"
    );
    assert_eq!(
        rewrite("if (db.coll.drop()) { x = 1 }"),
        "if ((await db.coll.drop())) { x = 1 }"
    );
}

#[test]
fn grouped_expressions_keep_their_parentheses() {
    assert_eq!(rewrite("(1 + 2) * 3"), "(1 + 2) * 3");
}

#[test]
fn plain_output_is_stable_under_rewrite() {
    let src = "for (let i = 0; i < 2; i++) { tally(i); }";
    let once = rewrite(src);
    assert_eq!(once, src);
    assert_eq!(rewrite(&once), once);
}

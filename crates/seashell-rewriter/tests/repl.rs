//! Evaluator-facing passes: continuation detection and top-level `await`.

use seashell_rewriter::syntax::{lexer::Lexer, parser::Parser};
use seashell_rewriter::{is_recoverable, process_top_level_await, runtime_support_code};

fn parses(source: &str) -> bool {
    Lexer::new(source)
        .tokenize()
        .map(|tokens| Parser::new(&tokens).parse().is_ok())
        .unwrap_or(false)
}

#[test]
fn multi_line_entry_grows_until_complete() {
    // the buffer a REPL would accumulate line by line
    let lines = ["function avg(xs) {", "  let t = 0;", "}"];
    let mut buffer = String::new();
    for (i, line) in lines.iter().enumerate() {
        buffer.push_str(line);
        let complete = i == lines.len() - 1;
        if complete {
            assert!(!is_recoverable(&buffer));
        } else {
            assert!(is_recoverable(&buffer), "expected continuation after {buffer:?}");
            buffer.push('\n');
        }
    }
}

#[test]
fn object_literal_entry_is_a_continuation() {
    assert!(is_recoverable("{ name: 'x',"));
}

#[test]
fn typo_fails_fast_instead_of_prompting() {
    assert!(!is_recoverable("db..coll"));
}

#[test]
fn top_level_await_wrapper_is_parseable() {
    let out = process_top_level_await("let v = await Promise.resolve(41); v + 1").unwrap();
    assert!(out.starts_with("(async () => {"));
    assert!(out.ends_with("})()"));
    assert!(parses(&out), "wrapper did not parse: {out:?}");
}

#[test]
fn wrapper_returns_the_final_expression() {
    let out = process_top_level_await("1 + await Promise.resolve(1)").unwrap();
    assert_eq!(out, "(async () => { return (1 + await Promise.resolve(1))\n})()");
}

#[test]
fn parenthesized_final_expression_stays_valid() {
    let out = process_top_level_await("await p; (1 + 2)").unwrap();
    assert!(parses(&out), "wrapper did not parse: {out:?}");
    assert!(out.contains("return ((1 + 2))"));
}

#[test]
fn var_loop_counter_persists_as_an_assignment() {
    let out = process_top_level_await("for (var i = 0; i < 2; i++) { await p; }").unwrap();
    assert!(parses(&out), "wrapper did not parse: {out:?}");
    assert!(out.contains("(i = 0)"));
    assert!(!out.contains("var"));
}

#[test]
fn redeclaration_across_submissions_is_safe() {
    // both submissions bind `a` by assignment, so the second wrapper cannot
    // hit an already-declared failure
    let first = process_top_level_await("const a = await p").unwrap();
    let second = process_top_level_await("const a = await q").unwrap();
    assert!(first.contains("(a = await p)"));
    assert!(second.contains("(a = await q)"));
    assert!(!first.contains("const"));
}

#[test]
fn no_await_and_top_level_return_both_decline() {
    assert_eq!(process_top_level_await("1 + 1"), None);
    assert_eq!(
        process_top_level_await("return 1; await Promise.resolve(1)"),
        None
    );
}

#[test]
fn support_code_parses_as_a_submission() {
    assert!(parses(runtime_support_code()));
}

//! Inference and rewriting over parsed programs.
//!
//! - [`symbols`] — scoped name-to-type bindings
//! - [`rewriter`] — the single-pass type-inferring rewriter

pub mod rewriter;
pub mod symbols;

pub use rewriter::Rewriter;
pub use symbols::SymbolTable;

#[cfg(test)]
mod tests;

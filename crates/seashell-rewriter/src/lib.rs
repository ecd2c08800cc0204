//! Automatic await-insertion for an interactive shell speaking a
//! promise-based scripting language.
//!
//! The shell's API is synchronous on the surface but asynchronous
//! underneath; this crate rewrites each submission so calls known to return
//! deferred values are awaited transparently.
//!
//! - [`syntax`] — lexer, token stream and recursive-descent parser
//! - [`types`] — type model and the frozen API signature catalogue
//! - [`analysis`] — symbol table and the type-inferring rewriter
//! - [`repl`] — continuation detection, top-level `await`, runtime support
//!
//! [`Session`] ties these together and persists inferred bindings across
//! submissions:
//!
//! ```
//! use seashell_rewriter::Session;
//!
//! let mut session = Session::new();
//! assert_eq!(
//!     session.rewrite("db.coll.findOne()").unwrap(),
//!     "(await db.coll.findOne())"
//! );
//! ```

pub mod analysis;
pub mod error;
pub mod repl;
pub mod syntax;
pub mod types;

pub use analysis::{Rewriter, SymbolTable};
pub use error::{Error, ErrorCode};
pub use repl::{is_recoverable, process_top_level_await, runtime_support_code};
pub use types::{SignatureRegistry, TypeDesc};

use syntax::lexer::Lexer;
use syntax::parser::Parser;

/// One interactive session. Holds the symbol table whose outermost scope
/// carries inferred bindings from submission to submission, seeded with the
/// connection root binding.
pub struct Session {
    symbols: SymbolTable,
}

impl Session {
    pub fn new() -> Self {
        let mut symbols = SymbolTable::new();
        symbols.add(
            seashell_api::ROOT_BINDING,
            SignatureRegistry::global().root_type(),
        );
        Session { symbols }
    }

    /// Rewrites one submission, wrapping deferred-returning calls in
    /// `(await …)` and recording any bindings it introduces.
    pub fn rewrite(&mut self, source: &str) -> Result<String, Error> {
        let tokens = Lexer::new(source).tokenize()?;
        let program = Parser::new(&tokens).parse()?;
        let mut rewriter =
            Rewriter::new(&tokens, SignatureRegistry::global(), &mut self.symbols);
        Ok(rewriter.rewrite_program(&program))
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

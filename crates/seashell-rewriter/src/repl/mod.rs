//! Interactive-evaluator concerns that sit outside the main rewrite:
//! continuation detection, top-level `await` wrapping and the one-time
//! runtime support snippet.

pub mod recover;
pub mod support;
pub mod top_level_await;

pub use recover::is_recoverable;
pub use support::runtime_support_code;
pub use top_level_await::process_top_level_await;

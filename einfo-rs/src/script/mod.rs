//! Display scripting language.
//!
//! Scripts are tab- or newline-separated tokens run against a bounded value
//! stack:
//!
//! - Literals: `"text"` (with `\n`, `\t`, `\xNN`, `\uNNNN` escapes) and
//!   anything starting with a digit or `-`
//! - `name { body }` defines a function; a later definition shadows an
//!   earlier one
//! - `cond ? then : else ;` with nesting
//! - `return` leaves the current body
//! - Builtins for stack shuffling, integer arithmetic, string slicing,
//!   JSON lookup, screen output and host queries (see [`builtins`])
//!
//! # Quick start
//!
//! ```rust
//! use einfo::fetch::CacheFetcher;
//! use einfo::script::{Interpreter, RunContext};
//!
//! let mut interp = Interpreter::new(RunContext::default(), Box::new(CacheFetcher::new(".")));
//! interp.run("\"sq\"\t{\tdup\tmul\t}\t6\tsq");
//! assert_eq!(interp.stack().peek(0).map(|v| v.as_bytes()), Some(&b"36"[..]));
//! ```

pub mod builtins;
pub mod clause;
pub mod context;
pub mod funcs;
pub mod interp;
pub mod json;
pub mod stack;
pub mod token;
pub mod unescape;
pub mod value;

// Re-exports for convenience.
pub use context::RunContext;
pub use interp::Interpreter;
pub use stack::Stack;
pub use value::Value;

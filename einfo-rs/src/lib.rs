//! Script engine and host glue for a battery-powered e-paper information
//! display.
//!
//! Once per wake cycle the host builds a [`script::RunContext`] from the clock
//! and battery, runs the user's script through [`script::Interpreter`], then
//! hands the resulting [`screen::ScreenBuffer`] to the panel driver and the
//! computed sleep duration to the power scheduler.
//!
//! ```rust
//! use einfo::fetch::CacheFetcher;
//! use einfo::script::{Interpreter, RunContext};
//!
//! let mut interp = Interpreter::new(RunContext::default(), Box::new(CacheFetcher::new(".")));
//! interp.run("\"Hi\"\t0\t0\t0\tprint");
//! assert_eq!(interp.screen().row_text(0), "Hi");
//! ```

pub mod attr;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod screen;
pub mod script;
pub mod terminal;

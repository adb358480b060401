//! Script interpreter.
//!
//! The [`Interpreter`] owns the value stack, the function table and the
//! screen buffer for one wake cycle.  Scripts are executed directly from
//! their token stream: there is no parse tree.  Conditional branches and
//! function bodies are captured as tab-joined token text and executed by a
//! recursive call to [`Interpreter::exec`].
//!
//! Nothing a script does is fatal.  Malformed input degrades to empty values
//! and `tracing` warnings.

use crate::config::MAX_CALL_DEPTH;
use crate::fetch::Fetch;
use crate::screen::ScreenBuffer;

use super::{
    builtins::Builtin,
    clause::Conditional,
    context::RunContext,
    funcs::{Defined, FunctionTable},
    stack::Stack,
    token::Tokenizer,
    unescape::unescape,
    value::Value,
};

/// What the dispatch loop does after one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// `return`: stop the current body.
    Return,
}

/// Interpreter state for one wake cycle.
pub struct Interpreter {
    pub(super) ctx: RunContext,
    pub(super) stack: Stack,
    pub(super) funcs: FunctionTable,
    pub(super) screen: ScreenBuffer,
    pub(super) fetcher: Box<dyn Fetch>,
    depth: usize,
}

impl Interpreter {
    pub fn new(ctx: RunContext, fetcher: Box<dyn Fetch>) -> Self {
        Self {
            ctx,
            stack: Stack::new(),
            funcs: FunctionTable::new(),
            screen: ScreenBuffer::new(),
            fetcher,
            depth: 0,
        }
    }

    /// Execute a complete script.
    ///
    /// State carries over between calls; use [`Interpreter::reset`] to start
    /// a fresh cycle.
    pub fn run(&mut self, src: &str) {
        self.exec(src);
    }

    /// Start a new wake cycle: empty stack, functions and screen.
    pub fn reset(&mut self, ctx: RunContext) {
        self.ctx = ctx;
        self.stack.clear();
        self.funcs.clear();
        self.screen.clear();
        self.depth = 0;
    }

    pub fn screen(&self) -> &ScreenBuffer {
        &self.screen
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Remove and return the stack contents, bottom first.
    pub fn take_stack(&mut self) -> Vec<Value> {
        self.stack.drain()
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.funcs
    }

    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// Deep-sleep duration requested by the script, or the default.
    pub fn sleep_time_us(&self) -> u64 {
        self.ctx.sleep_time_us
    }

    /// Execute one body.  Bodies nested deeper than [`MAX_CALL_DEPTH`] are
    /// skipped.
    pub(super) fn exec(&mut self, src: &str) {
        if self.depth >= MAX_CALL_DEPTH {
            tracing::warn!(depth = self.depth, "call depth exceeded; body skipped");
            return;
        }
        self.depth += 1;
        let mut tokens = Tokenizer::new(src);
        while let Some(token) = tokens.next() {
            if self.step(token, &mut tokens) == Flow::Return {
                break;
            }
        }
        self.depth -= 1;
    }

    /// Dispatch one token.  `tokens` is the enclosing stream, consumed
    /// further by definitions and conditionals.
    fn step(&mut self, token: &str, tokens: &mut Tokenizer<'_>) -> Flow {
        let bytes = token.as_bytes();
        match bytes[0] {
            b'#' => return Flow::Continue,
            b'"' if bytes.len() >= 2 => {
                self.stack.push(unescape(&bytes[1..bytes.len() - 1]));
                return Flow::Continue;
            }
            b'0'..=b'9' | b'-' => {
                self.stack.push(token);
                return Flow::Continue;
            }
            _ => {}
        }

        match token {
            "{" if !self.stack.is_empty() => self.define(tokens),
            "?" if !self.stack.is_empty() => self.conditional(tokens),
            "return" => return Flow::Return,
            _ => match Builtin::from_name(token) {
                Some(b) if self.stack.len() >= b.arity() => self.call_builtin(b),
                _ => self.call_function(token),
            },
        }
        Flow::Continue
    }

    /// `name { body }`: the name is on the stack, the body follows in the
    /// stream up to the first `}`.
    fn define(&mut self, tokens: &mut Tokenizer<'_>) {
        let name = self.stack.pop().into_string();
        let mut body = String::new();
        for token in tokens.by_ref() {
            if token == "}" {
                break;
            }
            body.push_str(token);
            body.push('\t');
        }
        match self.funcs.define(name.as_str(), body) {
            Defined::Added => tracing::debug!(name = %name, "function defined"),
            Defined::Replaced => tracing::debug!(name = %name, "function table full; replaced previous definition"),
            Defined::Dropped => tracing::warn!(name = %name, "function table full; definition dropped"),
        }
    }

    fn conditional(&mut self, tokens: &mut Tokenizer<'_>) {
        let cond = self.stack.pop().as_int() != 0;
        let branches = Conditional::parse(tokens);
        if let Some(body) = branches.select(cond) {
            self.exec(body);
        }
    }

    fn call_function(&mut self, name: &str) {
        let Some(def) = self.funcs.lookup(name) else {
            tracing::warn!(token = name, "invalid token");
            return;
        };
        let body = def.body.clone();
        self.exec(&body);
    }
}

impl std::fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("ctx", &self.ctx)
            .field("stack", &self.stack)
            .field("functions", &self.funcs.len())
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Bounded value stack.
//!
//! The stack never fails: a push onto a full stack is dropped and a pop from
//! an empty one yields an empty value.  Builtins check [`Stack::len`] before
//! consuming operands.

use super::value::Value;
use crate::config::STACK_CAPACITY;

/// Fixed-capacity LIFO of [`Value`]s with depth-indexed access (0 = top).
#[derive(Debug, Clone)]
pub struct Stack {
    capacity: usize,
    vec: Vec<Value>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        Self::with_capacity(STACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, vec: Vec::with_capacity(capacity) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.vec.len() >= self.capacity
    }

    /// Push a value; silently dropped when the stack is full.
    pub fn push(&mut self, v: impl Into<Value>) {
        if !self.is_full() {
            self.vec.push(v.into());
        }
    }

    /// Pop the top value, or an empty value on underflow.
    pub fn pop(&mut self) -> Value {
        self.vec.pop().unwrap_or_default()
    }

    /// Value at depth `n`, if present.
    pub fn peek(&self, n: usize) -> Option<&Value> {
        let idx = self.vec.len().checked_sub(n)?.checked_sub(1)?;
        self.vec.get(idx)
    }

    /// Overwrite the value at depth `n`.  Returns `false` when out of range.
    pub fn poke(&mut self, n: usize, v: Value) -> bool {
        match self.vec.len().checked_sub(n).and_then(|i| i.checked_sub(1)) {
            Some(idx) => {
                self.vec[idx] = v;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.vec.clear();
    }

    /// Values from bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Value> {
        self.vec.iter()
    }

    /// Remove every value, returning them bottom to top.
    pub fn drain(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.vec)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! User function table.
//!
//! Definitions are appended in order and looked up from the end, so a later
//! definition shadows an earlier one with the same name.  Bodies are stored as
//! raw token text and re-tokenized on every call.

use crate::config::FUNCTION_CAPACITY;

/// One `name { body }` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub body: String,
}

/// Result of [`FunctionTable::define`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defined {
    /// Stored in a new slot.
    Added,
    /// Table full; replaced the latest definition with the same name.
    Replaced,
    /// Table full and no definition to replace; discarded.
    Dropped,
}

/// Fixed-capacity, most-recent-wins function table.
#[derive(Debug, Clone)]
pub struct FunctionTable {
    capacity: usize,
    defs: Vec<FunctionDef>,
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::with_capacity(FUNCTION_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, defs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Register a definition.  Never grows past the capacity.
    pub fn define(&mut self, name: impl Into<String>, body: impl Into<String>) -> Defined {
        let def = FunctionDef { name: name.into(), body: body.into() };
        if self.defs.len() < self.capacity {
            self.defs.push(def);
            return Defined::Added;
        }
        match self.defs.iter_mut().rev().find(|d| d.name == def.name) {
            Some(slot) => {
                *slot = def;
                Defined::Replaced
            }
            None => Defined::Dropped,
        }
    }

    /// Latest definition named `name`.
    pub fn lookup(&self, name: &str) -> Option<&FunctionDef> {
        self.defs.iter().rev().find(|d| d.name == name)
    }

    pub fn clear(&mut self) {
        self.defs.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

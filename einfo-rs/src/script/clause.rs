//! Conditional branch capture.
//!
//! Grammar: `cond ? true-clause ;` or `cond ? true-clause : false-clause ;`.
//! Branches may contain nested conditionals; the nesting counter makes sure
//! only a `:` or `;` belonging to the outermost `?` ends a clause.

use super::token::Tokenizer;

/// How a clause was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseEnd {
    /// `:` at depth 0: a false branch follows.
    Else,
    /// `;` at depth 0, or end of input: the conditional is complete.
    Done,
}

/// Consume one clause from `tokens`, returning its tab-joined body.
pub fn parse_clause(tokens: &mut Tokenizer<'_>) -> (String, ClauseEnd) {
    let mut body = String::new();
    let mut nest = 0usize;
    for token in tokens.by_ref() {
        match token {
            "?" => nest += 1,
            ":" if nest == 0 => return (body, ClauseEnd::Else),
            ";" if nest == 0 => return (body, ClauseEnd::Done),
            ";" => nest -= 1,
            _ => {}
        }
        body.push_str(token);
        body.push('\t');
    }
    (body, ClauseEnd::Done)
}

/// The captured branches of one conditional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditional {
    pub then_body: String,
    pub else_body: Option<String>,
}

impl Conditional {
    /// Consume both clauses following a `?`.
    pub fn parse(tokens: &mut Tokenizer<'_>) -> Self {
        let (then_body, end) = parse_clause(tokens);
        let else_body = match end {
            ClauseEnd::Else => Some(parse_clause(tokens).0),
            ClauseEnd::Done => None,
        };
        Self { then_body, else_body }
    }

    /// The branch to run for a condition.
    pub fn select(&self, cond: bool) -> Option<&str> {
        if cond {
            Some(&self.then_body)
        } else {
            self.else_body.as_deref()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

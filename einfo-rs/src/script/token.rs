//! Script tokenizer.
//!
//! A token is a maximal run of text without tab, newline or carriage return.
//! Spaces belong to the token, so `"Hello world"` is one string literal.
//! Runs of delimiters never produce empty tokens.

/// Returns `true` for the three token delimiters.
pub fn is_delimiter(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\r')
}

/// Zero-copy iterator over the tokens of a script body.
///
/// The cursor only moves forward; the clause parser and function-definition
/// capture share one `Tokenizer` with the dispatch loop so that tokens they
/// consume are not executed again.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed remainder of the source.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            let end = bytes[start..]
                .iter()
                .position(|&b| is_delimiter(b))
                .map_or(bytes.len(), |i| start + i);
            // step over the delimiter (if any)
            self.pos = (end + 1).min(bytes.len());
            if end > start {
                return Some(&self.src[start..end]);
            }
        }
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Zero-copy JSON navigator.
//!
//! Scripts usually pull one or two fields out of a small weather or calendar
//! payload, so no tree is built: each lookup rescans the text and returns a
//! slice of the input buffer.  Lookups cost O(document size).
//!
//! Malformed input never panics; it classifies as [`JsonType::Error`] or makes
//! a lookup return `None`.

use super::unescape::unescape;

/// Deepest container nesting the scanner follows.
pub const MAX_NESTING: usize = 128;

/// Classification of the value at the start of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Number,
    /// `true`, `false` or `null`.
    Boolean,
    Object,
    Array,
    Error,
}

/// A read-only view of one JSON value.
#[derive(Debug, Clone, Copy)]
pub struct Json<'a> {
    data: &'a [u8],
    start: usize,
    kind: JsonType,
}

impl<'a> Json<'a> {
    pub fn new<T: AsRef<[u8]> + ?Sized>(data: &'a T) -> Self {
        let data = data.as_ref();
        let start = skip_whitespace(data, 0);
        let rest = &data[start..];
        let kind = match rest.first() {
            Some(b'"') => JsonType::String,
            Some(b'0'..=b'9' | b'.' | b'-') => JsonType::Number,
            Some(b'{') => JsonType::Object,
            Some(b'[') => JsonType::Array,
            _ if rest.starts_with(b"null") || rest.starts_with(b"true") || rest.starts_with(b"fals") => {
                JsonType::Boolean
            }
            _ => JsonType::Error,
        };
        Self { data, start, kind }
    }

    pub fn kind(&self) -> JsonType {
        self.kind
    }

    /// Scalar bytes: strings are unescaped, numbers and booleans are returned
    /// verbatim, containers and errors yield an empty string.
    pub fn value(&self) -> Vec<u8> {
        let end = skip(self.data, self.start);
        match self.kind {
            JsonType::String => {
                // strip the quotes; an unterminated string loses its last byte
                let inner = self.data.get(self.start + 1..end.saturating_sub(1));
                inner.map(unescape).unwrap_or_default()
            }
            JsonType::Number | JsonType::Boolean => {
                self.data.get(self.start..end).unwrap_or_default().to_vec()
            }
            _ => Vec::new(),
        }
    }

    /// Raw text of the `index`th element of an array.
    pub fn index(&self, index: usize) -> Option<&'a [u8]> {
        if self.kind != JsonType::Array {
            return None;
        }
        let bytes = self.data;
        let mut pos = self.start + 1;
        let mut remaining = index;
        loop {
            let begin = skip_whitespace(bytes, pos);
            if matches!(bytes.get(begin), None | Some(b']')) {
                return None;
            }
            let end = skip(bytes, begin);
            if end >= bytes.len() {
                return None;
            }
            if remaining == 0 {
                return self.data.get(begin..end);
            }
            remaining -= 1;
            pos = skip_whitespace(bytes, end);
            if bytes.get(pos) != Some(&b',') {
                return None;
            }
            pos += 1;
        }
    }

    /// Raw text of the value stored under `key` in an object.
    pub fn field(&self, key: &[u8]) -> Option<&'a [u8]> {
        if self.kind != JsonType::Object {
            return None;
        }
        let bytes = self.data;
        let mut pos = self.start + 1;
        loop {
            let key_begin = skip_whitespace(bytes, pos);
            if bytes.get(key_begin) != Some(&b'"') {
                return None;
            }
            let key_end = skip(bytes, key_begin);
            pos = skip_whitespace(bytes, key_end);
            if bytes.get(pos) != Some(&b':') {
                return None;
            }
            let val_begin = skip_whitespace(bytes, pos + 1);
            let val_end = skip(bytes, val_begin);
            if val_end >= bytes.len() {
                return None;
            }
            let name = bytes.get(key_begin + 1..key_end - 1).map(unescape);
            if name.as_deref() == Some(key) {
                return self.data.get(val_begin..val_end);
            }
            pos = skip_whitespace(bytes, val_end);
            if bytes.get(pos) != Some(&b',') {
                return None;
            }
            pos += 1;
        }
    }
}

// ── Scanning ──────────────────────────────────────────────────────────────────

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b' ' | b'\t' | b'\r' | b'\n')) {
        pos += 1;
    }
    pos
}

/// Offset just past the value starting at `pos`.
///
/// Strings honour `\` escapes; arrays and objects are skipped recursively so
/// nested commas and colons are ignored.  The result never exceeds
/// `bytes.len()`.  Containers nested deeper than [`MAX_NESTING`] are treated
/// as running to the end of the buffer.
pub fn skip(bytes: &[u8], pos: usize) -> usize {
    skip_nested(bytes, pos, 0)
}

fn skip_nested(bytes: &[u8], pos: usize, depth: usize) -> usize {
    let len = bytes.len();
    let Some(&c) = bytes.get(pos) else { return len };
    if depth > MAX_NESTING && matches!(c, b'[' | b'{') {
        return len;
    }
    let mut pos = pos + 1;
    let end = match c {
        b'"' => {
            while pos < len {
                match bytes[pos] {
                    b'"' => return pos + 1,
                    b'\\' => pos += 2,
                    _ => pos += 1,
                }
            }
            len
        }
        b'[' => {
            while pos < len {
                pos = skip_whitespace(bytes, pos);
                match bytes.get(pos) {
                    None => break,
                    Some(b']') => return pos + 1,
                    Some(b',') => pos += 1,
                    Some(_) => pos = skip_nested(bytes, pos, depth + 1),
                }
            }
            len
        }
        b'{' => {
            while pos < len {
                pos = skip_whitespace(bytes, pos);
                match bytes.get(pos) {
                    None => break,
                    Some(b'}') => return pos + 1,
                    Some(b',') => pos += 1,
                    Some(_) => {
                        pos = skip_whitespace(bytes, skip_nested(bytes, pos, depth + 1));
                        if bytes.get(pos) == Some(&b':') {
                            pos += 1;
                        }
                        pos = skip_nested(bytes, skip_whitespace(bytes, pos), depth + 1);
                    }
                }
            }
            len
        }
        _ => {
            while let Some(&d) = bytes.get(pos) {
                if !(d.is_ascii_alphanumeric() || matches!(d, b'.' | b'-' | b'+')) {
                    break;
                }
                pos += 1;
            }
            pos
        }
    };
    end.min(len)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

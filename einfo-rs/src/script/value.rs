//! Runtime value type for the display script language.
//!
//! Every value is a byte string.  Text is usually UTF-8, but `\xHH` escapes
//! can place any byte in a value and the display grid holds one byte per
//! cell, so nothing here assumes valid UTF-8.  Integers and booleans are only
//! ever decimal strings; builtins parse them on demand and format the result
//! back.  Text with no numeric prefix parses as zero.

use std::borrow::Cow;
use std::fmt;

/// A script runtime value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Value(Vec<u8>);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value(b.to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value(s.into_bytes())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.as_bytes().to_vec())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value(n.to_string().into_bytes())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value(if b { b"1".to_vec() } else { b"0".to_vec() })
    }
}

impl Value {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// The value as text; invalid UTF-8 becomes U+FFFD.
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn into_string(self) -> String {
        match String::from_utf8(self.0) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Logical truth for `and` / `or`: only the exact text `"0"` is false.
    pub fn as_bool(&self) -> bool {
        self.0 != b"0"
    }

    /// Leading integer of the text (`"12abc"` → 12, `"abc"` → 0).
    pub fn as_int(&self) -> i64 {
        parse_int_prefix(&self.0)
    }

    /// Leading decimal number of the text (`"3.5V"` → 3.5, `"x"` → 0.0).
    pub fn as_float(&self) -> f64 {
        parse_float_prefix(&self.0)
    }
}

// ── Numeric prefix parsing ────────────────────────────────────────────────────

/// Byte length of an optional sign followed by ASCII digits.
fn signed_digits(b: &[u8]) -> (usize, usize) {
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let start = i;
    while b.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    (i, i - start)
}

fn trim_start(b: &[u8]) -> &[u8] {
    let n = b.iter().take_while(|c| c.is_ascii_whitespace()).count();
    &b[n..]
}

/// `b` is known to be ASCII here.
fn ascii(b: &[u8]) -> &str {
    std::str::from_utf8(b).unwrap_or_default()
}

fn parse_int_prefix(b: &[u8]) -> i64 {
    let b = trim_start(b);
    let (len, digits) = signed_digits(b);
    if digits == 0 {
        return 0;
    }
    let text = ascii(&b[..len]);
    text.parse::<i64>().unwrap_or_else(|_| {
        // Too many digits for i64: saturate in the direction of the sign.
        if text.starts_with('-') { i64::MIN } else { i64::MAX }
    })
}

fn parse_float_prefix(b: &[u8]) -> f64 {
    let b = trim_start(b);
    let (mut end, int_digits) = signed_digits(b);
    let mut frac_digits = 0;
    if b.get(end) == Some(&b'.') {
        let mut j = end + 1;
        while b.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        frac_digits = j - end - 1;
        if int_digits + frac_digits > 0 {
            end = j;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let (exp_len, exp_digits) = signed_digits(&b[end + 1..]);
        if exp_digits > 0 {
            end += 1 + exp_len;
        }
    }
    ascii(&b[..end]).parse().unwrap_or(0.0)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

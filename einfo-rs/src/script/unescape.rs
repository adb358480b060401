//! Backslash unescaping for string literals and JSON strings.
//!
//! | Escape | Result |
//! |--------|--------|
//! | `\b` `\f` `\n` `\r` `\t` | the control character |
//! | `\xHH` | one raw byte |
//! | `\uXXXX` | the code point, UTF-8 encoded |
//! | `\X` (anything else) | `X` |
//!
//! Output is capped at [`UNESCAPE_CAPACITY`] bytes; escapes that would not
//! fit are discarded.  The result is a byte string: `\xE2\x84\x83` spells
//! `℃`, and a stray `\xFF` stays a single `0xFF` byte.

use crate::config::UNESCAPE_CAPACITY;

/// Unescape `src` with the default output bound.
pub fn unescape(src: &[u8]) -> Vec<u8> {
    unescape_bounded(src, UNESCAPE_CAPACITY)
}

/// Unescape `src`, producing at most `limit` bytes.
pub fn unescape_bounded(src: &[u8], limit: usize) -> Vec<u8> {
    let mut out = Bounded { buf: Vec::with_capacity(src.len().min(limit)), limit };
    let mut i = 0;

    while i < src.len() && !out.is_full() {
        let c = src[i];
        i += 1;
        if c != b'\\' || i >= src.len() {
            out.push(&[c]);
            continue;
        }

        let d = src[i];
        i += 1;
        match d {
            b'x' if i + 2 <= src.len() => {
                out.push(&[hex_value(&src[i..i + 2]) as u8]);
                i += 2;
            }
            b'u' if i + 4 <= src.len() => {
                let cp = hex_value(&src[i..i + 4]);
                i += 4;
                let ch = char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER);
                let mut tmp = [0u8; 4];
                out.push(ch.encode_utf8(&mut tmp).as_bytes());
            }
            b'b' => out.push(b"\x08"),
            b'f' => out.push(b"\x0c"),
            b'n' => out.push(b"\n"),
            b'r' => out.push(b"\r"),
            b't' => out.push(b"\t"),
            other => out.push(&[other]),
        }
    }

    out.buf
}

/// Parse hex digits; a non-hex digit counts as zero.
fn hex_value(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0, |acc, &b| (acc << 4) | (b as char).to_digit(16).unwrap_or(0))
}

/// Byte buffer that refuses writes past its limit.
struct Bounded {
    buf: Vec<u8>,
    limit: usize,
}

impl Bounded {
    fn is_full(&self) -> bool {
        self.buf.len() >= self.limit
    }

    /// Append `bytes` whole, or not at all.
    fn push(&mut self, bytes: &[u8]) {
        if self.buf.len() + bytes.len() <= self.limit {
            self.buf.extend_from_slice(bytes);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> String {
        String::from_utf8(unescape(s.as_bytes())).unwrap()
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(u("hello, world"), "hello, world");
        assert_eq!(u(""), "");
    }

    #[test]
    fn control_escapes() {
        assert_eq!(u(r"a\nb"), "a\nb");
        assert_eq!(u(r"\t\r\b\f"), "\t\r\x08\x0c");
    }

    #[test]
    fn hex_byte() {
        assert_eq!(u(r"\x41"), "A");
        assert_eq!(u(r"\x4a\x4A"), "JJ");
    }

    #[test]
    fn hex_bytes_forming_utf8() {
        assert_eq!(u(r"\xe2\x84\x83"), "℃");
    }

    #[test]
    fn high_hex_byte_stays_one_byte() {
        assert_eq!(unescape(br"a\xffb"), [b'a', 0xff, b'b']);
        assert_eq!(unescape(br"\x80"), [0x80]);
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(unescape(br"\u00e9"), [0xc3, 0xa9]);
        assert_eq!(u(r"\u0041"), "A");
        assert_eq!(u(r"\u5929\u6c17"), "天気");
        assert_eq!(u(r"\u00E9"), "é");
    }

    #[test]
    fn surrogate_becomes_replacement() {
        assert_eq!(u(r"\ud800"), "\u{fffd}");
    }

    #[test]
    fn other_escapes_are_literal() {
        assert_eq!(u(r#"\"q\""#), "\"q\"");
        assert_eq!(u(r"\\"), "\\");
        assert_eq!(u(r"\/"), "/");
    }

    #[test]
    fn short_escapes_fall_back_to_letter() {
        assert_eq!(u(r"\x4"), "x4");
        assert_eq!(u(r"\u12"), "u12");
    }

    #[test]
    fn trailing_backslash_kept() {
        assert_eq!(u(r"abc\"), "abc\\");
    }

    #[test]
    fn output_is_bounded() {
        let long = "a".repeat(5000);
        assert_eq!(u(&long).len(), UNESCAPE_CAPACITY);
        assert_eq!(unescape_bounded(b"abcdef", 3), b"abc");
        let raw = r"\xff".repeat(2000);
        assert_eq!(unescape(raw.as_bytes()).len(), UNESCAPE_CAPACITY);
    }

    #[test]
    fn multibyte_escape_not_split_at_bound() {
        // "ab" fills 2 of 3 bytes; é needs 2 more and is dropped whole.
        assert_eq!(unescape_bounded(br"ab\u00e9", 3), b"ab");
    }
}

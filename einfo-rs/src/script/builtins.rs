//! Built-in words.
//!
//! A builtin runs only when the stack holds at least [`Builtin::arity`]
//! values; otherwise the token falls through to user-function lookup.
//! Operands are popped top first, so the first operand listed in each doc
//! comment is the deepest.
//!
//! String words work on bytes, not characters: `length` is the number of
//! grid cells `print` will fill, and `substr`/`find` offsets line up with it.
//! The string helpers are free functions so they can be tested without an
//! interpreter.

use crate::attr::Attr;

use super::{interp::Interpreter, json::{Json, JsonType}, value::Value};

/// Widest `format` result; larger widths are clamped.
const MAX_FORMAT_WIDTH: usize = 256;
/// Most decimals `format` will render.
const MAX_FORMAT_DECIMALS: usize = 32;

const MINUTES_PER_DAY: i64 = 24 * 60;
const MICROS_PER_MINUTE: u64 = 60_000_000;

/// Every builtin word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Dup,
    Drop,
    Swap,
    Read,
    Write,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Length,
    Concat,
    Substr,
    Find,
    Rfind,
    Replace,
    Format,
    Extract,
    Lookup,
    Print,
    Wget,
    Date,
    Battery,
    Wakeup,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        use Builtin::*;
        Some(match name {
            "dup" => Dup,
            "drop" => Drop,
            "swap" => Swap,
            "read" => Read,
            "write" => Write,
            "add" => Add,
            "sub" => Sub,
            "mul" => Mul,
            "div" => Div,
            "mod" => Mod,
            "and" => And,
            "or" => Or,
            "lt" => Lt,
            "le" => Le,
            "gt" => Gt,
            "ge" => Ge,
            "eq" => Eq,
            "ne" => Ne,
            "length" => Length,
            "concat" => Concat,
            "substr" => Substr,
            "find" => Find,
            "rfind" => Rfind,
            "replace" => Replace,
            "format" => Format,
            "extract" => Extract,
            "lookup" => Lookup,
            "print" => Print,
            "wget" => Wget,
            "date" => Date,
            "battery" => Battery,
            "wakeup" => Wakeup,
            _ => return None,
        })
    }

    /// Values that must be on the stack for the word to run.
    pub fn arity(self) -> usize {
        use Builtin::*;
        match self {
            Date | Battery => 0,
            Dup | Drop | Read | Length | Wget => 1,
            Swap | Write | Add | Sub | Mul | Div | Mod | And | Or | Lt | Le | Gt | Ge | Eq | Ne
            | Concat | Find | Rfind | Lookup | Wakeup => 2,
            Substr | Replace | Extract => 3,
            Format | Print => 4,
        }
    }
}

impl Interpreter {
    /// Run `b`.  The caller has checked the arity.
    pub(super) fn call_builtin(&mut self, b: Builtin) {
        use Builtin::*;
        let st = &mut self.stack;
        match b {
            Dup => {
                let v = st.pop();
                st.push(v.clone());
                st.push(v);
            }
            Drop => {
                st.pop();
            }
            Swap => {
                let y = st.pop();
                let x = st.pop();
                st.push(y);
                st.push(x);
            }
            // index
            Read => {
                let n = st.pop().as_int();
                let v = usize::try_from(n).ok().and_then(|n| st.peek(n)).cloned().unwrap_or_default();
                st.push(v);
            }
            // value, index
            Write => {
                let n = st.pop().as_int();
                let v = st.pop();
                if let Ok(n) = usize::try_from(n) {
                    st.poke(n, v);
                }
            }
            Add | Sub | Mul | Div | Mod => {
                let y = st.pop().as_int();
                let x = st.pop().as_int();
                st.push(arith(b, x, y));
            }
            And | Or => {
                let y = st.pop().as_bool();
                let x = st.pop().as_bool();
                st.push(if b == And { x && y } else { x || y });
            }
            Lt | Le | Gt | Ge | Eq | Ne => {
                let y = st.pop().as_int();
                let x = st.pop().as_int();
                let r = match b {
                    Lt => x < y,
                    Le => x <= y,
                    Gt => x > y,
                    Ge => x >= y,
                    Eq => x == y,
                    _ => x != y,
                };
                st.push(r);
            }
            Length => {
                let n = st.pop().len();
                st.push(n as i64);
            }
            Concat => {
                let y = st.pop();
                let mut x = st.pop().into_bytes();
                x.extend_from_slice(y.as_bytes());
                st.push(x);
            }
            // str, start, len
            Substr => {
                let len = st.pop().as_int();
                let start = st.pop().as_int();
                let s = st.pop();
                st.push(substr(s.as_bytes(), start, len));
            }
            // str, sub
            Find | Rfind => {
                let sub = st.pop();
                let s = st.pop();
                st.push(find(s.as_bytes(), sub.as_bytes(), b == Rfind));
            }
            // str, before, after
            Replace => {
                let after = st.pop();
                let before = st.pop();
                let s = st.pop();
                st.push(replace(s.as_bytes(), before.as_bytes(), after.as_bytes()));
            }
            // num, sign, width, decimals
            Format => {
                let decimals = st.pop().as_int();
                let width = st.pop().as_int();
                let sign = st.pop().as_int() != 0;
                let num = st.pop().as_float();
                st.push(format_number(num, sign, width, decimals));
            }
            // str, prefix, suffix
            Extract => {
                let suffix = st.pop();
                let prefix = st.pop();
                let s = st.pop();
                st.push(extract(s.as_bytes(), prefix.as_bytes(), suffix.as_bytes()));
            }
            // json, key
            Lookup => {
                let key = st.pop();
                let doc = st.pop();
                st.push(lookup(doc.as_bytes(), &key));
            }
            // str, attr, x, y
            Print => {
                let y = st.pop().as_int();
                let x = st.pop().as_int();
                let attr = Attr::from_script(st.pop().as_int());
                let s = st.pop();
                self.screen.print(s.as_bytes(), attr, x, y);
            }
            Wget => {
                let url = st.pop();
                let body = match self.fetcher.fetch(&url.to_str_lossy()) {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "wget failed");
                        String::new()
                    }
                };
                st.push(body);
            }
            Date => {
                let ctx = &self.ctx;
                st.push(i64::from(ctx.weekday));
                st.push(i64::from(ctx.day));
                st.push(i64::from(ctx.month));
                st.push(i64::from(ctx.year));
            }
            Battery => {
                st.push(format!("{:.2}", self.ctx.battery));
            }
            // hour, min
            Wakeup => {
                let minute = st.pop().as_int();
                let hour = st.pop().as_int();
                let minutes = minutes_until(self.ctx.minute_of_day(), hour, minute);
                self.ctx.sleep_time_us = minutes as u64 * MICROS_PER_MINUTE;
                tracing::debug!(minutes, "wakeup scheduled");
            }
        }
    }
}

fn arith(op: Builtin, x: i64, y: i64) -> i64 {
    match op {
        Builtin::Add => x.wrapping_add(y),
        Builtin::Sub => x.wrapping_sub(y),
        Builtin::Mul => x.wrapping_mul(y),
        Builtin::Div if y == 0 => 0,
        Builtin::Div => x.wrapping_div(y),
        Builtin::Mod if y == 0 => 0,
        Builtin::Mod => x.wrapping_rem(y),
        _ => 0,
    }
}

/// Up to `len` bytes of `s` from byte `start`.
/// A negative `start` counts as 0; a negative `len` gives an empty string.
pub fn substr(s: &[u8], start: i64, len: i64) -> Vec<u8> {
    let start = usize::try_from(start).unwrap_or(0).min(s.len());
    let len = usize::try_from(len).unwrap_or(0);
    s[start..].iter().take(len).copied().collect()
}

/// Byte offset of the first (or last) `sub` in `s`, `-1` when absent.
pub fn find(s: &[u8], sub: &[u8], last: bool) -> i64 {
    let at = if last { rfind_bytes(s, sub) } else { find_bytes(s, sub) };
    at.map_or(-1, |i| i as i64)
}

fn find_bytes(s: &[u8], sub: &[u8]) -> Option<usize> {
    if sub.is_empty() {
        return Some(0);
    }
    s.windows(sub.len()).position(|w| w == sub)
}

fn rfind_bytes(s: &[u8], sub: &[u8]) -> Option<usize> {
    if sub.is_empty() {
        return Some(s.len());
    }
    s.windows(sub.len()).rposition(|w| w == sub)
}

/// `s` with every `before` replaced by `after`, scanning left to right
/// without overlap.  An empty `before` matches nothing.
pub fn replace(s: &[u8], before: &[u8], after: &[u8]) -> Vec<u8> {
    if before.is_empty() {
        return s.to_vec();
    }
    let mut out = Vec::with_capacity(s.len());
    let mut rest = s;
    while let Some(at) = find_bytes(rest, before) {
        out.extend_from_slice(&rest[..at]);
        out.extend_from_slice(after);
        rest = &rest[at + before.len()..];
    }
    out.extend_from_slice(rest);
    out
}

/// Right-justify `num` in `width` characters.
///
/// With `decimals > 0` the number is rounded to that many places, otherwise
/// truncated toward zero.  `sign` adds `+` before non-negative numbers.  Only
/// the last `width` characters are kept, so an over-wide number loses its
/// leading digits.
pub fn format_number(num: f64, sign: bool, width: i64, decimals: i64) -> String {
    let width = usize::try_from(width).unwrap_or(0).min(MAX_FORMAT_WIDTH);
    if width == 0 {
        return String::new();
    }
    let mut body = String::new();
    if sign && num >= 0.0 {
        body.push('+');
    }
    match usize::try_from(decimals) {
        Ok(d) if d > 0 => body.push_str(&format!("{:.*}", d.min(MAX_FORMAT_DECIMALS), num)),
        _ => body.push_str(&(num.trunc() as i64).to_string()),
    }
    let chars = body.chars().count();
    if chars >= width {
        body.chars().skip(chars - width).collect()
    } else {
        format!("{body:>width$}")
    }
}

/// Bytes between the first `prefix` and the next `suffix` after it.
/// Empty when either is missing; an empty `prefix` matches at the start.
pub fn extract(s: &[u8], prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let Some(at) = find_bytes(s, prefix) else { return Vec::new() };
    let rest = &s[at + prefix.len()..];
    match find_bytes(rest, suffix) {
        Some(len) => rest[..len].to_vec(),
        None => Vec::new(),
    }
}

/// Navigate one level into `doc`: objects by name, arrays by integer index.
/// A scalar document yields its own value; misses yield an empty string.
pub fn lookup(doc: &[u8], key: &Value) -> Vec<u8> {
    let json = Json::new(doc);
    let found = match json.kind() {
        JsonType::Object => json.field(key.as_bytes()),
        JsonType::Array => usize::try_from(key.as_int()).ok().and_then(|i| json.index(i)),
        _ => return json.value(),
    };
    found.unwrap_or_default().to_vec()
}

/// Minutes from `now` (minute of day) to the next `hour:minute`, 0 when they
/// coincide.
pub fn minutes_until(now: i64, hour: i64, minute: i64) -> i64 {
    let target = hour.rem_euclid(24) * 60 + minute.rem_euclid(MINUTES_PER_DAY);
    (target - now).rem_euclid(MINUTES_PER_DAY)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Character grid for one rendered frame.
//!
//! The panel shows [`SCREEN_ROWS`] rows of [`SCREEN_COLS`] half-width cells.
//! The grid stores raw bytes: a full-width UTF-8 character printed by a script
//! occupies several cells and the host's font renderer reassembles it.
//!
//! Two parallel grids are kept:
//!
//! * **text**: one byte per cell, `0` for a never-written cell.
//! * **attr**: one [`Attr`] byte per cell.

use std::fmt::Write as _;

use crate::attr::Attr;
use crate::config::{SCREEN_COLS, SCREEN_ROWS};

/// Text and attribute grids for one wake cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    text: [[u8; SCREEN_COLS]; SCREEN_ROWS],
    attr: [[u8; SCREEN_COLS]; SCREEN_ROWS],
}

impl Default for ScreenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenBuffer {
    pub fn new() -> Self {
        Self {
            text: [[0; SCREEN_COLS]; SCREEN_ROWS],
            attr: [[0; SCREEN_COLS]; SCREEN_ROWS],
        }
    }

    pub fn rows(&self) -> usize {
        SCREEN_ROWS
    }

    pub fn cols(&self) -> usize {
        SCREEN_COLS
    }

    /// Write `bytes` at row `y` starting at column `x`.
    ///
    /// Rows outside the grid are ignored; cells left of column 0 or right of
    /// the last column are clipped.  Returns the number of cells written.
    pub fn print(&mut self, bytes: &[u8], attr: Attr, x: i64, y: i64) -> usize {
        let Ok(row) = usize::try_from(y) else { return 0 };
        if row >= SCREEN_ROWS {
            return 0;
        }
        let mut written = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let col = x.saturating_add(i as i64);
            if col < 0 {
                continue;
            }
            let col = col as usize;
            if col >= SCREEN_COLS {
                break;
            }
            self.text[row][col] = b;
            self.attr[row][col] = attr.bits();
            written += 1;
        }
        written
    }

    /// The text grid, row-major.
    pub fn text(&self) -> &[[u8; SCREEN_COLS]; SCREEN_ROWS] {
        &self.text
    }

    /// The attribute grid, row-major.
    pub fn attr(&self) -> &[[u8; SCREEN_COLS]; SCREEN_ROWS] {
        &self.attr
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<(u8, Attr)> {
        let t = *self.text.get(y)?.get(x)?;
        let a = self.attr[y][x];
        Some((t, Attr::from_bits(a)))
    }

    /// Printed bytes of row `y` up to the last written cell, as lossy text.
    /// Unwritten cells before that point read as spaces.
    pub fn row_text(&self, y: usize) -> String {
        let Some(row) = self.text.get(y) else { return String::new() };
        let end = row.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let bytes: Vec<u8> = row[..end].iter().map(|&b| if b == 0 { b' ' } else { b }).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// One line per row: ASCII verbatim, `0` as a space, other bytes as `\xNN`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for row in &self.text {
            for &b in row {
                match b {
                    0 => out.push(' '),
                    0x01..=0x7f => out.push(b as char),
                    _ => {
                        let _ = write!(out, "\\x{b:02x}");
                    }
                }
            }
            out.push('\n');
        }
        out
    }

    /// One line per row, one digit per cell.
    pub fn render_attr(&self) -> String {
        let mut out = String::new();
        for row in &self.attr {
            for &a in row {
                out.push(char::from(b'0'.wrapping_add(a)));
            }
            out.push('\n');
        }
        out
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

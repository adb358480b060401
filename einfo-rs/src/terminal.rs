//! Terminal preview of a rendered frame.
//!
//! The `einfo` binary prints the text grid to stdout.  When stdout is a
//! terminal, cells are styled the way the panel would show them: red ink as
//! red foreground, reversed cells as reverse video.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Attributes, Color, ContentStyle, Print, ResetColor, SetStyle},
    tty::IsTty,
};

use crate::attr::Attr;
use crate::screen::ScreenBuffer;

// ── Attr → crossterm style ────────────────────────────────────────────────────

/// Map a cell [`Attr`] to a crossterm [`ContentStyle`].
pub fn attr_style(attr: Attr) -> ContentStyle {
    let mut style = ContentStyle::new();
    let mut attributes = Attributes::default();

    if attr.is_red() {
        style.foreground_color = Some(Color::Red);
    }
    if attr.is_reverse() {
        attributes.set(Attribute::Reverse);
    }
    style.attributes = attributes;
    style
}

/// `true` when styling should be emitted on stdout.
pub fn stdout_is_tty() -> bool {
    io::stdout().is_tty()
}

/// Display form of one cell byte, as in [`ScreenBuffer::render_text`].
fn cell_text(b: u8) -> String {
    match b {
        0 => " ".to_owned(),
        0x01..=0x7f => char::from(b).to_string(),
        _ => format!("\\x{b:02x}"),
    }
}

/// Write the text grid, one line per row.  With `styled`, runs of cells
/// sharing an attribute are wrapped in that attribute's style.
pub fn write_text<W: Write>(out: &mut W, screen: &ScreenBuffer, styled: bool) -> io::Result<()> {
    if !styled {
        return out.write_all(screen.render_text().as_bytes());
    }
    for (text_row, attr_row) in screen.text().iter().zip(screen.attr()) {
        let mut run = String::new();
        let mut run_attr = Attr::EMPTY;
        for (&b, &a) in text_row.iter().zip(attr_row) {
            let a = Attr::from_bits(a);
            if a != run_attr && !run.is_empty() {
                write_run(out, &run, run_attr)?;
                run.clear();
            }
            run_attr = a;
            run.push_str(&cell_text(b));
        }
        write_run(out, &run, run_attr)?;
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

fn write_run<W: Write>(out: &mut W, text: &str, attr: Attr) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    if attr == Attr::EMPTY {
        queue!(out, Print(text))
    } else {
        queue!(out, SetStyle(attr_style(attr)), Print(text), ResetColor)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_maps_to_foreground() {
        let s = attr_style(Attr::RED);
        assert_eq!(s.foreground_color, Some(Color::Red));
        assert!(!s.attributes.has(Attribute::Reverse));
    }

    #[test]
    fn reverse_maps_to_attribute() {
        let s = attr_style(Attr::REVERSE);
        assert_eq!(s.foreground_color, None);
        assert!(s.attributes.has(Attribute::Reverse));
    }

    #[test]
    fn plain_output_matches_render_text() {
        let mut screen = ScreenBuffer::new();
        screen.print(b"abc", Attr::RED, 0, 0);
        let mut out = Vec::new();
        write_text(&mut out, &screen, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), screen.render_text());
    }

    #[test]
    fn styled_output_keeps_cell_text() {
        let mut screen = ScreenBuffer::new();
        screen.print(b"ab", Attr::RED, 1, 0);
        let mut out = Vec::new();
        write_text(&mut out, &screen, true).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("ab"));
        assert!(s.contains('\u{1b}'));
        assert_eq!(s.lines().count(), screen.rows());
    }
}

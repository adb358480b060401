//! Cell display attributes.
//!
//! The panel has black and red ink.  Each cell of the attribute grid holds one
//! byte: bit 0 selects red ink, bit 1 reverses the cell (ink background,
//! white glyph).  Higher bits are ignored by the renderer.

/// Display attributes for one character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attr(u8);

impl Attr {
    pub const EMPTY: Self = Self(0);
    pub const RED: Self = Self(0x01);
    pub const REVERSE: Self = Self(0x02);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Attribute from a script integer; only the low byte is kept.
    pub fn from_script(n: i64) -> Self {
        Self(n as u8)
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_red(self) -> bool {
        self.contains(Self::RED)
    }

    pub fn is_reverse(self) -> bool {
        self.contains(Self::REVERSE)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

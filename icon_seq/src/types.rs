use std::fmt::{self, Display};

/// A 16 bit colour packed as RGB565 and stored with its two bytes swapped.
///
/// The swap gives the little-endian byte order the display driver reads
/// straight out of flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb565(u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0);

    /// Quantizes 8 bit channels to 5/6/5 bits and swaps the bytes.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r5 = (r >> 3) as u16 & 0x1F;
        let g6 = (g >> 2) as u16 & 0x3F;
        let b5 = (b >> 3) as u16 & 0x1F;

        let packed = (r5 << 11) | (g6 << 5) | b5;

        Self(packed.swap_bytes())
    }

    /// Fully transparent pixels take `fill` instead of whatever colour the decoder left behind.
    pub fn from_rgba(pixel: [u8; 4], fill: [u8; 3]) -> Self {
        let [r, g, b, a] = pixel;

        if a == 0 {
            Self::from_rgb(fill[0], fill[1], fill[2])
        } else {
            Self::from_rgb(r, g, b)
        }
    }

    /// Value as it is written out, bytes already swapped.
    pub fn swapped(&self) -> u16 {
        self.0
    }

    /// Plain RGB565 value before the byte swap.
    pub fn packed(&self) -> u16 {
        self.0.swap_bytes()
    }

    /// Wraps a value that is already in the swapped layout, e.g. one read back from a header.
    pub fn from_swapped(value: u16) -> Self {
        Self(value)
    }
}

impl Display for Rgb565 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Replaces `.` so the name can be used inside a C identifier.
pub fn sanitize_symbol(name: &str) -> String {
    name.replace('.', "_")
}

/// One icon worth of frames plus the descriptor that tells the firmware how to slice them.
#[derive(Debug, Clone)]
pub struct IconSequence {
    /// Already sanitized.
    pub symbol: String,
    pub width: u16,
    pub height: u16,
    pub frame_count: u16,
    /// Frame-major, then row-major.
    pub pixels: Vec<Rgb565>,
}

impl IconSequence {
    pub fn new(
        symbol: impl AsRef<str>,
        width: u16,
        height: u16,
        frame_count: u16,
        pixels: Vec<Rgb565>,
    ) -> Self {
        Self {
            symbol: sanitize_symbol(symbol.as_ref()),
            width,
            height,
            frame_count,
            pixels,
        }
    }

    /// Name of the `IconSequence` descriptor.
    pub fn identifier(&self) -> String {
        format!("icon_{}", self.symbol)
    }

    /// Name of the flat pixel array.
    pub fn bitmaps_identifier(&self) -> String {
        format!("icon_{}_bitmaps", self.symbol)
    }

    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn frame(&self, index: usize) -> Option<&[Rgb565]> {
        let len = self.frame_len();
        self.pixels.get(index * len..(index + 1) * len)
    }
}

/// What [`crate::parse_header`] finds in an existing artifact.
#[derive(Debug, Default)]
pub struct ParsedHeader {
    /// The `IconSequence` typedef is present.
    pub declares_type: bool,
    pub icons: Vec<ParsedIcon>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedIcon {
    pub symbol: String,
    pub pixels: Vec<u16>,
    pub width: u16,
    pub height: u16,
    pub frame_count: u16,
}

//! Collage background color and hex parsing (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`).

use alloc::format;
use alloc::string::String;

/// Canvas background color, filled before any cell is drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CanvasColor {
    /// Transparent black `[0, 0, 0, 0]`.
    #[default]
    Transparent,
    /// sRGB color with alpha (8-bit per channel).
    Srgb { r: u8, g: u8, b: u8, a: u8 },
}

impl CanvasColor {
    /// Opaque sRGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Srgb { r, g, b, a: 255 }
    }

    /// The slate default used behind generated covers, `#2C2C3C`.
    pub const fn slate() -> Self {
        Self::rgb(0x2C, 0x2C, 0x3C)
    }

    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Black, fully opaque.
    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Parse a hex color string, with or without the leading `#`.
    ///
    /// Accepts:
    /// - `#RGB` — 3-digit hex, alpha = 0xFF
    /// - `#RGBA` — 4-digit hex
    /// - `#RRGGBB` — 6-digit hex, alpha = 0xFF
    /// - `#RRGGBBAA` — 8-digit hex
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let bytes = hex.as_bytes();

        match hex.len() {
            3 => Some(Self::rgb(
                expand_nibble(bytes[0])?,
                expand_nibble(bytes[1])?,
                expand_nibble(bytes[2])?,
            )),
            4 => Some(Self::Srgb {
                r: expand_nibble(bytes[0])?,
                g: expand_nibble(bytes[1])?,
                b: expand_nibble(bytes[2])?,
                a: expand_nibble(bytes[3])?,
            }),
            6 => Some(Self::rgb(
                parse_byte(&bytes[0..2])?,
                parse_byte(&bytes[2..4])?,
                parse_byte(&bytes[4..6])?,
            )),
            8 => Some(Self::Srgb {
                r: parse_byte(&bytes[0..2])?,
                g: parse_byte(&bytes[2..4])?,
                b: parse_byte(&bytes[4..6])?,
                a: parse_byte(&bytes[6..8])?,
            }),
            _ => None,
        }
    }

    /// `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise.
    pub fn to_hex(&self) -> String {
        match *self {
            Self::Transparent => String::from("#00000000"),
            Self::Srgb { r, g, b, a: 255 } => format!("#{r:02X}{g:02X}{b:02X}"),
            Self::Srgb { r, g, b, a } => format!("#{r:02X}{g:02X}{b:02X}{a:02X}"),
        }
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        match *self {
            Self::Transparent => 0.0,
            Self::Srgb { a, .. } => a as f32 / 255.0,
        }
    }
}

/// Expand a single hex nibble: 'f' → 0xFF, 'a' → 0xAA.
fn expand_nibble(ch: u8) -> Option<u8> {
    let n = hex_val(ch)?;
    Some(n << 4 | n)
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn parse_byte(pair: &[u8]) -> Option<u8> {
    Some(hex_val(pair[0])? << 4 | hex_val(pair[1])?)
}

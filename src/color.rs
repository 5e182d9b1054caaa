//! Packed color codec
//!
//! Neovim transmits colors as packed 24-bit integers, one byte per channel
//! with the most significant byte holding red. A negative value means
//! "unset/default" and must never overwrite a live color.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A concrete 24-bit RGB color, the displayable form of a packed integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into the wire representation (MSB = red)
    pub fn pack(&self) -> i64 {
        (i64::from(self.r) << 16) | (i64::from(self.g) << 8) | i64::from(self.b)
    }

    /// Unpack a wire color; `None` for negative ("unset") values
    pub fn unpack(packed: i64) -> Option<Self> {
        if packed < 0 {
            return None;
        }
        Some(Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        })
    }
}

impl fmt::Display for RgbColor {
    /// Formats as `#rrggbb`, zero-padded so channel value 0 keeps its digits
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

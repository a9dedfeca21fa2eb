use std::{fmt, num::NonZeroU32, str::FromStr};

use thiserror::Error;

/// Bits of a [`Key`] holding its display color.
pub const RGB_MASK: u32 = 0x00ff_ffff;

/// High byte shared by every [`Key`].
const TAG: u32 = 0xff00_0000;

/// Stable identifier of a [`Body`](crate::body::Body) inside a [`Universe`](crate::universe::Universe).
///
/// A key packs a display color as `0xFFRRGGBB`. The RGB bits are never all zero, so a key can
/// always be written to and read back from a universe file as a `#rrggbb` color.
///
/// ```
/// # use planets::prelude::*;
/// let key: Key = "#a1b2c3".parse().unwrap();
///
/// assert_eq!(key.rgb(), 0xa1b2c3);
/// assert_eq!(key.to_string(), "#a1b2c3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(NonZeroU32);

impl Key {
    /// Smallest raw value a key can take.
    pub(crate) const MIN_RAW: u32 = TAG | 1;

    /// Largest raw value a key can take.
    pub(crate) const MAX_RAW: u32 = u32::MAX;

    /// Creates a key from the given color bits, ignoring anything above the low 24 bits.
    ///
    /// Returns `None` if the color is black (`0x000000`), which is reserved.
    #[inline]
    pub fn from_rgb(rgb: u32) -> Option<Self> {
        let rgb = rgb & RGB_MASK;

        if rgb == 0 {
            None
        } else {
            NonZeroU32::new(TAG | rgb).map(Self)
        }
    }

    /// Creates a key from its packed `0xFFRRGGBB` representation.
    ///
    /// Returns `None` if the value is not a valid packed key.
    #[inline]
    pub fn from_raw(raw: u32) -> Option<Self> {
        if raw & TAG == TAG {
            Self::from_rgb(raw)
        } else {
            None
        }
    }

    /// The packed `0xFFRRGGBB` value of this key.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0.get()
    }

    /// The 24 color bits of this key.
    #[inline]
    pub const fn rgb(self) -> u32 {
        self.0.get() & RGB_MASK
    }

    /// The display color of this key with each channel in `[0, 1]`.
    #[inline]
    pub fn color(self) -> [f32; 3] {
        let [_, r, g, b] = self.raw().to_be_bytes();

        [r, g, b].map(|c| f32::from(c) / 255.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.rgb())
    }
}

/// Error returned when a color string cannot be turned into a [`Key`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseKeyError {
    /// The string does not hold exactly six hexadecimal digits.
    #[error("expected 6 hexadecimal digits, found \"{0}\"")]
    Length(String),

    /// The string holds characters that are not hexadecimal digits.
    #[error("\"{0}\" is not a hexadecimal color")]
    Digits(String),

    /// Black is reserved and never names a body.
    #[error("color #000000 is reserved")]
    Reserved,
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 {
            return Err(ParseKeyError::Length(s.to_owned()));
        }

        let rgb = digits
            .chars()
            .try_fold(0, |rgb, c| c.to_digit(16).map(|digit| (rgb << 4) | digit))
            .ok_or_else(|| ParseKeyError::Digits(s.to_owned()))?;

        Self::from_rgb(rgb).ok_or(ParseKeyError::Reserved)
    }
}

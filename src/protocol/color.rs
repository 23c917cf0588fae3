//! # Color Stream Encoding
//!
//! The RGB byte stream that accompanies a packed bitmap.
//!
//! ## Modes
//!
//! | Mode | Triplets | Source |
//! |------|----------|--------|
//! | Solid | one per column | a fixed color (white for plain text) |
//! | Sampled | one per pixel, column-major | the normalized source image |
//!
//! Sampled order:
//!
//! ```text
//! col 0: row 0, row 1, ... row H-1, col 1: row 0, ... , col N-1: ... row H-1
//! ```
//!
//! Sampled channels are truncated from 16 to 8 bits with `>> 8`, not rounded.
//!
//! Sampled mode has no confirmed consumer on the device side yet. It lives
//! behind [`ColorMode`] so it can change without touching packing or geometry.
//!
//! ## Example
//!
//! ```
//! use image::GrayImage;
//! use ledmask::protocol::color::ColorMode;
//!
//! let canvas = GrayImage::new(3, 12);
//! let stream = ColorMode::WHITE.encode(&canvas, 12);
//! assert_eq!(stream.as_bytes(), &[0xFF; 9]);
//! ```

use image::Rgb;
use serde::Serialize;

use crate::surface::PixelSource;

/// Bytes per RGB triplet
pub const BYTES_PER_TRIPLET: usize = 3;

/// RGB triplets paired with a packed bitmap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColorStream(Vec<u8>);

impl ColorStream {
    /// `columns` copies of one color.
    pub fn solid(columns: usize, color: Rgb<u8>) -> Self {
        Self(color.0.repeat(columns))
    }

    /// One triplet per pixel over `rows` rows, column-major, channels `>> 8`.
    pub fn sampled<S: PixelSource + ?Sized>(source: &S, rows: u32) -> Self {
        let (width, _) = source.dimensions();
        let mut data = Vec::with_capacity(width as usize * rows as usize * BYTES_PER_TRIPLET);
        for x in 0..width {
            for y in 0..rows {
                let [r, g, b] = source.rgb16(x, y);
                data.extend_from_slice(&[(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8]);
            }
        }
        Self(data)
    }

    /// Number of RGB triplets
    #[inline]
    pub fn triplets(&self) -> usize {
        self.0.len() / BYTES_PER_TRIPLET
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// How a frame's color stream is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Same color for every column
    Solid(Rgb<u8>),
    /// Per-pixel colors from the source surface
    Sampled,
}

impl ColorMode {
    /// Plain white text
    pub const WHITE: Self = Self::Solid(Rgb([0xFF, 0xFF, 0xFF]));

    /// Encode the stream for a surface of the frame's width.
    pub fn encode<S: PixelSource + ?Sized>(&self, source: &S, rows: u32) -> ColorStream {
        match *self {
            ColorMode::Solid(color) => ColorStream::solid(source.dimensions().0 as usize, color),
            ColorMode::Sampled => ColorStream::sampled(source, rows),
        }
    }
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Parse `RRGGBB` (optionally `#`-prefixed) into a color.
pub fn parse_hex_color(s: &str) -> Option<Rgb<u8>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

// ============================================================================
// TESTS
// ============================================================================

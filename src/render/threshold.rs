//! # Luminance Thresholding
//!
//! Converts any pixel source into a binary bitmap for the LED mask.
//!
//! ## Luma
//!
//! Computed on the 16-bit channel scale (see [`crate::surface`]):
//!
//! ```text
//! Y = 0.299 R + 0.587 G + 0.114 B        (0 ..= 65535)
//! lit = Y > 15000
//! ```
//!
//! The cutoff sits at roughly 23% brightness, which drops dim noise and
//! faint anti-aliasing fringes. There is no dithering: the mask can only show
//! an LED on or off, and intermediate levels are discarded.
//!
//! ## Layout
//!
//! Bitmaps are column-major, matching the wire order:
//!
//! ```text
//!            col 0   col 1   col 2  ...
//! row 0       [0]     [0]     [0]
//! row 1       [1]     [1]     [1]
//! ...
//! row H-1    [H-1]   [H-1]   [H-1]
//! ```
//!
//! ## Example
//!
//! ```
//! use image::{GrayImage, Luma};
//! use ledmask::render::threshold;
//!
//! let img = GrayImage::from_fn(4, 12, |x, _| Luma([if x % 2 == 0 { 255 } else { 0 }]));
//! let bitmap = threshold::threshold(&img, 12);
//!
//! assert_eq!(bitmap.width(), 4);
//! assert!(bitmap.get(0, 0));
//! assert!(!bitmap.get(1, 0));
//! ```

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::surface::PixelSource;

/// Luma cutoff on the 16-bit scale
pub const LUMA_THRESHOLD: f64 = 15000.0;

/// A binary image stored as columns of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    columns: Vec<Vec<bool>>,
}

impl Bitmap {
    /// Wrap columns produced elsewhere.
    ///
    /// Column lengths are not checked here; the packer rejects any column
    /// that does not match the mask row count.
    pub fn from_columns(columns: Vec<Vec<bool>>) -> Self {
        Self { columns }
    }

    /// Number of columns
    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Vec<bool>] {
        &self.columns
    }

    pub fn column(&self, x: usize) -> Option<&[bool]> {
        self.columns.get(x).map(Vec::as_slice)
    }

    /// Bit at `(x, y)`; out-of-range reads as unlit.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.columns
            .get(x)
            .and_then(|column| column.get(y))
            .copied()
            .unwrap_or(false)
    }

    /// Total number of lit pixels
    pub fn lit_count(&self) -> usize {
        self.columns
            .iter()
            .map(|column| column.iter().filter(|&&on| on).count())
            .sum()
    }

    /// Render as a grayscale image (lit = 255) with `rows` rows.
    pub fn to_gray_image(&self, rows: u32) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, rows, |x, y| {
            Luma([if self.get(x as usize, y as usize) { 255 } else { 0 }])
        })
    }

    pub fn into_columns(self) -> Vec<Vec<bool>> {
        self.columns
    }
}

/// Luma of a 16-bit RGB triple.
#[inline]
pub fn luma16([r, g, b]: [u16; 3]) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Whether a pixel lights its LED.
#[inline]
pub fn is_lit(rgb: [u16; 3]) -> bool {
    luma16(rgb) > LUMA_THRESHOLD
}

/// Threshold a pixel source into a bitmap.
///
/// Produces one column per source column, each with exactly `rows` bits.
/// `rows` is the working height chosen by the caller; rows past the bottom of
/// the source read as black.
pub fn threshold<S: PixelSource + ?Sized>(source: &S, rows: u32) -> Bitmap {
    let (width, _) = source.dimensions();

    let columns = (0..width)
        .map(|x| (0..rows).map(|y| is_lit(source.rgb16(x, y))).collect())
        .collect();

    let bitmap = Bitmap::from_columns(columns);
    log::trace!(
        "thresholded {}x{} surface, {} lit pixels",
        width,
        rows,
        bitmap.lit_count()
    );
    bitmap
}

/// Diagnostic view of a thresholded source.
///
/// Lit pixels keep their source color (truncated to 8 bits); unlit pixels are
/// black. Not part of the encoded output.
pub fn masked_preview<S: PixelSource + ?Sized>(source: &S, bitmap: &Bitmap, rows: u32) -> RgbImage {
    RgbImage::from_fn(bitmap.width() as u32, rows, |x, y| {
        if bitmap.get(x as usize, y as usize) {
            let [r, g, b] = source.rgb16(x, y);
            Rgb([(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

// ============================================================================
// TESTS
// ============================================================================

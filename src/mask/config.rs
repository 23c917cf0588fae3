//! # Mask Geometry
//!
//! This module defines the pixel grid of supported LED mask displays.
//!
//! ## Supported Masks
//!
//! | Model | Columns (nominal) | Rows | Packed word |
//! |-------|-------------------|------|-------------|
//! | Default | 40 | 12 | 16 bits |
//!
//! ## Usage
//!
//! ```
//! use ledmask::mask::MaskGeometry;
//!
//! let geometry = MaskGeometry::DEFAULT;
//! println!("{} rows, aspect {:.3}", geometry.height, geometry.aspect());
//! ```

use crate::error::{MaskError, Result};

/// Nominal column count of the default mask
pub const MASK_WIDTH: u32 = 40;

/// Row count of the default mask
pub const MASK_HEIGHT: u32 = 12;

/// Rows that fit in one packed column word (two bytes)
pub const PACKED_ROWS: u32 = 16;

/// # Mask Geometry
///
/// The pixel grid the whole pipeline targets.
///
/// - **width**: nominal column count. Only used for the target aspect ratio;
///   rendered content may be narrower or wider.
/// - **height**: row count. Every bitmap column carries exactly this many
///   rows, and the packer rejects anything else.
///
/// ## Row Count and Packing
///
/// ```text
/// packed word:  high byte              low byte
///               r8 r9 ... r15          r0 r1 ... r7
///
/// height = 12:  r8 r9 r10 r11 0 0 0 0  r0 ... r7
/// ```
///
/// A 12-row geometry leaves rows 12–15 of every word at zero. Heights above
/// [`PACKED_ROWS`] cannot be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskGeometry {
    /// Nominal column count
    pub width: u32,

    /// Device row count
    pub height: u32,
}

impl MaskGeometry {
    /// # Default Mask
    ///
    /// 40 × 12 LED matrix, packed into 16-bit column words.
    pub const DEFAULT: Self = Self {
        width: MASK_WIDTH,
        height: MASK_HEIGHT,
    };

    /// Create a geometry, checking that it is non-empty and packable.
    ///
    /// ## Example
    ///
    /// ```
    /// use ledmask::mask::MaskGeometry;
    ///
    /// assert!(MaskGeometry::new(40, 16).is_ok());
    /// assert!(MaskGeometry::new(40, 17).is_err());
    /// assert!(MaskGeometry::new(0, 12).is_err());
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MaskError::InvalidGeometry(format!(
                "mask geometry must be non-empty, got {}x{}",
                width, height
            )));
        }
        if height > PACKED_ROWS {
            return Err(MaskError::InvalidGeometry(format!(
                "mask height {} exceeds the {} rows of a packed column",
                height, PACKED_ROWS
            )));
        }
        Ok(Self { width, height })
    }

    /// Target aspect ratio (width / height)
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for MaskGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let geometry = MaskGeometry::DEFAULT;
        assert_eq!(geometry.width, 40);
        assert_eq!(geometry.height, 12);
        assert!(geometry.height <= PACKED_ROWS);
    }

    #[test]
    fn test_aspect() {
        let aspect = MaskGeometry::DEFAULT.aspect();
        assert!((aspect - 40.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            MaskGeometry::new(40, 0),
            Err(MaskError::InvalidGeometry(_))
        ));
        assert!(matches!(
            MaskGeometry::new(0, 12),
            Err(MaskError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_new_rejects_unpackable_height() {
        assert!(MaskGeometry::new(40, PACKED_ROWS).is_ok());
        assert!(matches!(
            MaskGeometry::new(40, PACKED_ROWS + 1),
            Err(MaskError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_default_is_default_mask() {
        assert_eq!(MaskGeometry::default(), MaskGeometry::DEFAULT);
    }
}

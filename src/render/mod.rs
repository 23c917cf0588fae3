//! # Rendering Module
//!
//! Turns images and text into binary bitmaps on the mask grid.
//!
//! ## Modules
//!
//! - [`geometry`]: crop to the mask aspect ratio and resize to its row count
//! - [`threshold`]: luma cutoff into a column-major bitmap
//! - [`text`]: single-line text rasterization
//!
//! ## Usage Example
//!
//! ```
//! use image::{Rgb, RgbImage};
//! use ledmask::mask::MaskGeometry;
//! use ledmask::render::{geometry, threshold};
//!
//! let photo = RgbImage::from_pixel(640, 480, Rgb([200, 200, 200]));
//! let fitted = geometry::normalize(&photo, &MaskGeometry::DEFAULT)?;
//! let bitmap = threshold::threshold(&fitted, 12);
//!
//! assert_eq!(bitmap.width(), 40);
//! # Ok::<(), ledmask::MaskError>(())
//! ```

pub mod geometry;
pub mod text;
pub mod threshold;

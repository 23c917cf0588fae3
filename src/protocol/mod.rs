//! # Mask Wire Format
//!
//! Encoders for the two byte streams a mask frame carries.
//!
//! ## Module Structure
//!
//! - [`bitmap`]: 2-bytes-per-column packed bitmap
//! - [`color`]: RGB color stream (solid or sampled)
//!
//! ## Usage Example
//!
//! ```
//! use ledmask::protocol::{bitmap, color::ColorStream};
//! use ledmask::render::threshold::Bitmap;
//! use image::Rgb;
//!
//! let bits = Bitmap::from_columns(vec![vec![true; 12]; 3]);
//! let packed = bitmap::pack(&bits, 12)?;
//! let colors = ColorStream::solid(packed.columns(), Rgb([255, 255, 255]));
//!
//! assert_eq!(packed.as_bytes().len(), 6);
//! assert_eq!(colors.as_bytes().len(), 9);
//! # Ok::<(), ledmask::MaskError>(())
//! ```
//!
//! Neither stream carries a header, length prefix, or checksum.

pub mod bitmap;
pub mod color;

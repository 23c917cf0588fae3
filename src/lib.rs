//! # ledmask - LED Mask Frame Encoder
//!
//! ledmask converts images and text into frames for low-resolution LED
//! matrix masks. It provides:
//!
//! - **Geometry normalization**: centered crop to the mask aspect ratio,
//!   nearest-neighbour resize to the mask row count
//! - **Thresholding**: fixed luma cutoff into a 1-bit bitmap
//! - **Text rendering**: TTF fonts via ab_glyph, or the built-in Spleen 6x12
//! - **Wire encoding**: 2-bytes-per-column packed bitmap plus an RGB color stream
//!
//! ## Quick Start
//!
//! ```no_run
//! use ledmask::{codec, frame::MaskFrameBuilder};
//!
//! let photo = codec::load_image("photo.jpg")?;
//! let frame = MaskFrameBuilder::new().build_from_image(&photo)?;
//!
//! // Hand both streams to the transport
//! let (bitmap, colors) = frame.into_parts();
//! std::fs::write("bitmap.bin", bitmap.as_bytes())?;
//! std::fs::write("colors.bin", colors.as_bytes())?;
//!
//! # Ok::<(), ledmask::MaskError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`render`] | Geometry, thresholding, and text rasterization |
//! | [`protocol`] | Packed bitmap and color stream encoders |
//! | [`frame`] | End-to-end frame builder |
//! | [`font`] | Font providers |
//! | [`surface`] | Pixel source and croppable surface traits |
//! | [`diagnostics`] | Optional intermediate image dumps |
//! | [`codec`] | Image file decoding |
//! | [`mask`] | Mask geometry |
//! | [`error`] | Error types |
//!
//! ## Supported Masks
//!
//! The default geometry is a 40 × 12 matrix. Any geometry up to 16 rows can be
//! configured; see [`mask::MaskGeometry`].

pub mod codec;
pub mod diagnostics;
pub mod error;
pub mod font;
pub mod frame;
pub mod mask;
pub mod protocol;
pub mod render;
pub mod surface;

// Re-exports for convenience
pub use error::MaskError;
pub use frame::{MaskFrame, MaskFrameBuilder};
pub use mask::MaskGeometry;

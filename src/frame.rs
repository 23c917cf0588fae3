//! # Mask Frames
//!
//! Builds device-ready frames from images or text.
//!
//! ## Pipelines
//!
//! ```text
//! image ──► normalize ──► threshold ──► pack ──────────┐
//!               │                                      ├──► MaskFrame
//!               └──────► color stream (sampled) ───────┘
//!
//! text + face ──► rasterize ──► threshold ──► pack ────┐
//!                     │                                ├──► MaskFrame
//!                     └─────► color stream (solid) ────┘
//! ```
//!
//! Every stage uses the builder's [`MaskGeometry`], so bitmaps, packing, and
//! color streams always agree on the row count.
//!
//! ## Example
//!
//! ```
//! use ledmask::font::SpleenFace;
//! use ledmask::frame::MaskFrameBuilder;
//! use ledmask::render::text::TextStyle;
//!
//! let face = SpleenFace::new()?;
//! let frame = MaskFrameBuilder::new().build_from_text("HI", &face, &TextStyle::default())?;
//!
//! assert_eq!(frame.columns(), 12);
//! assert_eq!(frame.bitmap().as_bytes().len(), 24);
//! assert_eq!(frame.colors().as_bytes().len(), 36);
//! # Ok::<(), ledmask::MaskError>(())
//! ```

use image::{DynamicImage, Rgb};
use serde::Serialize;

use crate::diagnostics::{DiagnosticSink, NoopSink, Stage};
use crate::error::Result;
use crate::mask::MaskGeometry;
use crate::protocol::bitmap::{self, PackedBitmap};
use crate::protocol::color::{ColorMode, ColorStream};
use crate::render::text::{self, TextStyle, Typeface};
use crate::render::{geometry, threshold};
use crate::surface::{self, PixelSource, Surface};

/// A packed bitmap and its color stream, ready for the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaskFrame {
    columns: usize,
    bitmap: PackedBitmap,
    colors: ColorStream,
}

impl MaskFrame {
    /// Number of columns in the packed bitmap
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn bitmap(&self) -> &PackedBitmap {
        &self.bitmap
    }

    pub fn colors(&self) -> &ColorStream {
        &self.colors
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0
    }

    pub fn into_parts(self) -> (PackedBitmap, ColorStream) {
        (self.bitmap, self.colors)
    }
}

/// Converts images and text into [`MaskFrame`]s.
pub struct MaskFrameBuilder {
    geometry: MaskGeometry,
    text_colors: ColorMode,
    image_colors: ColorMode,
    sink: Box<dyn DiagnosticSink>,
}

impl Default for MaskFrameBuilder {
    fn default() -> Self {
        Self {
            geometry: MaskGeometry::DEFAULT,
            text_colors: ColorMode::WHITE,
            image_colors: ColorMode::Sampled,
            sink: Box::new(NoopSink),
        }
    }
}

impl std::fmt::Debug for MaskFrameBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskFrameBuilder")
            .field("geometry", &self.geometry)
            .field("text_colors", &self.text_colors)
            .field("image_colors", &self.image_colors)
            .field("dumps", &self.sink.enabled())
            .finish()
    }
}

impl MaskFrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geometry(mut self, geometry: MaskGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Solid color for text frames
    pub fn with_text_color(mut self, color: Rgb<u8>) -> Self {
        self.text_colors = ColorMode::Solid(color);
        self
    }

    /// Color mode for image frames (sampled by default)
    pub fn with_image_colors(mut self, mode: ColorMode) -> Self {
        self.image_colors = mode;
        self
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn geometry(&self) -> &MaskGeometry {
        &self.geometry
    }

    /// Render a line of text. Empty text gives an empty frame.
    pub fn build_from_text<F: Typeface + ?Sized>(
        &self,
        text: &str,
        face: &F,
        style: &TextStyle,
    ) -> Result<MaskFrame> {
        let rows = self.geometry.height;
        let canvas = text::rasterize(text, face, style, rows)?;
        if self.sink.enabled() {
            self.sink
                .dump(Stage::TextCanvas, &DynamicImage::ImageLuma8(canvas.clone()));
        }

        self.encode(&canvas, self.text_colors)
    }

    /// Fit an image onto the mask grid and encode it.
    pub fn build_from_image<S: Surface + Clone>(&self, image: &S) -> Result<MaskFrame> {
        let normalized = geometry::normalize(image, &self.geometry)?;
        if self.sink.enabled() {
            self.sink.dump(
                Stage::Normalized,
                &DynamicImage::ImageRgb8(surface::to_rgb8(&normalized)),
            );
        }

        self.encode(&normalized, self.image_colors)
    }

    fn encode<S: PixelSource + ?Sized>(&self, source: &S, colors: ColorMode) -> Result<MaskFrame> {
        let rows = self.geometry.height;
        let bitmap = threshold::threshold(source, rows);
        if self.sink.enabled() {
            let masked = threshold::masked_preview(source, &bitmap, rows);
            self.sink.dump(Stage::Masked, &DynamicImage::ImageRgb8(masked));
        }

        let packed = bitmap::pack(&bitmap, rows)?;
        let colors = colors.encode(source, rows);
        log::debug!(
            "encoded frame: {} columns, {} bitmap bytes, {} color bytes",
            packed.columns(),
            packed.as_bytes().len(),
            colors.as_bytes().len()
        );

        Ok(MaskFrame {
            columns: packed.columns(),
            bitmap: packed,
            colors,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

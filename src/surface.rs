//! # Pixel Surfaces
//!
//! Read access to decoded images, normalized to a 16-bit-per-channel RGB
//! model, plus the crop/resize capability the geometry stage needs.
//!
//! ## Sample Scale
//!
//! | Subpixel | Conversion to 16-bit |
//! |----------|----------------------|
//! | `u8` | `v × 257` (0xAB → 0xABAB) |
//! | `u16` | unchanged |
//! | `f32` | `clamp(v, 0, 1) × 65535`, rounded |
//!
//! Channels are premultiplied by alpha, so a fully transparent pixel reads
//! as black. Coordinates outside the surface also read as black.
//!
//! ## Croppable Surfaces
//!
//! Every concrete `image` buffer and [`DynamicImage`] implements [`Surface`]
//! directly, so cropping never needs a runtime capability check.

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel, Rgb, RgbImage, imageops};

/// A channel value that can be widened to the 16-bit scale.
pub trait Sample16: Copy {
    fn to_u16(self) -> u16;
}

impl Sample16 for u8 {
    #[inline]
    fn to_u16(self) -> u16 {
        self as u16 * 257
    }
}

impl Sample16 for u16 {
    #[inline]
    fn to_u16(self) -> u16 {
        self
    }
}

impl Sample16 for f32 {
    #[inline]
    fn to_u16(self) -> u16 {
        (self.clamp(0.0, 1.0) * 65535.0).round() as u16
    }
}

/// Read-only 2-D pixel access on the 16-bit RGB scale.
pub trait PixelSource {
    /// `(width, height)` in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Alpha-premultiplied RGB at `(x, y)`; black outside the bounds.
    fn rgb16(&self, x: u32, y: u32) -> [u16; 3];
}

/// A pixel source that can produce cropped and resized copies of itself.
pub trait Surface: PixelSource + Sized {
    /// Copy out the `width × height` region starting at `(x, y)`.
    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self;

    /// Resample to exactly `width × height` with nearest-neighbour sampling.
    fn resize_nearest(&self, width: u32, height: u32) -> Self;
}

#[inline]
fn premultiply([r, g, b, a]: [u16; 4]) -> [u16; 3] {
    let a = a as u32;
    [
        (r as u32 * a / 0xFFFF) as u16,
        (g as u32 * a / 0xFFFF) as u16,
        (b as u32 * a / 0xFFFF) as u16,
    ]
}

impl<P> PixelSource for ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
    P::Subpixel: Sample16,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgb16(&self, x: u32, y: u32) -> [u16; 3] {
        if x >= self.width() || y >= self.height() {
            return [0; 3];
        }
        let [r, g, b, a] = self.get_pixel(x, y).to_rgba().0;
        premultiply([r.to_u16(), g.to_u16(), b.to_u16(), a.to_u16()])
    }
}

impl<P> Surface for ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: Sample16 + 'static,
{
    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        imageops::crop_imm(self, x, y, width, height).to_image()
    }

    fn resize_nearest(&self, width: u32, height: u32) -> Self {
        imageops::resize(self, width, height, imageops::FilterType::Nearest)
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgb16(&self, x: u32, y: u32) -> [u16; 3] {
        match self {
            DynamicImage::ImageLuma8(buf) => buf.rgb16(x, y),
            DynamicImage::ImageLumaA8(buf) => buf.rgb16(x, y),
            DynamicImage::ImageRgb8(buf) => buf.rgb16(x, y),
            DynamicImage::ImageRgba8(buf) => buf.rgb16(x, y),
            DynamicImage::ImageLuma16(buf) => buf.rgb16(x, y),
            DynamicImage::ImageLumaA16(buf) => buf.rgb16(x, y),
            DynamicImage::ImageRgb16(buf) => buf.rgb16(x, y),
            DynamicImage::ImageRgba16(buf) => buf.rgb16(x, y),
            DynamicImage::ImageRgb32F(buf) => buf.rgb16(x, y),
            DynamicImage::ImageRgba32F(buf) => buf.rgb16(x, y),
            other => {
                if x >= other.width() || y >= other.height() {
                    return [0; 3];
                }
                let [r, g, b, a] = other.get_pixel(x, y).0;
                premultiply([r.to_u16(), g.to_u16(), b.to_u16(), a.to_u16()])
            }
        }
    }
}

impl Surface for DynamicImage {
    fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        self.crop_imm(x, y, width, height)
    }

    fn resize_nearest(&self, width: u32, height: u32) -> Self {
        self.resize_exact(width, height, imageops::FilterType::Nearest)
    }
}

/// Copy any pixel source into an 8-bit RGB image (channels `>> 8`).
///
/// Used for diagnostic dumps of intermediate surfaces.
pub fn to_rgb8<S: PixelSource + ?Sized>(source: &S) -> RgbImage {
    let (width, height) = source.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b] = source.rgb16(x, y);
        Rgb([(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8])
    })
}

// ============================================================================
// TESTS
// ============================================================================

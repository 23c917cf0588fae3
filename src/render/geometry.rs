//! # Geometry Normalization
//!
//! Fits an arbitrary source image onto the mask grid: crop to the mask's
//! aspect ratio, then resize to the mask's row count.
//!
//! ## Crop
//!
//! The longer axis is cropped, centered. Nothing is ever padded.
//!
//! ```text
//! wider than W:H                      taller than W:H
//! ┌────┬──────────┬────┐              ┌──────────┐
//! │    │  keep    │    │              │          │  (h - ch) / 2
//! │    │  cw × h  │    │              ├──────────┤
//! │    │          │    │              │ keep     │
//! └────┴──────────┴────┘              │ w × ch   │
//!  (w - cw) / 2                       ├──────────┤
//!                                     └──────────┘
//! cw = round(h × W / H)               ch = round(w × H / W)
//! ```
//!
//! Aspect comparison uses integer cross-multiplication, so an image that is
//! exactly W:H is never cropped.
//!
//! ## Resize
//!
//! Nearest-neighbour to height `H`, width `round(H × w' / h')`. Nearest keeps
//! hard edges; interpolated grays would be thrown away by thresholding anyway.
//! The width is not forced to `W`.
//!
//! ## Example
//!
//! ```
//! use ledmask::mask::MaskGeometry;
//! use ledmask::render::geometry;
//!
//! // 16:9 is taller than 40:12, so rows are cropped
//! let plan = geometry::plan(1920, 1080, &MaskGeometry::DEFAULT).unwrap();
//! assert_eq!(plan.crop.height, 1920 * 12 / 40);
//! assert_eq!(plan.crop.y, (1080 - 576) / 2);
//! assert_eq!((plan.output_width, plan.output_height), (40, 12));
//! ```

use std::cmp::Ordering;

use crate::error::{MaskError, Result};
use crate::mask::MaskGeometry;
use crate::surface::Surface;

/// Region of the source kept by the crop step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop and resize parameters for one source size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizePlan {
    pub crop: CropRect,
    pub output_width: u32,
    pub output_height: u32,
}

impl NormalizePlan {
    /// Whether the crop keeps the whole `width × height` source.
    pub fn is_full_crop(&self, width: u32, height: u32) -> bool {
        let CropRect { x, y, width: w, height: h } = self.crop;
        (x, y, w, h) == (0, 0, width, height)
    }
}

/// `round(numerator / denominator)` for positive integers, halves rounding up.
#[inline]
fn div_round(numerator: u64, denominator: u64) -> u64 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Compute the crop rectangle and output size for a `width × height` source.
pub fn plan(width: u32, height: u32, geometry: &MaskGeometry) -> Result<NormalizePlan> {
    if width == 0 || height == 0 {
        return Err(MaskError::InvalidGeometry(format!(
            "source image is {}x{}",
            width, height
        )));
    }
    if geometry.width == 0 || geometry.height == 0 {
        return Err(MaskError::InvalidGeometry(format!(
            "target geometry is {}x{}",
            geometry.width, geometry.height
        )));
    }

    let (w, h) = (width as u64, height as u64);
    let (gw, gh) = (geometry.width as u64, geometry.height as u64);

    let crop = match (w * gh).cmp(&(h * gw)) {
        Ordering::Greater => {
            let cw = div_round(h * gw, gh);
            CropRect {
                x: ((w - cw) / 2) as u32,
                y: 0,
                width: cw as u32,
                height,
            }
        }
        Ordering::Less => {
            let ch = div_round(w * gh, gw);
            CropRect {
                x: 0,
                y: ((h - ch) / 2) as u32,
                width,
                height: ch as u32,
            }
        }
        Ordering::Equal => CropRect {
            x: 0,
            y: 0,
            width,
            height,
        },
    };

    if crop.width == 0 || crop.height == 0 {
        return Err(MaskError::InvalidGeometry(format!(
            "cropping {}x{} to {}:{} leaves {}x{}",
            width, height, geometry.width, geometry.height, crop.width, crop.height
        )));
    }

    let output_width = div_round(gh * crop.width as u64, crop.height as u64);
    if output_width == 0 || output_width > u32::MAX as u64 {
        return Err(MaskError::InvalidGeometry(format!(
            "resizing {}x{} to {} rows gives width {}",
            crop.width, crop.height, geometry.height, output_width
        )));
    }

    Ok(NormalizePlan {
        crop,
        output_width: output_width as u32,
        output_height: geometry.height,
    })
}

/// Crop and resize a surface onto the mask grid.
///
/// Returns a copy of the input when it already has the output dimensions
/// and needs no crop.
pub fn normalize<S>(surface: &S, geometry: &MaskGeometry) -> Result<S>
where
    S: Surface + Clone,
{
    let (width, height) = surface.dimensions();
    let plan = plan(width, height, geometry)?;

    let cropped = if plan.is_full_crop(width, height) {
        surface.clone()
    } else {
        let CropRect { x, y, width, height } = plan.crop;
        log::debug!("cropped image to {}x{} at ({}, {})", width, height, x, y);
        surface.crop(x, y, width, height)
    };

    if cropped.dimensions() == (plan.output_width, plan.output_height) {
        return Ok(cropped);
    }

    log::debug!(
        "resized image to {}x{}",
        plan.output_width,
        plan.output_height
    );
    Ok(cropped.resize_nearest(plan.output_width, plan.output_height))
}

// ============================================================================
// TESTS
// ============================================================================

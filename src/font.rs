//! Font providers for the text rasterizer.
//!
//! - [`TtfFace`]: TrueType/OpenType outlines through ab_glyph, anti-aliased
//!   (the thresholder binarizes the result).
//! - [`SpleenFace`]: the built-in Spleen 6×12 bitmap font. Its 12-row cell
//!   matches the default mask height, so it needs no font file.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use spleen_font::{FONT_6X12, PSF2Font};
use std::path::Path;

use crate::error::{MaskError, Result};
use crate::render::text::Typeface;

/// An outline font loaded from TTF/OTF data.
#[derive(Clone)]
pub struct TtfFace {
    font: FontArc,
    units_per_em: f32,
}

impl std::fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFace")
            .field("units_per_em", &self.units_per_em)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TtfFace {
    /// Parse font data already in memory.
    pub fn from_vec(data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| MaskError::FontUnavailable(format!("failed to parse font: {}", e)))?;
        Self::from_font(font)
    }

    /// Read and parse a font file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| MaskError::FontUnavailable(format!("{}: {}", path.display(), e)))?;
        log::debug!("loaded font {} ({} bytes)", path.display(), data.len());
        Self::from_vec(data)
    }

    pub fn from_font(font: FontArc) -> Result<Self> {
        let units_per_em = font.units_per_em().ok_or_else(|| {
            MaskError::FontUnavailable("font does not declare units per em".to_string())
        })?;
        Ok(Self { font, units_per_em })
    }

    /// ab_glyph scales by ascent-to-descent height; convert from pixels per em.
    fn px_scale(&self, px_per_em: f32) -> PxScale {
        PxScale::from(px_per_em * self.font.height_unscaled() / self.units_per_em)
    }
}

impl Typeface for TtfFace {
    fn advance(&self, ch: char, px_per_em: f32) -> f32 {
        let scaled = self.font.as_scaled(self.px_scale(px_per_em));
        scaled.h_advance(self.font.glyph_id(ch))
    }

    fn kern(&self, left: char, right: char, px_per_em: f32) -> f32 {
        let scaled = self.font.as_scaled(self.px_scale(px_per_em));
        scaled.kern(self.font.glyph_id(left), self.font.glyph_id(right))
    }

    fn draw(
        &self,
        ch: char,
        px_per_em: f32,
        origin: (f32, f32),
        plot: &mut dyn FnMut(i32, i32, f32),
    ) -> Result<()> {
        let glyph = self
            .font
            .glyph_id(ch)
            .with_scale_and_position(self.px_scale(px_per_em), point(origin.0, origin.1));

        // Whitespace has no outline
        if let Some(outlined) = self.font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                plot(x, y, coverage);
            });
        }
        Ok(())
    }
}

/// Spleen cell width in pixels
const SPLEEN_WIDTH: i32 = 6;

/// Spleen cell height in pixels
const SPLEEN_HEIGHT: i32 = 12;

/// The built-in Spleen 6×12 bitmap font.
///
/// Fixed 6-pixel advance at any size. The bottom of the 12-row cell sits on
/// the baseline, so the default baseline (mask height) shows the whole cell.
#[derive(Debug, Clone, Copy)]
pub struct SpleenFace {
    _private: (),
}

impl SpleenFace {
    pub fn new() -> Result<Self> {
        PSF2Font::new(FONT_6X12).map_err(|_| {
            MaskError::FontUnavailable("built-in Spleen 6x12 data is unreadable".to_string())
        })?;
        Ok(Self { _private: () })
    }
}

impl Typeface for SpleenFace {
    fn advance(&self, _ch: char, _px_per_em: f32) -> f32 {
        SPLEEN_WIDTH as f32
    }

    fn draw(
        &self,
        ch: char,
        _px_per_em: f32,
        origin: (f32, f32),
        plot: &mut dyn FnMut(i32, i32, f32),
    ) -> Result<()> {
        let mut font = PSF2Font::new(FONT_6X12)
            .map_err(|_| MaskError::Render("built-in Spleen 6x12 data is unreadable".to_string()))?;
        let left = origin.0.round() as i32;
        let top = origin.1.round() as i32 - SPLEEN_HEIGHT;
        let utf8 = ch.to_string();

        if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    // Rows are byte-padded past the 6-pixel cell
                    if on && (col_x as i32) < SPLEEN_WIDTH && (row_y as i32) < SPLEEN_HEIGHT {
                        plot(left + col_x as i32, top + row_y as i32, 1.0);
                    }
                }
            }
        } else {
            // Box outline for characters Spleen doesn't cover
            for x in 0..SPLEEN_WIDTH - 1 {
                plot(left + x, top + 1, 1.0);
                plot(left + x, top + SPLEEN_HEIGHT - 2, 1.0);
            }
            for y in 1..SPLEEN_HEIGHT - 1 {
                plot(left, top + y, 1.0);
                plot(left + SPLEEN_WIDTH - 2, top + y, 1.0);
            }
        }
        Ok(())
    }
}

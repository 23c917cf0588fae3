//! # Text Rasterization
//!
//! Renders a single line of text into a grayscale canvas exactly as tall as
//! the mask and as wide as the text's advances and ink.
//!
//! ## Two Passes
//!
//! ```text
//! measure:  layout glyphs (advance + kerning), track inked columns → width
//! draw:     allocate width × H canvas once, draw each glyph at the baseline
//! ```
//!
//! The draw pass keeps its own caret; if it ends anywhere other than the
//! measured width the render fails instead of returning a clipped line.
//!
//! Glyph ink may hang past its advance (the hook of a `j`, the arm of an
//! `f`). The measure pass tracks inked columns too, and the canvas is widened
//! and shifted right to hold them:
//!
//! ```text
//!  offset    advances + kerning    overhang
//! ├──────┼──────────────────────┼────────┤
//!        ^ first glyph origin
//! ```
//!
//! ## Canvas
//!
//! White glyphs (255) on black (0), coverage accumulated and clamped.
//! The baseline sits `baseline` pixels below the top edge (default: the
//! mask height, so descenders are clipped). Ink above or below the canvas is
//! dropped; ink left or right of the measured span is a render error.
//!
//! ## Sizing
//!
//! ```text
//! pixels per em = point_size × dpi / 72
//! 14 pt at 72 dpi → 14 px/em
//! ```

use image::{GrayImage, Luma};

use crate::error::{MaskError, Result};

/// A font the rasterizer can measure and draw with.
///
/// Implemented by [`crate::font::TtfFace`] (outline fonts via ab_glyph) and
/// [`crate::font::SpleenFace`] (built-in bitmap font).
pub trait Typeface {
    /// Horizontal advance of `ch` in pixels.
    fn advance(&self, ch: char, px_per_em: f32) -> f32;

    /// Kerning adjustment between two adjacent characters, in pixels.
    fn kern(&self, _left: char, _right: char, _px_per_em: f32) -> f32 {
        0.0
    }

    /// Draw `ch` with its baseline origin at `origin`.
    ///
    /// `plot(x, y, coverage)` receives canvas coordinates, which may fall
    /// outside the canvas, and coverage in `0.0..=1.0`.
    fn draw(
        &self,
        ch: char,
        px_per_em: f32,
        origin: (f32, f32),
        plot: &mut dyn FnMut(i32, i32, f32),
    ) -> Result<()>;
}

/// Size and placement of rendered text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in points
    pub point_size: f32,

    /// Output resolution
    pub dpi: f32,

    /// Baseline offset from the top edge in pixels; `None` uses the canvas height
    pub baseline: Option<f32>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            point_size: 14.0,
            dpi: 72.0,
            baseline: None,
        }
    }
}

impl TextStyle {
    #[inline]
    pub fn px_per_em(&self) -> f32 {
        self.point_size * self.dpi / 72.0
    }

    fn checked_px_per_em(&self) -> Result<f32> {
        let px = self.px_per_em();
        if !px.is_finite() || px <= 0.0 {
            return Err(MaskError::Render(format!(
                "invalid text size {} pt at {} dpi",
                self.point_size, self.dpi
            )));
        }
        Ok(px)
    }
}

/// Glyph positions for one line.
struct Layout {
    glyphs: Vec<(char, f32)>,
    width: f32,
}

fn layout<F: Typeface + ?Sized>(text: &str, face: &F, px_per_em: f32) -> Result<Layout> {
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut previous: Option<char> = None;

    for ch in text.chars() {
        if let Some(left) = previous {
            caret += face.kern(left, ch, px_per_em);
        }
        glyphs.push((ch, caret));
        caret += face.advance(ch, px_per_em);
        previous = Some(ch);

        if !caret.is_finite() {
            return Err(MaskError::Render(format!(
                "non-finite advance at {:?}",
                ch
            )));
        }
    }

    Ok(Layout {
        glyphs,
        width: caret.max(0.0),
    })
}

fn canvas_width(width: f32) -> Result<u32> {
    let ceiled = width.ceil();
    if ceiled > u32::MAX as f32 {
        return Err(MaskError::Render(format!(
            "text width {} does not fit a canvas",
            width
        )));
    }
    Ok(ceiled as u32)
}

/// Horizontal extent of a line: its advances widened by any ink overhang.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    /// Ink columns left of the first glyph origin
    offset: u32,
    width: u32,
}

fn draw_glyph<F: Typeface + ?Sized>(
    face: &F,
    ch: char,
    px_per_em: f32,
    origin: (f32, f32),
    plot: &mut dyn FnMut(i32, i32, f32),
) -> Result<()> {
    face.draw(ch, px_per_em, origin, plot).map_err(|e| match e {
        MaskError::Render(msg) => MaskError::Render(msg),
        other => MaskError::Render(format!("drawing {:?}: {}", ch, other)),
    })
}

/// Find the columns a line inks without allocating a canvas.
///
/// Only the sub-pixel part of the baseline can change which columns are
/// inked, so `baseline_fract` is all the vertical placement needed.
fn span<F: Typeface + ?Sized>(
    layout: &Layout,
    face: &F,
    px_per_em: f32,
    baseline_fract: f32,
) -> Result<Span> {
    let mut left = 0i64;
    let mut right = canvas_width(layout.width)? as i64;

    for &(ch, x) in &layout.glyphs {
        draw_glyph(face, ch, px_per_em, (x, baseline_fract), &mut |px, _, c| {
            if c > 0.0 {
                left = left.min(px as i64);
                right = right.max(px as i64 + 1);
            }
        })?;
    }

    let too_wide = || MaskError::Render(format!("text spans {}..{} px", left, right));
    Ok(Span {
        offset: u32::try_from(-left).map_err(|_| too_wide())?,
        width: u32::try_from(right - left).map_err(|_| too_wide())?,
    })
}

/// Measure the width of the canvas `text` needs.
///
/// That is the sum of advances and kerning, widened where glyph ink hangs
/// past the first origin or the final caret.
pub fn measure<F: Typeface + ?Sized>(text: &str, face: &F, style: &TextStyle) -> Result<u32> {
    let px_per_em = style.checked_px_per_em()?;
    let layout = layout(text, face, px_per_em)?;
    let baseline = style.baseline.unwrap_or(0.0);
    Ok(span(&layout, face, px_per_em, baseline.fract())?.width)
}

/// Render `text` into a `width × rows` grayscale canvas.
///
/// The canvas fits every inked column; ink above or below the `rows` rows is
/// clipped. Empty text yields a canvas with zero columns.
pub fn rasterize<F: Typeface + ?Sized>(
    text: &str,
    face: &F,
    style: &TextStyle,
    rows: u32,
) -> Result<GrayImage> {
    let px_per_em = style.checked_px_per_em()?;
    let layout = layout(text, face, px_per_em)?;
    let baseline = style.baseline.unwrap_or(rows as f32);
    let span = span(&layout, face, px_per_em, baseline.fract())?;
    log::debug!(
        "text {:?} measures {} px ({} px left overhang)",
        text,
        span.width,
        span.offset
    );

    let (w, h) = (span.width as usize, rows as usize);
    let shift = span.offset as f32;
    let mut coverage = vec![0.0f32; w * h];
    let mut stray: Option<(char, i32)> = None;

    let mut caret = 0.0f32;
    let mut previous: Option<char> = None;
    for &(ch, x) in &layout.glyphs {
        if let Some(left) = previous {
            caret += face.kern(left, ch, px_per_em);
        }
        draw_glyph(face, ch, px_per_em, (x + shift, baseline), &mut |px, py, c| {
            if c <= 0.0 {
                return;
            }
            if px < 0 || px as usize >= w {
                stray = stray.or(Some((ch, px)));
            } else if py >= 0 && (py as usize) < h {
                let idx = py as usize * w + px as usize;
                coverage[idx] = (coverage[idx] + c).min(1.0);
            }
        })?;
        caret += face.advance(ch, px_per_em);
        previous = Some(ch);
    }

    if let Some((ch, px)) = stray {
        return Err(MaskError::Render(format!(
            "{:?} drew at x={} outside the measured {} px",
            ch, px, w
        )));
    }
    if canvas_width(caret.max(0.0))? != canvas_width(layout.width)? {
        return Err(MaskError::Render(format!(
            "draw pass ended at {} px but measured {} px",
            caret, layout.width
        )));
    }

    Ok(GrayImage::from_fn(span.width, rows, |x, y| {
        let c = coverage[y as usize * w + x as usize];
        Luma([(c * 255.0).round() as u8])
    }))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Every glyph is a solid 4×8 block on a 5-pixel advance.
    struct BlockFace;

    impl Typeface for BlockFace {
        fn advance(&self, ch: char, _px_per_em: f32) -> f32 {
            if ch == ' ' { 3.0 } else { 5.0 }
        }

        fn draw(
            &self,
            ch: char,
            _px_per_em: f32,
            origin: (f32, f32),
            plot: &mut dyn FnMut(i32, i32, f32),
        ) -> Result<()> {
            if ch == ' ' {
                return Ok(());
            }
            let (ox, oy) = (origin.0 as i32, origin.1 as i32);
            for y in (oy - 8)..oy {
                for x in ox..ox + 4 {
                    plot(x, y, 1.0);
                }
            }
            Ok(())
        }
    }

    /// Advances drift between calls, so measurement and drawing disagree.
    struct DriftingFace {
        calls: Cell<u32>,
    }

    impl Typeface for DriftingFace {
        fn advance(&self, _ch: char, _px_per_em: f32) -> f32 {
            let n = self.calls.get();
            self.calls.set(n + 1);
            5.0 + n as f32
        }

        fn draw(
            &self,
            _ch: char,
            _px_per_em: f32,
            _origin: (f32, f32),
            _plot: &mut dyn FnMut(i32, i32, f32),
        ) -> Result<()> {
            Ok(())
        }
    }

    /// Blocks `ink` pixels wide starting `lead` pixels before the origin, on a
    /// 5-pixel advance.
    struct OverhangFace {
        lead: i32,
        ink: i32,
    }

    impl Typeface for OverhangFace {
        fn advance(&self, _ch: char, _px_per_em: f32) -> f32 {
            5.0
        }

        fn draw(
            &self,
            _ch: char,
            _px_per_em: f32,
            origin: (f32, f32),
            plot: &mut dyn FnMut(i32, i32, f32),
        ) -> Result<()> {
            let (ox, oy) = (origin.0 as i32 - self.lead, origin.1 as i32);
            for y in (oy - 8)..oy {
                for x in ox..ox + self.ink {
                    plot(x, y, 1.0);
                }
            }
            Ok(())
        }
    }

    /// Draws further right on every call.
    struct WanderingFace {
        calls: Cell<i32>,
    }

    impl Typeface for WanderingFace {
        fn advance(&self, _ch: char, _px_per_em: f32) -> f32 {
            5.0
        }

        fn draw(
            &self,
            _ch: char,
            _px_per_em: f32,
            origin: (f32, f32),
            plot: &mut dyn FnMut(i32, i32, f32),
        ) -> Result<()> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            plot(origin.0 as i32 + 10 * n, 0, 1.0);
            Ok(())
        }
    }

    struct BrokenFace;

    impl Typeface for BrokenFace {
        fn advance(&self, _ch: char, _px_per_em: f32) -> f32 {
            5.0
        }

        fn draw(
            &self,
            ch: char,
            _px_per_em: f32,
            _origin: (f32, f32),
            _plot: &mut dyn FnMut(i32, i32, f32),
        ) -> Result<()> {
            Err(MaskError::FontUnavailable(format!("no outline for {:?}", ch)))
        }
    }

    #[test]
    fn test_px_per_em() {
        assert_eq!(TextStyle::default().px_per_em(), 14.0);
        let style = TextStyle {
            point_size: 12.0,
            dpi: 144.0,
            baseline: None,
        };
        assert_eq!(style.px_per_em(), 24.0);
    }

    #[test]
    fn test_measure() {
        let style = TextStyle::default();
        assert_eq!(measure("AB", &BlockFace, &style).unwrap(), 10);
        assert_eq!(measure("A B", &BlockFace, &style).unwrap(), 13);
        assert_eq!(measure("", &BlockFace, &style).unwrap(), 0);
    }

    #[test]
    fn test_canvas_size() {
        let canvas = rasterize("AB", &BlockFace, &TextStyle::default(), 12).unwrap();
        assert_eq!(canvas.dimensions(), (10, 12));
    }

    #[test]
    fn test_glyphs_drawn_at_baseline() {
        let canvas = rasterize("A", &BlockFace, &TextStyle::default(), 12).unwrap();
        // Block spans rows 4..12 and columns 0..4
        assert_eq!(canvas.get_pixel(0, 4).0[0], 255);
        assert_eq!(canvas.get_pixel(3, 11).0[0], 255);
        assert_eq!(canvas.get_pixel(0, 3).0[0], 0);
        assert_eq!(canvas.get_pixel(4, 8).0[0], 0);
    }

    #[test]
    fn test_custom_baseline_clips() {
        let style = TextStyle {
            baseline: Some(6.0),
            ..Default::default()
        };
        let canvas = rasterize("A", &BlockFace, &style, 12).unwrap();
        // Rows -2..6; the two rows above the canvas are dropped
        assert_eq!(canvas.get_pixel(0, 0).0[0], 255);
        assert_eq!(canvas.get_pixel(0, 5).0[0], 255);
        assert_eq!(canvas.get_pixel(0, 6).0[0], 0);
    }

    #[test]
    fn test_empty_text() {
        let canvas = rasterize("", &BlockFace, &TextStyle::default(), 12).unwrap();
        assert_eq!(canvas.dimensions(), (0, 12));
    }

    #[test]
    fn test_invalid_size() {
        let style = TextStyle {
            point_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            rasterize("A", &BlockFace, &style, 12),
            Err(MaskError::Render(_))
        ));
        let style = TextStyle {
            dpi: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            measure("A", &BlockFace, &style),
            Err(MaskError::Render(_))
        ));
    }

    #[test]
    fn test_measure_draw_disagreement() {
        let face = DriftingFace {
            calls: Cell::new(0),
        };
        assert!(matches!(
            rasterize("AB", &face, &TextStyle::default(), 12),
            Err(MaskError::Render(_))
        ));
    }

    #[test]
    fn test_draw_failure_is_render_error() {
        assert!(matches!(
            rasterize("A", &BrokenFace, &TextStyle::default(), 12),
            Err(MaskError::Render(_))
        ));
    }

    #[test]
    fn test_right_overhang_widens_canvas() {
        let face = OverhangFace { lead: 0, ink: 8 };
        let style = TextStyle::default();
        let canvas = rasterize("A", &face, &style, 12).unwrap();

        assert_eq!(canvas.dimensions(), (8, 12));
        assert_eq!(measure("A", &face, &style).unwrap(), 8);
        assert_eq!(canvas.get_pixel(7, 11).0[0], 255);
    }

    #[test]
    fn test_left_overhang_shifts_canvas() {
        let face = OverhangFace { lead: 2, ink: 4 };
        let canvas = rasterize("AB", &face, &TextStyle::default(), 12).unwrap();

        // Ink spans -2..7 around advances 0..10
        assert_eq!(canvas.dimensions(), (12, 12));
        assert_eq!(canvas.get_pixel(0, 11).0[0], 255);
        assert_eq!(canvas.get_pixel(4, 11).0[0], 0);
        assert_eq!(canvas.get_pixel(5, 11).0[0], 255);
        assert_eq!(canvas.get_pixel(11, 11).0[0], 0);
    }

    #[test]
    fn test_overhang_inside_advance_keeps_width() {
        let face = OverhangFace { lead: 0, ink: 3 };
        assert_eq!(measure("ABC", &face, &TextStyle::default()).unwrap(), 15);
    }

    #[test]
    fn test_ink_outside_measured_span_is_render_error() {
        let face = WanderingFace {
            calls: Cell::new(0),
        };
        assert!(matches!(
            rasterize("A", &face, &TextStyle::default(), 12),
            Err(MaskError::Render(_))
        ));
    }
}

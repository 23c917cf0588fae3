//! # Diagnostic Dumps
//!
//! Optional snapshots of intermediate pipeline images, for eyeballing what
//! the mask will show. The pipeline hands images to an injected
//! [`DiagnosticSink`]; the default [`NoopSink`] discards them, so encoding
//! never touches the filesystem unless asked to.
//!
//! | Stage | Image |
//! |-------|-------|
//! | `text-canvas` | grayscale text canvas before thresholding |
//! | `normalized` | source image after crop and resize |
//! | `masked` | lit pixels in source color, unlit pixels black |
//!
//! Dump failures are logged and never abort a conversion.

use image::DynamicImage;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline point an image was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    TextCanvas,
    Normalized,
    Masked,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::TextCanvas => "text-canvas",
            Stage::Normalized => "normalized",
            Stage::Masked => "masked",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receiver for diagnostic images.
pub trait DiagnosticSink: Send + Sync {
    /// Whether dumps are wanted; when `false` the pipeline skips building them.
    fn enabled(&self) -> bool {
        true
    }

    fn dump(&self, stage: Stage, image: &DynamicImage);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn enabled(&self) -> bool {
        false
    }

    fn dump(&self, _stage: Stage, _image: &DynamicImage) {}
}

/// Writes each stage to `<dir>/<stage>.png`, overwriting earlier dumps.
#[derive(Debug, Clone)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stage: Stage) -> PathBuf {
        self.dir.join(format!("{}.png", stage.name()))
    }
}

impl DiagnosticSink for PngDirSink {
    fn dump(&self, stage: Stage, image: &DynamicImage) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            log::warn!("cannot create dump dir {}: {}", self.dir.display(), e);
            return;
        }
        let path = self.path_for(stage);
        match image.save_with_format(&path, image::ImageFormat::Png) {
            Ok(()) => log::debug!("wrote {} dump to {}", stage, path.display()),
            Err(e) => log::warn!("failed to write {} dump to {}: {}", stage, path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::TextCanvas.to_string(), "text-canvas");
        assert_eq!(Stage::Normalized.name(), "normalized");
        assert_eq!(Stage::Masked.name(), "masked");
    }

    #[test]
    fn test_noop_disabled() {
        assert!(!NoopSink.enabled());
    }

    #[test]
    fn test_png_sink_writes_file() {
        let dir = std::env::temp_dir().join(format!("ledmask-sink-{}", std::process::id()));
        let sink = PngDirSink::new(&dir);
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 12, Luma([255])));

        sink.dump(Stage::Masked, &img);

        let written = image::open(sink.path_for(Stage::Masked)).unwrap();
        assert_eq!((written.width(), written.height()), (4, 12));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_png_sink_failure_is_swallowed() {
        // A file where the directory should be
        let blocker = std::env::temp_dir().join(format!("ledmask-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"x").unwrap();
        let sink = PngDirSink::new(blocker.join("nested"));
        let img = DynamicImage::ImageLuma8(GrayImage::new(1, 1));

        sink.dump(Stage::Normalized, &img);

        assert!(!sink.path_for(Stage::Normalized).exists());
        let _ = std::fs::remove_file(&blocker);
    }
}

//! Image decoding and encoding at the edges of the pipeline.
//!
//! Decoding goes through the `image` crate. HEIC/HEIF photos are decoded
//! with libheif when the `heif` feature is enabled.

use image::DynamicImage;
use std::path::Path;

use crate::error::{MaskError, Result};
use crate::render::threshold::Bitmap;

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let img = decode_image(&data)
        .map_err(|e| MaskError::Image(format!("{}: {}", path.display(), e)))?;
    log::debug!(
        "decoded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img)
}

/// Decode an in-memory image, sniffing the format.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    if is_heic(data) {
        return decode_heic(data);
    }
    image::load_from_memory(data)
        .map_err(|e| MaskError::Image(format!("Failed to decode image: {}", e)))
}

/// ISO-BMFF major brands decoded through libheif
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"hevm", b"hevs", b"mif1", b"msf1",
];

/// Sniff a HEIF container: bytes 4..8 are the `ftyp` box tag and 8..12 its
/// major brand.
pub fn is_heic(data: &[u8]) -> bool {
    match (data.get(4..8), data.get(8..12)) {
        (Some(b"ftyp"), Some(brand)) => HEIF_BRANDS.iter().any(|b| &b[..] == brand),
        _ => false,
    }
}

#[cfg(feature = "heif")]
fn decode_heic(data: &[u8]) -> Result<DynamicImage> {
    use image::RgbImage;
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx = HeifContext::read_from_bytes(data)
        .map_err(|e| MaskError::Image(format!("Failed to read HEIC: {}", e)))?;

    let handle = ctx
        .primary_image_handle()
        .map_err(|e| MaskError::Image(format!("Failed to get primary image: {}", e)))?;

    let decoded = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| MaskError::Image(format!("Failed to decode HEIC image: {}", e)))?;

    let planes = decoded.planes();
    let interleaved = planes
        .interleaved
        .ok_or_else(|| MaskError::Image("No interleaved RGB data in HEIC".to_string()))?;

    let width = decoded.width();
    let height = decoded.height();
    let stride = interleaved.stride;
    let pixels = interleaved.data;

    let rgb_image = RgbImage::from_fn(width, height, |x, y| {
        let offset = y as usize * stride + x as usize * 3;
        match pixels.get(offset..offset + 3) {
            Some(&[r, g, b]) => image::Rgb([r, g, b]),
            _ => image::Rgb([0, 0, 0]),
        }
    });

    Ok(DynamicImage::ImageRgb8(rgb_image))
}

#[cfg(not(feature = "heif"))]
fn decode_heic(_data: &[u8]) -> Result<DynamicImage> {
    Err(MaskError::Image(
        "HEIC input requires the `heif` feature".to_string(),
    ))
}

/// Save a bitmap as a PNG, lit pixels white, scaled up by `scale`.
pub fn save_bitmap_png(
    path: impl AsRef<Path>,
    bitmap: &Bitmap,
    rows: u32,
    scale: u32,
) -> Result<()> {
    let path = path.as_ref();
    let scale = scale.max(1);
    let gray = bitmap.to_gray_image(rows);
    let img = image::imageops::resize(
        &gray,
        gray.width() * scale,
        gray.height() * scale,
        image::imageops::FilterType::Nearest,
    );

    img.save(path)
        .map_err(|e| MaskError::Image(format!("Failed to save PNG {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_is_heic() {
        let mut data = vec![0u8; 16];
        data[4..8].copy_from_slice(b"ftyp");
        data[8..12].copy_from_slice(b"heic");
        assert!(is_heic(&data));

        data[8..12].copy_from_slice(b"isom");
        assert!(!is_heic(&data));
        assert!(!is_heic(b"short"));
        // Truncated before the brand
        assert!(!is_heic(&data[..10]));

        data[8..12].copy_from_slice(b"mif1");
        assert!(is_heic(&data));
    }

    #[test]
    fn test_decode_png() {
        let img = RgbImage::from_pixel(5, 3, Rgb([1, 2, 3]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let decoded = decode_image(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(MaskError::Image(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_image("/nonexistent/photo.png"),
            Err(MaskError::Io(_))
        ));
    }
}

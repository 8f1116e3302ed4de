use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::IngestError;
use crate::state::data::TierItem;

/// Longest side of a stored thumbnail
///
/// Export draws tiles at 96 layout pixels with a 2x pixel ratio, so 256
/// leaves headroom without keeping full-size photos in memory.
pub const THUMBNAIL_SIZE: u32 = 256;

/// Decode an encoded image and turn it into a board item
pub fn item_from_bytes(bytes: &[u8], name: Option<String>) -> Result<TierItem, IngestError> {
    let label = name.clone().unwrap_or_else(|| "<memory>".to_string());

    let img = image::load_from_memory(bytes).map_err(|e| IngestError::Decode {
        name: label.clone(),
        reason: e.to_string(),
    })?;

    let thumbnail = shrink(img);
    let url = to_data_url(&thumbnail).map_err(|reason| IngestError::Encode {
        name: label,
        reason,
    })?;

    let rgba = thumbnail.into_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TierItem::new(url, name, width, height, rgba.into_raw()))
}

/// Fit the image inside the thumbnail box, never upscaling
fn shrink(img: DynamicImage) -> DynamicImage {
    if img.width() <= THUMBNAIL_SIZE && img.height() <= THUMBNAIL_SIZE {
        img
    } else {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
    }
}

/// Encode as PNG and wrap in a `data:` URL
pub fn to_data_url(img: &DynamicImage) -> Result<String, String> {
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([30, 120, 200, 255]),
    ));
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();
    png
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_image_is_shrunk() {
        let item = item_from_bytes(&png_bytes(1024, 512), Some("wide.png".into())).unwrap();
        assert_eq!((item.width, item.height), (256, 128));
        assert!(item.url.starts_with("data:image/png;base64,"));
        assert_eq!(item.name.as_deref(), Some("wide.png"));
    }

    #[test]
    fn test_small_image_is_kept() {
        let item = item_from_bytes(&png_bytes(40, 30), None).unwrap();
        assert_eq!((item.width, item.height), (40, 30));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = item_from_bytes(b"definitely not an image", Some("x.png".into())).unwrap_err();
        assert!(matches!(err, IngestError::Decode { ref name, .. } if name == "x.png"));
    }

    #[test]
    fn test_data_url_roundtrips_through_decoder() {
        let img = image::load_from_memory(&png_bytes(8, 8)).unwrap();
        let url = to_data_url(&img).unwrap();
        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = STANDARD.decode(payload).unwrap();
        assert_eq!(image::load_from_memory(&decoded).unwrap().width(), 8);
    }
}

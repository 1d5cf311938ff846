// ============================================================================
// IMAGE CODEC — bytes in, RGBA out; RGBA in, PNG/base64 out
// ============================================================================
//
// Everything the engine works on is RGBA8. Uploads in any accepted format
// (PNG, JPEG, WEBP, BMP) are converted on decode; viewer transport is always
// PNG wrapped in a `data:image/png;base64,` URI, which is what the browser
// <img> tag and the plotting widget's background-image layer consume.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::{ImageOutputFormat, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Prefix for viewer-bound encoded images.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Dimensions of the placeholder canvas shown before the first upload.
pub const DEFAULT_CANVAS_WIDTH: u32 = 640;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 480;

/// Decode raw upload bytes into an RGBA raster.
/// The container format is sniffed from the bytes, not the filename.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let dynamic = image::load_from_memory(bytes).map_err(Error::UnsupportedFormat)?;
    Ok(dynamic.into_rgba8())
}

/// Decode a browser upload `data:image/...;base64,` URI (or a bare base64
/// payload) into an RGBA raster.
pub fn decode_data_uri(uri: &str) -> Result<RgbaImage> {
    let payload = match uri.split_once(";base64,") {
        Some((_, b64)) => b64,
        None if uri.starts_with("data:") => {
            return Err(Error::BadDataUri("missing ';base64,' marker".into()));
        }
        None => uri,
    };
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::BadDataUri(e.to_string()))?;
    decode(&bytes)
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .map_err(Error::Encode)?;
    Ok(buf)
}

/// Encode a raster as a displayable PNG data URI.
pub fn to_data_uri(image: &RgbaImage) -> Result<String> {
    let png = encode_png(image)?;
    let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len() * 4 / 3 + 4);
    uri.push_str(PNG_DATA_URI_PREFIX);
    general_purpose::STANDARD.encode_string(&png, &mut uri);
    Ok(uri)
}

/// Blank white canvas, used as the placeholder image before the first upload.
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let mut img = blank_canvas(8, 6);
        img.put_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let png = encode_png(&img).unwrap();
        let back = decode(&png).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn data_uri_round_trip() {
        let img = blank_canvas(4, 4);
        let uri = to_data_uri(&img).unwrap();
        assert!(uri.starts_with(PNG_DATA_URI_PREFIX));
        let back = decode_data_uri(&uri).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn data_uri_without_marker_is_rejected() {
        let err = decode_data_uri("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, Error::BadDataUri(_)));
    }
}

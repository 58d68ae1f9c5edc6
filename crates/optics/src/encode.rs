use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::warn;

use crate::raster::RasterImage;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to encode raster image as PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Encodes the image losslessly as PNG bytes.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_bytes(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// Encodes the image as an embeddable `data:image/png;base64,...` URI.
///
/// Encoder failure degrades to an empty reference so a single broken
/// artifact cannot take down the whole filter graph; callers must tolerate
/// the empty string.
pub fn to_data_uri(image: &RasterImage) -> String {
    match encode_png(image) {
        Ok(bytes) => format!("data:image/png;base64,{}", STANDARD.encode(bytes)),
        Err(err) => {
            warn!(
                width = image.width(),
                height = image.height(),
                error = %err,
                "raster encoding failed; emitting empty image reference"
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_bytes_carry_the_signature() {
        let image = RasterImage::filled(8, 8, [128, 128, 0, 255]);
        let bytes = encode_png(&image).expect("encode");
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn data_uri_is_prefixed_and_nonempty() {
        let image = RasterImage::filled(4, 4, [0, 0, 0, 0]);
        let uri = to_data_uri(&image);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(uri.len() > "data:image/png;base64,".len());
    }
}

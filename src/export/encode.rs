//! Encoding the flattened image into a portable file format.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", tag = "kind")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ExportFormat {
    /// Lossless, keeps the alpha channel.
    #[default]
    Png,
    /// Lossy, alpha is dropped.
    Jpeg {
        #[serde(default = "default_quality")]
        quality: u8,
    },
}

fn default_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl ExportFormat {
    /// JPEG at the default quality.
    pub fn jpeg() -> Self {
        Self::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Encodes an image, returning the encoder's error message on failure.
pub fn encode(image: RgbaImage, format: ExportFormat) -> Result<Vec<u8>, String> {
    let mut cursor = Cursor::new(Vec::new());
    match format {
        ExportFormat::Png => {
            image
                .write_to(&mut cursor, ImageFormat::Png)
                .map_err(|e| e.to_string())?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100))
                .encode_image(&rgb)
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(cursor.into_inner())
}

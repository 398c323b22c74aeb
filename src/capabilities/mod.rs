mod image;

pub use self::image::ImageGenerator;

use std::{io::Cursor, path::Path};

use ::image::{DynamicImage, ImageFormat};

use crate::errors::{GeneratorError, Result};

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// A decoded raster image supplied as model input.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub label: String,
    pub image: DynamicImage,
}

impl ReferenceImage {
    pub fn new(label: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }

    /// Loads and decodes an image file. `role` names the image in error
    /// messages. A missing or undecodable file is an input error, not an I/O
    /// error: nothing has been sent yet.
    pub fn open(role: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeneratorError::invalid_input(format!(
                "{role} image not found: {}",
                path.display()
            )));
        }

        let image = ::image::open(path).map_err(|err| {
            GeneratorError::invalid_input(format!("failed to decode {}: {err}", path.display()))
        })?;

        Ok(Self::new(path.display().to_string(), image))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Re-encodes the raster as PNG for transmission.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|err| {
                GeneratorError::invalid_input(format!("failed to encode {}: {err}", self.label))
            })?;
        Ok(buffer)
    }
}

/// The single image extracted from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_IMAGE_MIME.to_string()
        } else {
            mime_type
        };
        Self { data, mime_type }
    }

    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

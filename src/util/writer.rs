use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use tokio::fs;
use tracing::info;

use crate::{
    capabilities::GeneratedImage,
    errors::{GeneratorError, Result},
};

/// Standard, padded base64 of the image bytes.
pub fn encode_base64(image: &GeneratedImage) -> String {
    let encoded = BASE64_STANDARD.encode(&image.data);
    info!(target: "writer", chars = encoded.len(), "converted image to base64");
    encoded
}

pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(encoded.as_bytes())
        .map_err(|err| GeneratorError::invalid_input(format!("invalid base64 payload: {err}")))
}

/// Writes the image bytes to `path`, replacing any existing file. The parent
/// directory must already exist.
pub async fn persist(image: &GeneratedImage, path: &Path) -> Result<()> {
    fs::write(path, &image.data).await?;
    info!(
        target: "writer",
        path = %path.display(),
        bytes = image.data.len(),
        "image written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trip_preserves_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let image = GeneratedImage::new(bytes.clone(), "image/png");

        let encoded = encode_base64(&image);
        assert_eq!(decode_base64(&encoded).unwrap(), bytes);
    }

    #[tokio::test]
    async fn persist_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"old contents that are longer").unwrap();

        persist(&GeneratedImage::new(b"new".to_vec(), "image/png"), &path)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn persist_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let err = persist(&GeneratedImage::new(b"x".to_vec(), "image/png"), &path)
            .await
            .unwrap_err();
        assert!(matches!(err, GeneratorError::Io(_)));
    }
}

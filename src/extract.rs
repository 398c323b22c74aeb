use tracing::{debug, info, warn};

use crate::{
    capabilities::GeneratedImage,
    errors::{GeneratorError, Result},
    providers::{ModelResponse, ResponsePart},
};

/// Returns the first inline image of the response.
///
/// Text parts are logged and otherwise ignored. Any image after the first is
/// discarded: callers only ever receive one image per request.
pub fn extract(response: ModelResponse) -> Result<GeneratedImage> {
    let ModelResponse {
        parts,
        finish_reason,
    } = response;

    for part in parts {
        match part {
            ResponsePart::Text(text) => {
                debug!(target: "extract", %text, "model commentary");
            }
            ResponsePart::InlineImage { data, mime_type } => {
                let image = GeneratedImage::new(data, mime_type);
                info!(
                    target: "extract",
                    bytes = image.data.len(),
                    mime_type = %image.mime_type,
                    "received image data"
                );
                return Ok(image);
            }
        }
    }

    warn!(target: "extract", finish_reason = ?finish_reason, "no image data found in response");
    Err(GeneratorError::NoImageProduced { finish_reason })
}

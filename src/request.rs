//! Assembly of the outbound multimodal request.
//!
//! A request is always `[instruction ++ prompt, image₁?, image₂?]`: the text
//! part leads, and images follow in the order the prompt refers to them.

use crate::{
    capabilities::ReferenceImage,
    errors::{GeneratorError, Result},
};

/// Fixed instruction placed ahead of every caller prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are an image generator. Create a stunning, detailed image based on the prompt. \
The artwork should be high quality and visually appealing. \
CRITICAL: The artwork MUST fill the ENTIRE image frame from edge to edge. \
NO borders, NO frames, NO white space, NO black bars. \
The image should bleed to all four edges.";

pub const MAX_REFERENCE_IMAGES: usize = 2;

#[derive(Debug, Clone)]
pub enum RequestPart {
    Text(String),
    Image(ReferenceImage),
}

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    parts: Vec<RequestPart>,
}

impl OutboundRequest {
    pub fn parts(&self) -> &[RequestPart] {
        &self.parts
    }

    /// The combined instruction and prompt text.
    pub fn text(&self) -> &str {
        match self.parts.first() {
            Some(RequestPart::Text(text)) => text,
            _ => "",
        }
    }

    pub fn images(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.parts.iter().filter_map(|part| match part {
            RequestPart::Image(image) => Some(image),
            RequestPart::Text(_) => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.images().count()
    }
}

pub fn build(prompt: &str, images: Vec<ReferenceImage>) -> Result<OutboundRequest> {
    if prompt.is_empty() {
        return Err(GeneratorError::invalid_input("Prompt is required"));
    }

    if images.len() > MAX_REFERENCE_IMAGES {
        return Err(GeneratorError::invalid_input(format!(
            "at most {MAX_REFERENCE_IMAGES} reference images are supported, got {}",
            images.len()
        )));
    }

    let mut parts = Vec::with_capacity(1 + images.len());
    parts.push(RequestPart::Text(format!("{SYSTEM_INSTRUCTION}\n\n{prompt}")));
    parts.extend(images.into_iter().map(RequestPart::Image));

    Ok(OutboundRequest { parts })
}

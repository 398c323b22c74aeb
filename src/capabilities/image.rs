use crate::{
    capabilities::{GeneratedImage, ReferenceImage},
    errors::Result,
    extract::extract,
    providers::ImageModel,
    request,
};
use tracing::info;

const PROMPT_PREVIEW_CHARS: usize = 100;

/// Builder → model → extractor, one request per call and no shared state.
pub struct ImageGenerator<M> {
    model: M,
}

impl<M: ImageModel> ImageGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub async fn generate(
        &self,
        prompt: &str,
        images: Vec<ReferenceImage>,
    ) -> Result<GeneratedImage> {
        let request = request::build(prompt, images)?;

        info!(
            target: "image_generator",
            prompt = %preview(prompt),
            images = request.image_count(),
            "generating image"
        );
        info!(target: "image_generator", "this may take 30-60 seconds...");

        let response = self.model.invoke(&request).await?;
        info!(
            target: "image_generator",
            parts = response.parts.len(),
            "API request successful"
        );

        extract(response)
    }
}

fn preview(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(PROMPT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

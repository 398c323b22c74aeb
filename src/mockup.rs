//! One-shot product mockup: two reference images in, one file out.

use std::{path::PathBuf, process::ExitCode};

use tracing::{info, warn};

use crate::{
    capabilities::{GeneratedImage, ImageGenerator, ReferenceImage},
    config::{AppConfig, GeminiConfig},
    errors::{GeneratorError, Result},
    providers::ImageModel,
    util::persist,
};

/// Prompt for compositing the illustration (first image) onto the object
/// (second image).
pub const MOCKUP_PROMPT: &str = "Create a realistic product mockup image that combines the illustration from the first image with the object from the second image. \
CRITICAL: The illustration must look IDENTICAL to the original - same colors, same details, same style. \
Do not modify, reinterpret, or change the illustration in any way. \
Remove any background or other elements from the object, including watermarks. \
Make it look like a professional product photo for marketing or e-commerce. \
CRITICAL: Remove all watermarks or text overlays from the object.";

#[derive(Debug)]
pub struct MockupOutcome {
    pub path: PathBuf,
    pub image: GeneratedImage,
}

/// Generates the mockup and writes it to `config.mockup.output_path`.
///
/// `make_model` is only called once the credential is known to exist and
/// both reference images have been decoded.
pub async fn run<M, F>(config: &AppConfig, make_model: F) -> Result<MockupOutcome>
where
    M: ImageModel,
    F: FnOnce(&GeminiConfig) -> Result<M>,
{
    let gemini = config
        .gemini
        .as_ref()
        .ok_or(GeneratorError::MissingCredential)?;
    let paths = &config.mockup;

    let illustration = open_reference("Illustration", &paths.illustration_path)?;
    let object = open_reference("Object", &paths.object_path)?;

    let generator = ImageGenerator::new(make_model(gemini)?);
    let image = generator
        .generate(MOCKUP_PROMPT, vec![illustration, object])
        .await?;

    ::image::load_from_memory(&image.data).map_err(|err| {
        GeneratorError::service(format!("generated image could not be decoded: {err}"))
    })?;

    let expected_ext = image.file_extension();
    if paths
        .output_path
        .extension()
        .is_some_and(|ext| !ext.eq_ignore_ascii_case(expected_ext))
    {
        warn!(
            target: "mockup",
            mime_type = %image.mime_type,
            path = %paths.output_path.display(),
            "output extension does not match the generated image type"
        );
    }

    persist(&image, &paths.output_path).await?;

    Ok(MockupOutcome {
        path: paths.output_path.clone(),
        image,
    })
}

/// Runs the mockup and reports the result on the console.
pub async fn execute<M, F>(config: &AppConfig, make_model: F) -> ExitCode
where
    M: ImageModel,
    F: FnOnce(&GeminiConfig) -> Result<M>,
{
    println!("🔄 Generating product mockup with Gemini...");
    println!("⏳ This may take 30-60 seconds...");

    match run(config, make_model).await {
        Ok(outcome) => {
            info!(target: "mockup", bytes = outcome.image.data.len(), "mockup generated");
            println!(
                "🎉 Successfully generated and saved {}",
                outcome.path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}

pub fn failure_message(err: &GeneratorError) -> String {
    match err {
        GeneratorError::NoImageProduced {
            finish_reason: Some(reason),
        } => format!("⚠️ No image data found in response (finish reason: {reason})"),
        GeneratorError::NoImageProduced { finish_reason: None } => {
            "⚠️ No image data found in response".to_string()
        }
        other => format!("❌ Error: {other}"),
    }
}

fn open_reference(role: &str, path: &std::path::Path) -> Result<ReferenceImage> {
    let image = ReferenceImage::open(role, path)?;
    let (width, height) = image.dimensions();
    info!(target: "mockup", role, width, height, path = %path.display(), "loaded reference image");
    Ok(image)
}

use nanobanana::{
    capabilities::ImageGenerator,
    config::AppConfig,
    errors::Result,
    providers::GeminiImageModel,
    server,
    util::init_tracing,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load()?;

    let generator = match config.gemini.as_ref() {
        Some(gemini) => {
            let model = GeminiImageModel::from_config(gemini)?;
            info!(target: "server", model = model.model(), "using Gemini image model");
            Some(ImageGenerator::new(model))
        }
        None => {
            warn!(
                target: "server",
                "no API key configured; image generation requests will fail"
            );
            None
        }
    };

    let app = server::router(generator, &config.server.cors_origin)?;

    info!(
        target: "server",
        port = config.server.bind_addr.port(),
        cors_origin = %config.server.cors_origin,
        "starting image generation server"
    );
    server::run_server(config.server.bind_addr, app).await
}

use std::process::ExitCode;

use nanobanana::{config::AppConfig, mockup, providers::GeminiImageModel, util::init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    mockup::execute(&config, GeminiImageModel::from_config).await
}

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    capabilities::ImageGenerator,
    errors::{GeneratorError, Result},
    providers::ImageModel,
    util::encode_base64,
};

pub const GENERATE_IMAGE_PATH: &str = "/api/generate-image";

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub generated_images: Vec<EncodedImage>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub base64_image: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

struct AppState<M> {
    /// `None` when the process has no credential; every request then fails.
    generator: Option<Arc<ImageGenerator<M>>>,
}

impl<M> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            generator: self.generator.clone(),
        }
    }
}

pub fn router<M: ImageModel + 'static>(
    generator: Option<ImageGenerator<M>>,
    cors_origin: &str,
) -> Result<Router> {
    let origin = HeaderValue::from_str(cors_origin)
        .map_err(|err| GeneratorError::Config(format!("invalid CORS origin {cors_origin}: {err}")))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let state = AppState {
        generator: generator.map(Arc::new),
    };

    Ok(Router::new()
        .route(GENERATE_IMAGE_PATH, post(generate_image_handler::<M>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

pub async fn run_server(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(target: "server", %addr, "image generation server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| GeneratorError::service(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target: "server", error = ?err, "failed to listen for shutdown signal");
        return;
    }
    info!(target: "server", "shutdown signal received");
}

async fn generate_image_handler<M: ImageModel + 'static>(
    State(state): State<AppState<M>>,
    payload: std::result::Result<Json<GenerateImageRequest>, JsonRejection>,
) -> Response {
    let prompt = match payload {
        Ok(Json(GenerateImageRequest {
            prompt: Some(prompt),
        })) if !prompt.is_empty() => prompt,
        Ok(_) => return prompt_required(),
        Err(rejection) => {
            warn!(target: "server", error = %rejection, "unreadable request body");
            return prompt_required();
        }
    };

    info!(target: "server", "received request for image generation");

    let result = match &state.generator {
        Some(generator) => generator.generate(&prompt, Vec::new()).await,
        None => Err(GeneratorError::MissingCredential),
    };

    match result {
        Ok(image) => {
            let body = GenerateImageResponse {
                generated_images: vec![EncodedImage {
                    base64_image: encode_base64(&image),
                    mime_type: image.mime_type,
                }],
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            if err.is_precondition() {
                warn!(target: "server", error = %err, "image generation rejected");
            } else {
                error!(target: "server", error = %err, "image generation failed");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to generate image".to_string(),
                    details: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}

fn prompt_required() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "Prompt is required".to_string(),
            details: None,
        }),
    )
        .into_response()
}

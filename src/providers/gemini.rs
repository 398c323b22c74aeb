use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::GeminiConfig,
    errors::{GeneratorError, Result},
    providers::{ImageModel, ModelResponse, ResponsePart},
    request::{OutboundRequest, RequestPart},
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini `generateContent` over REST.
///
/// The HTTP client is built without a timeout: image generation routinely
/// takes 30-60 seconds and the deadline belongs to the caller.
#[derive(Clone)]
pub struct GeminiImageModel {
    http_client: HttpClient,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiImageModel {
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("nanobanana/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeneratorError::service(e.to_string()))?;

        let model = config
            .model
            .strip_prefix("models/")
            .unwrap_or(&config.model)
            .to_string();
        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            model
        );

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            model,
            endpoint,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ImageModel for GeminiImageModel {
    async fn invoke(&self, request: &OutboundRequest) -> Result<ModelResponse> {
        let payload = GenerateContentRequest::from_outbound(request)?;

        debug!(
            target: "gemini",
            model = %self.model,
            images = request.image_count(),
            "sending generateContent request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::service(format!(
                "Gemini API error ({status}): {body}"
            )));
        }

        let bytes = response.bytes().await?;
        let body: GenerateContentResponse = serde_json::from_slice(&bytes)?;
        body.into_model_response()
    }
}

#[derive(Serialize, Debug)]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
}

impl GenerateContentRequest {
    fn from_outbound(request: &OutboundRequest) -> Result<Self> {
        let parts = request
            .parts()
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => Ok(WireRequestPart::Text { text: text.clone() }),
                RequestPart::Image(image) => Ok(WireRequestPart::InlineData {
                    inline_data: WireBlob {
                        mime_type: "image/png".to_string(),
                        data: BASE64_STANDARD.encode(image.to_png()?),
                    },
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            contents: vec![WireContent {
                role: "user",
                parts,
            }],
        })
    }
}

#[derive(Serialize, Debug)]
struct WireContent {
    role: &'static str,
    parts: Vec<WireRequestPart>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum WireRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: WireBlob,
    },
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireBlob {
    #[serde(default, alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default, alias = "prompt_feedback")]
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireResponseContent>,
    #[serde(default, alias = "finish_reason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct WireResponseContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

// Parts may also carry thought signatures or function calls; only text and
// inline data are of interest here.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inline_data")]
    inline_data: Option<WireBlob>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    #[serde(default, alias = "block_reason")]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_model_response(self) -> Result<ModelResponse> {
        let block_reason = self.prompt_feedback.and_then(|feedback| feedback.block_reason);

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(ModelResponse {
                parts: Vec::new(),
                finish_reason: block_reason,
            });
        };

        let parts = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match (part.inline_data, part.text) {
                (Some(blob), _) => Some(
                    BASE64_STANDARD
                        .decode(blob.data.as_bytes())
                        .map(|data| ResponsePart::InlineImage {
                            data,
                            mime_type: blob.mime_type,
                        })
                        .map_err(|err| {
                            GeneratorError::service(format!(
                                "Gemini image base64 decode failed: {err}"
                            ))
                        }),
                ),
                (None, Some(text)) => Some(Ok(ResponsePart::Text(text))),
                (None, None) => None,
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ModelResponse {
            parts,
            finish_reason: candidate.finish_reason.or(block_reason),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capabilities::ReferenceImage, request};
    use image::{DynamicImage, RgbImage};
    use serde_json::{Value, json};

    fn parse(value: Value) -> Result<ModelResponse> {
        serde_json::from_value::<GenerateContentResponse>(value)
            .unwrap()
            .into_model_response()
    }

    #[test]
    fn endpoint_is_built_from_base_url_and_bare_model_name() {
        let mut config = GeminiConfig::new("key");
        config.model = "models/gemini-2.5-flash-image-preview".to_string();
        config.base_url = "http://localhost:8080/v1beta/".to_string();

        let model = GeminiImageModel::from_config(&config).unwrap();
        assert_eq!(model.model(), "gemini-2.5-flash-image-preview");
        assert_eq!(
            model.endpoint,
            "http://localhost:8080/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
        );
    }

    #[test]
    fn request_body_puts_text_first_then_png_images() {
        let image = ReferenceImage::new("tile", DynamicImage::ImageRgb8(RgbImage::new(2, 2)));
        let outbound = request::build("a tile", vec![image.clone()]).unwrap();

        let body = serde_json::to_value(GenerateContentRequest::from_outbound(&outbound).unwrap())
            .unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();

        assert_eq!(body["contents"][0]["role"], json!("user"));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], json!(outbound.text()));
        assert_eq!(parts[1]["inlineData"]["mimeType"], json!("image/png"));
        let data = parts[1]["inlineData"]["data"].as_str().unwrap();
        assert_eq!(
            BASE64_STANDARD.decode(data).unwrap(),
            image.to_png().unwrap()
        );
    }

    #[test]
    fn response_parts_keep_model_order() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Here is your image." },
                        { "thoughtSignature": "abc" },
                        { "inlineData": { "mimeType": "image/png", "data": BASE64_STANDARD.encode([1u8, 2, 3]) } },
                        { "inline_data": { "mime_type": "image/jpeg", "data": BASE64_STANDARD.encode([9u8]) } }
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(
            response.parts,
            vec![
                ResponsePart::Text("Here is your image.".to_string()),
                ResponsePart::InlineImage {
                    data: vec![1, 2, 3],
                    mime_type: "image/png".to_string(),
                },
                ResponsePart::InlineImage {
                    data: vec![9],
                    mime_type: "image/jpeg".to_string(),
                },
            ]
        );
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn blocked_prompt_yields_empty_parts_with_reason() {
        let response = parse(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        }))
        .unwrap();

        assert!(response.parts.is_empty());
        assert_eq!(response.finish_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn invalid_base64_is_a_service_error() {
        let err = parse(json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "***" } }] }
            }]
        }))
        .unwrap_err();

        assert!(matches!(err, GeneratorError::Service(msg) if msg.contains("base64")));
    }
}

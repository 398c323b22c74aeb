mod gemini;

pub use gemini::GeminiImageModel;

use std::future::Future;

use crate::{errors::Result, request::OutboundRequest};

/// One segment of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    InlineImage { data: Vec<u8>, mime_type: String },
}

/// Ordered parts returned by one model call. The order is the model's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    pub parts: Vec<ResponsePart>,
    /// Why generation stopped or was blocked, when the service says so.
    pub finish_reason: Option<String>,
}

impl ModelResponse {
    pub fn new(parts: Vec<ResponsePart>) -> Self {
        Self {
            parts,
            finish_reason: None,
        }
    }
}

/// A remote generative model reachable with a single blocking call.
///
/// Implementations perform exactly one outbound request per `invoke`, never
/// retry, and impose no timeout of their own.
pub trait ImageModel: Send + Sync {
    fn invoke(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<ModelResponse>> + Send;
}

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use nanobanana::{
    errors::{GeneratorError, Result},
    providers::{ImageModel, ModelResponse, ResponsePart},
    request::OutboundRequest,
};

#[derive(Clone)]
enum Reply {
    Response(ModelResponse),
    Failure(String),
}

/// What a [`FakeModel`] observed, shared with the test after the model has
/// been moved into a generator.
#[derive(Default)]
pub struct Observed {
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, usize)>>,
}

impl Observed {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(text, image_count)` for every request seen.
    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

pub struct FakeModel {
    reply: Reply,
    observed: Arc<Observed>,
}

impl FakeModel {
    fn with(reply: Reply) -> (Self, Arc<Observed>) {
        let observed = Arc::new(Observed::default());
        (
            Self {
                reply,
                observed: observed.clone(),
            },
            observed,
        )
    }

    pub fn image(bytes: &[u8]) -> (Self, Arc<Observed>) {
        Self::parts(vec![
            ResponsePart::Text("Here is the image you asked for.".to_string()),
            ResponsePart::InlineImage {
                data: bytes.to_vec(),
                mime_type: "image/png".to_string(),
            },
        ])
    }

    pub fn parts(parts: Vec<ResponsePart>) -> (Self, Arc<Observed>) {
        Self::with(Reply::Response(ModelResponse::new(parts)))
    }

    pub fn text_only(text: &str) -> (Self, Arc<Observed>) {
        Self::parts(vec![ResponsePart::Text(text.to_string())])
    }

    pub fn failing(message: &str) -> (Self, Arc<Observed>) {
        Self::with(Reply::Failure(message.to_string()))
    }
}

impl ImageModel for FakeModel {
    async fn invoke(&self, request: &OutboundRequest) -> Result<ModelResponse> {
        self.observed.calls.fetch_add(1, Ordering::SeqCst);
        self.observed
            .requests
            .lock()
            .unwrap()
            .push((request.text().to_string(), request.image_count()));

        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::Failure(message) => Err(GeneratorError::service(message.clone())),
        }
    }
}

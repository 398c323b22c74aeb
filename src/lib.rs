//! Prompt-to-image generation backed by a remote multimodal model.
//!
//! A request flows through [`request::build`], an [`providers::ImageModel`]
//! and [`extract::extract`]; the result is either base64-encoded for the HTTP
//! service ([`server`]) or written to disk by the mockup tool ([`mockup`]).

pub mod capabilities;
pub mod config;
pub mod errors;
pub mod extract;
pub mod mockup;
pub mod providers;
pub mod request;
pub mod server;
pub mod util;

mod time;
mod writer;

pub use time::{LocalTimer, format_local, init_tracing, now_local};
pub use writer::{decode_base64, encode_base64, persist};

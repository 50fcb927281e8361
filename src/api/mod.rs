mod client;
mod envelope;

pub use client::ApiClient;
pub use envelope::{status, ResponseEnvelope};

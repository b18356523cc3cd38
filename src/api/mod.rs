//! Server boundary: typed payloads, HTTP client, poll actor, push channel.

pub mod actor;
pub mod client;
pub mod error;
pub mod push;
pub mod types;

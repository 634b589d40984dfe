//! Implementation details not part of the crate's public surface.

pub mod http;
pub mod merkle;
pub mod precert;

pub use http::new_http_client;

//! Backend adapters for the CareConnect client.
//!
//! - [`HttpBackend`]: the REST backend over reqwest
//! - [`DemoBackend`]: offline keyword responder used with `--demo`

pub mod demo_backend;
pub mod http_backend;

pub use demo_backend::DemoBackend;
pub use http_backend::HttpBackend;

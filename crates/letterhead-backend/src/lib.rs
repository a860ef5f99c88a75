//! # Letterhead Backend - Remote Document Service
//!
//! The [`DocumentService`] trait is the pipeline's view of the remote
//! word-processing backend: create a document from rendered markup, fetch
//! its structural snapshot, and apply ordered mutation batches atomically.
//!
//! [`HttpDocumentService`] is the production implementation, a thin
//! `reqwest` client that owns the wire encoding of the typed mutation
//! variants and maps HTTP failures to the `(status, message)` error shape
//! the retry layer classifies.

pub mod http;
pub mod service;
mod wire;

pub use http::HttpDocumentService;
pub use service::DocumentService;

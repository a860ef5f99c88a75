//! # Letterhead Pipeline - Resilient Document Structuring
//!
//! Applies the corporate layout (header/footer tables, logo, page numbers,
//! borders) to remote documents through a sequence of interdependent,
//! order-sensitive mutation batches against an eventually-consistent
//! backend.
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`retry`] | Backoff executor: bounded retries, transient/fatal classification, strict and soft modes |
//! | [`propagation`] | Waiter: fixed-interval polling until a structural predicate holds |
//! | [`offsets`] | Resolver: layout-table cell offsets with the `start_index + 1` correction |
//! | [`layout`] | Builder: the forward-only phase machine, including the fault-tolerant branding step |
//! | [`body`] | Contained body enrichment: table of contents, repeating table headers |
//! | [`deploy`] | Batch driver: per-document failure isolation across a run |
//!
//! Execution is sequential per document; independent documents share no
//! state and can safely run on separate tasks, one pipeline instance each.

pub mod asset;
pub mod body;
pub mod cancel;
pub mod deploy;
pub mod layout;
pub mod offsets;
pub mod propagation;
pub mod retry;

pub use asset::ImageSizePt;
pub use cancel::CancelToken;
pub use deploy::{DeployConfig, Deployer, DeploySummary, DocumentOutcome, RenderedDocument};
pub use layout::{BrandingOutcome, LayoutBuilder, LayoutConfig, LayoutReport, PipelinePhase};
pub use propagation::PollSettings;
pub use retry::RetryOutcome;

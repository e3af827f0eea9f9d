//! Adapters layer: Concrete implementations of ports.
//!
//! - `pipeline`: model artifact loading and the JSON pipeline classifier
//! - `sanitize`: PII filtering for logs

pub mod pipeline;
pub mod sanitize;

pub use pipeline::{load_artifacts, ModelArtifacts, ModelMetadata, PipelineModel};

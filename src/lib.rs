//! # obescreen
//!
//! Obesity-category screening from a terminal intake form.
//!
//! This crate provides:
//! - Validation and normalization of personal, biometric and habit data
//! - BMI derivation
//! - Weight-status classification through a pre-trained model artifact
//! - Terminal UI for a single local screening session
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (intake form, phone, BMI, encodings, classes)
//! - `ports`: Trait definitions for external operations (the classifier)
//! - `adapters`: Concrete implementations (JSON model pipeline, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

use std::path::PathBuf;

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{IntakeForm, IntakeRecord, ScreeningOutcome, WeightClass};

/// Result type for screening operations
pub type Result<T> = std::result::Result<T, ScreeningError>;

/// Main error type for screening operations
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error("Model artifact missing or corrupt at {path:?}: {reason}")]
    MissingArtifact { path: PathBuf, reason: String },

    #[error("Form incomplete or invalid: {}", format_field_errors(.0))]
    Validation(Vec<domain::FieldError>),

    #[error("Internal error while processing data: {0}")]
    Processing(String),
}

fn format_field_errors(errors: &[domain::FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<ports::ClassifierError> for ScreeningError {
    fn from(e: ports::ClassifierError) -> Self {
        Self::Processing(e.to_string())
    }
}

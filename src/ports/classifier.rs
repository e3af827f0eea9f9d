//! Classifier port: Trait for the pre-trained weight-status model.
//!
//! The model is an external collaborator. The application only relies on
//! "one row in, one class code out".

use crate::domain::FeatureRow;

/// Errors raised while scoring a row.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Missing feature '{0}' in input row")]
    MissingFeature(String),

    #[error("Feature '{name}' has the wrong type (expected {expected})")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("Model produced a non-finite score")]
    NonFiniteScore,

    #[error("Model inference failed: {0}")]
    Inference(String),
}

/// Trait for weight-status classifiers.
pub trait Classifier: Send + Sync {
    /// Predict the class code for a single row.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the row does not match the model schema
    /// or scoring fails.
    fn predict(&self, row: &FeatureRow) -> Result<i64, ClassifierError>;
}

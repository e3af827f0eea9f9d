//! Pipeline adapter: Implementation of `Classifier` backed by exported model files.
//!
//! The training pipeline exports two JSON artifacts into the model directory:
//!
//! - `model.json`: a multinomial logistic model with its preprocessing
//!   (standardization of numeric columns, one-hot encoding of categorical
//!   columns). Categories not seen during training encode as all zeros.
//! - `metadata.json`: model name, version, training date and metrics. When
//!   it carries `model_sha256`, the model file must hash to that value.
//!
//! Both are loaded once at startup. Any failure is fatal to the session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureRow, FeatureValue};
use crate::ports::{Classifier, ClassifierError};
use crate::ScreeningError;

pub const MODEL_FILE: &str = "model.json";
pub const METADATA_FILE: &str = "metadata.json";

const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// Standardized numeric input: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub name: String,
    pub mean: f64,
    pub scale: f64,
}

/// One-hot encoded categorical input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub name: String,
    pub categories: Vec<String>,
}

/// Model parameters exported by the training pipeline.
///
/// Coefficient columns are ordered numeric features first, then each
/// categorical feature's categories in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedPipeline {
    pub format_version: u32,
    pub numeric: Vec<NumericFeature>,
    pub categorical: Vec<CategoricalFeature>,
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

/// Companion metadata artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub version: String,
    #[serde(default)]
    pub trained_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub model_sha256: Option<String>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// Both artifacts, loaded and checked.
#[derive(Debug)]
pub struct ModelArtifacts {
    pub model: PipelineModel,
    pub metadata: ModelMetadata,
}

/// Hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn artifact_error(path: &Path, reason: impl Into<String>) -> ScreeningError {
    ScreeningError::MissingArtifact {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Load `model.json` and `metadata.json` from `model_dir`.
///
/// # Errors
/// Returns `ScreeningError::MissingArtifact` if either file is absent,
/// unreadable, malformed, inconsistent, or fails its checksum.
pub fn load_artifacts(model_dir: &Path) -> Result<ModelArtifacts, ScreeningError> {
    let model_path: PathBuf = model_dir.join(MODEL_FILE);
    let metadata_path: PathBuf = model_dir.join(METADATA_FILE);

    let model_bytes = std::fs::read(&model_path)
        .map_err(|e| artifact_error(&model_path, format!("failed to read: {e}")))?;
    let metadata_bytes = std::fs::read(&metadata_path)
        .map_err(|e| artifact_error(&metadata_path, format!("failed to read: {e}")))?;

    let metadata: ModelMetadata = serde_json::from_slice(&metadata_bytes)
        .map_err(|e| artifact_error(&metadata_path, format!("invalid format: {e}")))?;

    match &metadata.model_sha256 {
        Some(expected) => {
            let actual = sha256_hex(&model_bytes);
            if !actual.eq_ignore_ascii_case(expected.trim()) {
                return Err(artifact_error(
                    &model_path,
                    "checksum does not match metadata.json (file corrupt or replaced)",
                ));
            }
        }
        None => tracing::warn!("metadata.json has no model_sha256; skipping integrity check"),
    }

    let pipeline: ExportedPipeline = serde_json::from_slice(&model_bytes)
        .map_err(|e| artifact_error(&model_path, format!("invalid format: {e}")))?;
    let model = PipelineModel::new(pipeline).map_err(|e| artifact_error(&model_path, e))?;

    tracing::info!(
        "Loaded model '{}' v{} from {:?} (n_classes={}, n_inputs={})",
        metadata.model_name,
        metadata.version,
        model_dir,
        model.pipeline.classes.len(),
        model.width()
    );

    Ok(ModelArtifacts { model, metadata })
}

/// Multinomial logistic classifier over a preprocessed row.
#[derive(Debug, Clone)]
pub struct PipelineModel {
    pipeline: ExportedPipeline,
}

impl PipelineModel {
    /// Wrap exported parameters after checking their shapes.
    ///
    /// # Errors
    /// Returns a description of the first inconsistency found.
    pub fn new(pipeline: ExportedPipeline) -> Result<Self, String> {
        if pipeline.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(format!(
                "unsupported format_version {} (expected {SUPPORTED_FORMAT_VERSION})",
                pipeline.format_version
            ));
        }
        if pipeline.classes.is_empty() {
            return Err("model declares no classes".into());
        }
        if pipeline.coefficients.len() != pipeline.classes.len()
            || pipeline.intercepts.len() != pipeline.classes.len()
        {
            return Err("coefficients/intercepts do not match the number of classes".into());
        }
        if let Some(f) = pipeline
            .numeric
            .iter()
            .find(|f| f.scale == 0.0 || !f.scale.is_finite() || !f.mean.is_finite())
        {
            return Err(format!("numeric feature '{}' has an invalid mean/scale", f.name));
        }
        if let Some(f) = pipeline.categorical.iter().find(|f| f.categories.is_empty()) {
            return Err(format!("categorical feature '{}' has no categories", f.name));
        }

        let model = Self { pipeline };
        let width = model.width();
        if width == 0 {
            return Err("model declares no input features".into());
        }
        if model.pipeline.coefficients.iter().any(|row| row.len() != width) {
            return Err(format!("every coefficient row must have {width} entries"));
        }
        Ok(model)
    }

    /// Number of columns after preprocessing.
    #[must_use]
    pub fn width(&self) -> usize {
        self.pipeline.numeric.len()
            + self
                .pipeline
                .categorical
                .iter()
                .map(|f| f.categories.len())
                .sum::<usize>()
    }

    fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>, ClassifierError> {
        let mut x = Vec::with_capacity(self.width());

        for feature in &self.pipeline.numeric {
            match row.get(&feature.name) {
                Some(FeatureValue::Number(v)) => x.push((v - feature.mean) / feature.scale),
                Some(FeatureValue::Category(_)) => {
                    return Err(ClassifierError::TypeMismatch {
                        name: feature.name.clone(),
                        expected: "number",
                    })
                }
                None => return Err(ClassifierError::MissingFeature(feature.name.clone())),
            }
        }

        for feature in &self.pipeline.categorical {
            let value = match row.get(&feature.name) {
                Some(FeatureValue::Category(v)) => v,
                Some(FeatureValue::Number(_)) => {
                    return Err(ClassifierError::TypeMismatch {
                        name: feature.name.clone(),
                        expected: "category",
                    })
                }
                None => return Err(ClassifierError::MissingFeature(feature.name.clone())),
            };
            if !feature.categories.contains(value) {
                tracing::debug!(feature = %feature.name, "Unseen category, encoding as zeros");
            }
            x.extend(
                feature
                    .categories
                    .iter()
                    .map(|c| if c == value { 1.0 } else { 0.0 }),
            );
        }

        Ok(x)
    }

    /// Raw per-class scores, in `classes` order.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the row does not match the schema.
    pub fn scores(&self, row: &FeatureRow) -> Result<Vec<f64>, ClassifierError> {
        let x = self.transform(row)?;
        Ok(self
            .pipeline
            .coefficients
            .iter()
            .zip(&self.pipeline.intercepts)
            .map(|(w, b)| b + w.iter().zip(&x).map(|(wi, xi)| wi * xi).sum::<f64>())
            .collect())
    }
}

impl Classifier for PipelineModel {
    fn predict(&self, row: &FeatureRow) -> Result<i64, ClassifierError> {
        let scores = self.scores(row)?;
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifierError::NonFiniteScore);
        }

        let best = scores
            .iter()
            .enumerate()
            .fold(None::<(usize, f64)>, |best, (i, &s)| match best {
                Some((_, top)) if top >= s => best,
                _ => Some((i, s)),
            })
            .map(|(i, _)| i)
            .ok_or_else(|| ClassifierError::Inference("model produced no scores".into()))?;

        Ok(self.pipeline.classes[best])
    }
}

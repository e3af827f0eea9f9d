//! Screening service: validates a submission and scores it.
//!
//! One call to `submit` handles one form submission end to end:
//! 1. Validate and normalize the form
//! 2. Derive BMI
//! 3. Assemble the model row (ordinal levels ranked)
//! 4. Run exactly one prediction
//! 5. Map the class code to a label
//!
//! Failures after validation never propagate as panics; they come back as
//! `ScreeningError::Processing`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::domain::{
    ordinal_encoding, Bmi, FeatureRow, IntakeForm, IntakeRecord, OrdinalEncoding,
    ScreeningOutcome, WeightClass,
};
use crate::ports::Classifier;
use crate::ScreeningError;

/// Service for running screenings against a loaded classifier.
pub struct ScreeningService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
    encoding: &'static OrdinalEncoding,
}

impl<C> ScreeningService<C>
where
    C: Classifier,
{
    /// Create a new screening service using the process-wide encoding table.
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            classifier,
            encoding: ordinal_encoding(),
        }
    }

    /// Validate the form, then score it.
    ///
    /// # Errors
    /// Returns `ScreeningError::Validation` with every field problem when the
    /// form is incomplete (no prediction is attempted), or
    /// `ScreeningError::Processing` when scoring fails.
    pub fn submit(&self, form: &IntakeForm) -> Result<ScreeningOutcome, ScreeningError> {
        let record = form.validate().map_err(|errors| {
            tracing::info!("Submission rejected: {} field error(s)", errors.len());
            ScreeningError::Validation(errors)
        })?;
        self.score(&record)
    }

    /// Score an already validated record.
    ///
    /// # Errors
    /// Returns `ScreeningError::Processing` if the derived values are not
    /// usable or the classifier fails.
    pub fn score(&self, record: &IntakeRecord) -> Result<ScreeningOutcome, ScreeningError> {
        let bmi = Bmi::from_measurements(record.weight_kg, record.height_m);
        if !bmi.is_finite() {
            return Err(ScreeningError::Processing(format!(
                "BMI could not be computed from height {} m",
                record.height_m
            )));
        }

        let row = FeatureRow::from_record(record, self.encoding);
        tracing::debug!("Assembled model row with {} columns", row.len());

        let class_code = self.predict(&row)?;
        let weight_class = WeightClass::from_code(class_code);
        if weight_class == WeightClass::Unknown {
            tracing::warn!(class_code, "Classifier returned an unknown class code");
        }

        tracing::info!(
            class_code,
            class = %weight_class,
            bmi = %bmi,
            "Screening complete"
        );

        Ok(ScreeningOutcome {
            patient_name: record.full_name(),
            phone_display: record.phone.formatted(),
            bmi,
            class_code,
            weight_class,
            screened_at: record.created_at,
        })
    }

    fn predict(&self, row: &FeatureRow) -> Result<i64, ScreeningError> {
        let classifier = &self.classifier;
        match panic::catch_unwind(AssertUnwindSafe(|| classifier.predict(row))) {
            Ok(Ok(code)) => Ok(code),
            Ok(Err(e)) => {
                tracing::error!("Classifier failed: {}", e);
                Err(e.into())
            }
            Err(payload) => {
                let cause = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "classifier panicked".to_string());
                tracing::error!("Classifier panicked: {}", cause);
                Err(ScreeningError::Processing(cause))
            }
        }
    }
}

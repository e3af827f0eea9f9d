//! Model input row.
//!
//! One row per submission, column names matching the classifier's schema.
//! Ordinal habits are already ranked here; categorical answers stay text.

use serde::{Deserialize, Serialize};

use super::encoding::OrdinalEncoding;
use super::intake::{Choice, IntakeRecord};

pub const COLUMN_AGE: &str = "age_years";
pub const COLUMN_SEX: &str = "biological_sex";
pub const COLUMN_HEIGHT: &str = "height_m";
pub const COLUMN_WEIGHT: &str = "weight_kg";
pub const COLUMN_FAMILY_HISTORY: &str = "family_history";
pub const COLUMN_HIGH_CALORIC_FOOD: &str = "high_caloric_food";
pub const COLUMN_SMOKING: &str = "smoking";
pub const COLUMN_CALORIE_MONITORING: &str = "calorie_monitoring";
pub const COLUMN_TRANSPORT: &str = "transport";

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// Named, ordered feature values for one submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRow {
    columns: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    /// Assemble the row for a validated record.
    #[must_use]
    pub fn from_record(record: &IntakeRecord, encoding: &OrdinalEncoding) -> Self {
        let mut row = Self::default();
        row.push_number(COLUMN_AGE, f64::from(record.age));
        row.push_category(COLUMN_SEX, record.sex.model_label());
        row.push_number(COLUMN_HEIGHT, record.height_m);
        row.push_number(COLUMN_WEIGHT, record.weight_kg);
        row.push_category(COLUMN_FAMILY_HISTORY, record.family_history.model_label());
        row.push_category(COLUMN_HIGH_CALORIC_FOOD, record.high_caloric_food.model_label());
        row.push_category(COLUMN_SMOKING, record.smoking.model_label());
        row.push_category(COLUMN_CALORIE_MONITORING, record.calorie_monitoring.model_label());
        row.push_category(COLUMN_TRANSPORT, record.transport.model_label());

        for (attribute, level) in record.habits.levels() {
            row.push_number(attribute.column(), f64::from(encoding.rank(attribute, level)));
        }

        row
    }

    pub fn push_number(&mut self, name: &str, value: f64) {
        self.columns.push((name.to_string(), FeatureValue::Number(value)));
    }

    pub fn push_category(&mut self, name: &str, value: &str) {
        self.columns
            .push((name.to_string(), FeatureValue::Category(value.to_string())));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

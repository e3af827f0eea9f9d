//! Body Mass Index.

use serde::{Deserialize, Serialize};

/// Body Mass Index in kg/m².
///
/// Stored unrounded; `Display` renders two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bmi(f64);

impl Bmi {
    #[must_use]
    pub fn from_measurements(weight_kg: f64, height_m: f64) -> Self {
        Self(weight_kg / (height_m * height_m))
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl std::fmt::Display for Bmi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

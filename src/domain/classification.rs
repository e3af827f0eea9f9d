//! Weight-status classes and screening outcome.

use serde::{Deserialize, Serialize};

use super::bmi::Bmi;

/// Weight-status category predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightClass {
    Underweight,
    Normal,
    OverweightI,
    OverweightII,
    ObesityI,
    ObesityII,
    ObesityIII,
    /// Class code outside the known range.
    Unknown,
}

/// Supporting message shown next to the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guidance {
    SeekPhysician,
    HabitChanges,
    Healthy,
}

impl Guidance {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::SeekPhysician => {
                "Attention: the behavioral and biometric profile indicates obesity. \
                 We recommend seeing a physician."
            }
            Self::HabitChanges => {
                "Note: indicative of overweight. Small habit changes can help."
            }
            Self::Healthy => "Congratulations: your indicators are healthy!",
        }
    }
}

impl WeightClass {
    /// Map a raw class code. Codes outside `0..=6` become `Unknown`.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Underweight,
            1 => Self::Normal,
            2 => Self::OverweightI,
            3 => Self::OverweightII,
            4 => Self::ObesityI,
            5 => Self::ObesityII,
            6 => Self::ObesityIII,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::OverweightI => "Overweight I",
            Self::OverweightII => "Overweight II",
            Self::ObesityI => "Obesity I",
            Self::ObesityII => "Obesity II",
            Self::ObesityIII => "Obesity III",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub fn is_obesity(&self) -> bool {
        matches!(self, Self::ObesityI | Self::ObesityII | Self::ObesityIII)
    }

    #[must_use]
    pub fn is_overweight(&self) -> bool {
        matches!(self, Self::OverweightI | Self::OverweightII)
    }

    #[must_use]
    pub fn guidance(&self) -> Option<Guidance> {
        match self {
            Self::Unknown => None,
            c if c.is_obesity() => Some(Guidance::SeekPhysician),
            c if c.is_overweight() => Some(Guidance::HabitChanges),
            _ => Some(Guidance::Healthy),
        }
    }
}

impl std::fmt::Display for WeightClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything shown after a successful screening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub patient_name: String,
    pub phone_display: String,
    pub bmi: Bmi,
    pub class_code: i64,
    pub weight_class: WeightClass,
    pub screened_at: chrono::DateTime<chrono::Utc>,
}

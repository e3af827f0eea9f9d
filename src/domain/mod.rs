//! Domain layer: Core business types and logic.
//!
//! Intake validation, phone normalization, BMI, ordinal encoding and the
//! weight-status classes. Nothing here touches the terminal or the filesystem.

mod bmi;
mod classification;
pub mod encoding;
mod features;
pub mod intake;
mod phone;

pub use bmi::Bmi;
pub use classification::{Guidance, ScreeningOutcome, WeightClass};
pub use encoding::{ordinal_encoding, OrdinalAttribute, OrdinalEncoding};
pub use features::{FeatureRow, FeatureValue};
pub use intake::{
    BiologicalSex, Choice, FamilyHistory, Field, FieldError, Habits, IntakeForm, IntakeRecord,
    Smoking, Transport, YesNo,
};
pub use phone::PhoneNumber;

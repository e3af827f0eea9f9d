//! Intake form types and validation.
//!
//! `IntakeForm` holds what the user entered, every field optional.
//! `IntakeForm::validate` turns it into a fully populated `IntakeRecord` or
//! reports every problem at once.

use serde::{Deserialize, Serialize};

use super::encoding::OrdinalAttribute;
use super::phone::PhoneNumber;

/// A closed set of options for a single-select field.
pub trait Choice: Copy + Sized + 'static {
    /// Every option in display order.
    const ALL: &'static [Self];

    /// Human-readable option text.
    fn label(&self) -> &'static str;

    /// Category label handed to the classifier.
    fn model_label(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiologicalSex {
    Male,
    Female,
}

impl Choice for BiologicalSex {
    const ALL: &'static [Self] = &[Self::Male, Self::Female];

    fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    fn model_label(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Plain yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl Choice for YesNo {
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    fn model_label(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// Family history of excess weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FamilyHistory {
    Present,
    Absent,
}

impl Choice for FamilyHistory {
    const ALL: &'static [Self] = &[Self::Present, Self::Absent];

    fn label(&self) -> &'static str {
        match self {
            Self::Present => "Has history",
            Self::Absent => "No history",
        }
    }

    fn model_label(&self) -> &'static str {
        match self {
            Self::Present => "yes",
            Self::Absent => "no",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Smoking {
    Smoker,
    NonSmoker,
}

impl Choice for Smoking {
    const ALL: &'static [Self] = &[Self::Smoker, Self::NonSmoker];

    fn label(&self) -> &'static str {
        match self {
            Self::Smoker => "Smokes",
            Self::NonSmoker => "Does not smoke",
        }
    }

    fn model_label(&self) -> &'static str {
        match self {
            Self::Smoker => "yes",
            Self::NonSmoker => "no",
        }
    }
}

/// Habitual transportation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    Walking,
    Bicycle,
    Car,
    Motorbike,
    PublicTransport,
}

impl Choice for Transport {
    const ALL: &'static [Self] = &[
        Self::Walking,
        Self::Bicycle,
        Self::Car,
        Self::Motorbike,
        Self::PublicTransport,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::Bicycle => "Bicycle",
            Self::Car => "Car",
            Self::Motorbike => "Motorbike",
            Self::PublicTransport => "Public transport",
        }
    }

    fn model_label(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Bicycle => "bicycle",
            Self::Car => "car",
            Self::Motorbike => "motorbike",
            Self::PublicTransport => "public_transport",
        }
    }
}

/// Every field on the intake form, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Age,
    Height,
    Weight,
    Sex,
    FamilyHistory,
    HighCaloricFood,
    Smoking,
    CalorieMonitoring,
    Water,
    Alcohol,
    PhysicalActivity,
    ScreenTime,
    Vegetables,
    MainMeals,
    Snacks,
    Transport,
    Phone,
}

impl Field {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Phone => "Mobile",
            Self::Age => "Age",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::Sex => "Biological sex",
            Self::FamilyHistory => "Family history",
            Self::HighCaloricFood => "High-caloric food",
            Self::Smoking => "Smoking",
            Self::CalorieMonitoring => "Calorie monitoring",
            Self::Water => "Water",
            Self::Alcohol => "Alcohol",
            Self::PhysicalActivity => "Physical activity",
            Self::ScreenTime => "Screen time",
            Self::Vegetables => "Vegetables",
            Self::MainMeals => "Main meals",
            Self::Snacks => "Snacks",
            Self::Transport => "Transport",
        }
    }

    /// The ordinal attribute behind this field, if any.
    #[must_use]
    pub fn ordinal(&self) -> Option<OrdinalAttribute> {
        match self {
            Self::Water => Some(OrdinalAttribute::Water),
            Self::Alcohol => Some(OrdinalAttribute::Alcohol),
            Self::PhysicalActivity => Some(OrdinalAttribute::PhysicalActivity),
            Self::ScreenTime => Some(OrdinalAttribute::ScreenTime),
            Self::Vegetables => Some(OrdinalAttribute::Vegetables),
            Self::MainMeals => Some(OrdinalAttribute::MainMeals),
            Self::Snacks => Some(OrdinalAttribute::Snacks),
            _ => None,
        }
    }
}

/// A single field-level problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Field '{}' is required.", .0.label())]
    Required(Field),

    #[error("Invalid mobile number. Enter area code + number (e.g. 11999999999).")]
    InvalidPhone,
}

impl FieldError {
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::Required(field) => *field,
            Self::InvalidPhone => Field::Phone,
        }
    }
}

/// Raw form input. Unset values are `None` or empty strings.
#[derive(Debug, Clone, Default)]
pub struct IntakeForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub age: Option<u32>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub sex: Option<BiologicalSex>,
    pub family_history: Option<FamilyHistory>,
    pub high_caloric_food: Option<YesNo>,
    pub smoking: Option<Smoking>,
    pub calorie_monitoring: Option<YesNo>,
    pub transport: Option<Transport>,
    pub vegetables: Option<String>,
    pub main_meals: Option<String>,
    pub snacks: Option<String>,
    pub water: Option<String>,
    pub physical_activity: Option<String>,
    pub screen_time: Option<String>,
    pub alcohol: Option<String>,
}

/// Ordinal habit levels as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habits {
    pub vegetables: String,
    pub main_meals: String,
    pub snacks: String,
    pub water: String,
    pub physical_activity: String,
    pub screen_time: String,
    pub alcohol: String,
}

impl Habits {
    /// Each level paired with its attribute.
    #[must_use]
    pub fn levels(&self) -> [(OrdinalAttribute, &str); 7] {
        [
            (OrdinalAttribute::Vegetables, self.vegetables.as_str()),
            (OrdinalAttribute::MainMeals, self.main_meals.as_str()),
            (OrdinalAttribute::Snacks, self.snacks.as_str()),
            (OrdinalAttribute::Water, self.water.as_str()),
            (OrdinalAttribute::PhysicalActivity, self.physical_activity.as_str()),
            (OrdinalAttribute::ScreenTime, self.screen_time.as_str()),
            (OrdinalAttribute::Alcohol, self.alcohol.as_str()),
        ]
    }
}

/// A fully populated, validated submission.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub first_name: String,
    pub last_name: String,
    pub phone: PhoneNumber,
    pub age: u32,
    pub height_m: f64,
    pub weight_kg: f64,
    pub sex: BiologicalSex,
    pub family_history: FamilyHistory,
    pub high_caloric_food: YesNo,
    pub smoking: Smoking,
    pub calorie_monitoring: YesNo,
    pub transport: Transport,
    pub habits: Habits,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl IntakeRecord {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl std::fmt::Debug for IntakeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeRecord")
            .field("name", &"[REDACTED]")
            .field("phone", &self.phone)
            .field("age", &self.age)
            .field("height_m", &self.height_m)
            .field("weight_kg", &self.weight_kg)
            .field("sex", &self.sex)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

fn required_text(value: &str, field: Field, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::Required(field));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn required<T: Clone>(value: &Option<T>, field: Field, errors: &mut Vec<FieldError>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::Required(field));
    }
    value.clone()
}

impl IntakeForm {
    /// Validate and normalize the form.
    ///
    /// Every check runs; the error list holds one entry per violated field.
    ///
    /// # Errors
    /// Returns the non-empty list of field errors when anything is missing
    /// or malformed.
    pub fn validate(&self) -> Result<IntakeRecord, Vec<FieldError>> {
        let mut errors = Vec::new();

        let first_name = required_text(&self.first_name, Field::FirstName, &mut errors);
        let last_name = required_text(&self.last_name, Field::LastName, &mut errors);

        let age = required(&self.age, Field::Age, &mut errors);
        let height_m = required(&self.height_m, Field::Height, &mut errors);
        let weight_kg = required(&self.weight_kg, Field::Weight, &mut errors);

        let sex = required(&self.sex, Field::Sex, &mut errors);
        let family_history = required(&self.family_history, Field::FamilyHistory, &mut errors);
        let high_caloric_food = required(&self.high_caloric_food, Field::HighCaloricFood, &mut errors);
        let smoking = required(&self.smoking, Field::Smoking, &mut errors);
        let calorie_monitoring =
            required(&self.calorie_monitoring, Field::CalorieMonitoring, &mut errors);
        let water = required(&self.water, Field::Water, &mut errors);
        let alcohol = required(&self.alcohol, Field::Alcohol, &mut errors);
        let physical_activity =
            required(&self.physical_activity, Field::PhysicalActivity, &mut errors);
        let screen_time = required(&self.screen_time, Field::ScreenTime, &mut errors);
        let vegetables = required(&self.vegetables, Field::Vegetables, &mut errors);
        let main_meals = required(&self.main_meals, Field::MainMeals, &mut errors);
        let snacks = required(&self.snacks, Field::Snacks, &mut errors);
        let transport = required(&self.transport, Field::Transport, &mut errors);

        let phone = if self.phone.trim().is_empty() {
            errors.push(FieldError::Required(Field::Phone));
            None
        } else {
            let normalized = PhoneNumber::normalize(&self.phone);
            if normalized.is_none() {
                errors.push(FieldError::InvalidPhone);
            }
            normalized
        };

        match (
            first_name,
            last_name,
            phone,
            age,
            height_m,
            weight_kg,
            sex,
            family_history,
            high_caloric_food,
            smoking,
            calorie_monitoring,
            transport,
            (water, alcohol, physical_activity, screen_time, vegetables, main_meals, snacks),
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(phone),
                Some(age),
                Some(height_m),
                Some(weight_kg),
                Some(sex),
                Some(family_history),
                Some(high_caloric_food),
                Some(smoking),
                Some(calorie_monitoring),
                Some(transport),
                (
                    Some(water),
                    Some(alcohol),
                    Some(physical_activity),
                    Some(screen_time),
                    Some(vegetables),
                    Some(main_meals),
                    Some(snacks),
                ),
            ) if errors.is_empty() => Ok(IntakeRecord {
                first_name,
                last_name,
                phone,
                age,
                height_m,
                weight_kg,
                sex,
                family_history,
                high_caloric_food,
                smoking,
                calorie_monitoring,
                transport,
                habits: Habits {
                    vegetables,
                    main_meals,
                    snacks,
                    water,
                    physical_activity,
                    screen_time,
                    alcohol,
                },
                created_at: chrono::Utc::now(),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn complete_form() -> IntakeForm {
        IntakeForm {
            first_name: "Maria".into(),
            last_name: "Silva".into(),
            phone: "(11) 99999-9999".into(),
            age: Some(34),
            height_m: Some(1.75),
            weight_kg: Some(70.0),
            sex: Some(BiologicalSex::Female),
            family_history: Some(FamilyHistory::Absent),
            high_caloric_food: Some(YesNo::No),
            smoking: Some(Smoking::NonSmoker),
            calorie_monitoring: Some(YesNo::Yes),
            transport: Some(Transport::PublicTransport),
            vegetables: Some("sometimes".into()),
            main_meals: Some("three".into()),
            snacks: Some("sometimes".into()),
            water: Some("1-2 L/day".into()),
            physical_activity: Some("1-2x/week".into()),
            screen_time: Some("3-5 h/day".into()),
            alcohol: Some("never".into()),
        }
    }

    fn unset(form: &mut IntakeForm, field: Field) {
        match field {
            Field::FirstName => form.first_name.clear(),
            Field::LastName => form.last_name.clear(),
            Field::Phone => form.phone.clear(),
            Field::Age => form.age = None,
            Field::Height => form.height_m = None,
            Field::Weight => form.weight_kg = None,
            Field::Sex => form.sex = None,
            Field::FamilyHistory => form.family_history = None,
            Field::HighCaloricFood => form.high_caloric_food = None,
            Field::Smoking => form.smoking = None,
            Field::CalorieMonitoring => form.calorie_monitoring = None,
            Field::Water => form.water = None,
            Field::Alcohol => form.alcohol = None,
            Field::PhysicalActivity => form.physical_activity = None,
            Field::ScreenTime => form.screen_time = None,
            Field::Vegetables => form.vegetables = None,
            Field::MainMeals => form.main_meals = None,
            Field::Snacks => form.snacks = None,
            Field::Transport => form.transport = None,
        }
    }

    const ALL_FIELDS: [Field; 19] = [
        Field::FirstName,
        Field::LastName,
        Field::Age,
        Field::Height,
        Field::Weight,
        Field::Sex,
        Field::FamilyHistory,
        Field::HighCaloricFood,
        Field::Smoking,
        Field::CalorieMonitoring,
        Field::Water,
        Field::Alcohol,
        Field::PhysicalActivity,
        Field::ScreenTime,
        Field::Vegetables,
        Field::MainMeals,
        Field::Snacks,
        Field::Transport,
        Field::Phone,
    ];

    #[test]
    fn test_complete_form_validates() {
        let record = complete_form().validate().expect("Should validate");
        assert_eq!(record.full_name(), "Maria Silva");
        assert_eq!(record.phone.formatted(), "(11) 99999-9999");
        assert_eq!(record.habits.water, "1-2 L/day");
    }

    #[test]
    fn test_names_are_trimmed() {
        let mut form = complete_form();
        form.first_name = "  Ana ".into();
        form.last_name = "\tSouza\n".into();
        let record = form.validate().expect("Should validate");
        assert_eq!(record.full_name(), "Ana Souza");
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in ALL_FIELDS {
            let mut form = complete_form();
            unset(&mut form, field);
            let errors = form.validate().expect_err("Should reject");
            assert_eq!(errors, vec![FieldError::Required(field)], "{field:?}");
            assert!(errors[0].to_string().contains(field.label()));
        }
    }

    #[test]
    fn test_whitespace_only_text_is_missing() {
        let mut form = complete_form();
        form.first_name = "   ".into();
        form.phone = " \t ".into();
        let errors = form.validate().expect_err("Should reject");
        assert_eq!(
            errors,
            vec![
                FieldError::Required(Field::FirstName),
                FieldError::Required(Field::Phone)
            ]
        );
    }

    #[test]
    fn test_all_errors_collected() {
        let errors = IntakeForm::default().validate().expect_err("Should reject");
        assert_eq!(errors.len(), ALL_FIELDS.len());
        for (err, field) in errors.iter().zip(ALL_FIELDS) {
            assert_eq!(err.field(), field);
        }
    }

    #[test]
    fn test_invalid_phone() {
        let mut form = complete_form();
        form.phone = "123".into();
        let errors = form.validate().expect_err("Should reject");
        assert_eq!(errors, vec![FieldError::InvalidPhone]);
        assert_eq!(errors[0].field(), Field::Phone);
    }

    #[test]
    fn test_ranges_not_revalidated() {
        let mut form = complete_form();
        form.age = Some(7);
        form.weight_kg = Some(500.0);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_identity() {
        let record = complete_form().validate().expect("Should validate");
        let dbg = format!("{record:?}");
        assert!(!dbg.contains("Maria"));
        assert!(!dbg.contains("99999"));
    }

    #[test]
    fn test_record_deserialize_rejects_bad_phone() {
        let record = complete_form().validate().expect("Should validate");
        let mut json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["phone"], "11999999999");

        json["phone"] = serde_json::Value::String("1".into());
        assert!(serde_json::from_value::<IntakeRecord>(json).is_err());
    }
}

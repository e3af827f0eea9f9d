//! Intake form: text, numeric and single-select controls plus a submit button.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    ordinal_encoding, BiologicalSex, Choice, FamilyHistory, Field, FieldError, IntakeForm,
    Smoking, Transport, YesNo,
};
use crate::tui::styles::MedicalTheme;

/// Input control behind a form field.
#[derive(Debug, Clone)]
pub enum FieldInput {
    Text {
        value: String,
        placeholder: &'static str,
    },
    /// Numeric entry. The range is enforced when focus leaves the control.
    Numeric {
        value: String,
        placeholder: &'static str,
        min: f64,
        max: f64,
        integer: bool,
    },
    /// Single choice. `None` means "not selected".
    Select {
        options: Vec<&'static str>,
        selected: Option<usize>,
    },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub field: Field,
    pub input: FieldInput,
}

impl FormField {
    fn text(field: Field, placeholder: &'static str) -> Self {
        Self {
            field,
            input: FieldInput::Text {
                value: String::new(),
                placeholder,
            },
        }
    }

    fn numeric(field: Field, placeholder: &'static str, min: f64, max: f64, integer: bool) -> Self {
        Self {
            field,
            input: FieldInput::Numeric {
                value: String::new(),
                placeholder,
                min,
                max,
                integer,
            },
        }
    }

    fn choice<T: Choice>(field: Field) -> Self {
        Self::select(field, T::ALL.iter().map(T::label).collect())
    }

    fn ordinal(field: Field) -> Self {
        let options = field
            .ordinal()
            .map(|a| ordinal_encoding().levels(a).to_vec())
            .unwrap_or_default();
        Self::select(field, options)
    }

    fn select(field: Field, options: Vec<&'static str>) -> Self {
        Self {
            field,
            input: FieldInput::Select {
                options,
                selected: None,
            },
        }
    }
}

/// Fields per column on screen.
const COLUMN_SPLITS: [usize; 2] = [7, 13];

/// Intake form state
pub struct IntakeFormState {
    pub fields: Vec<FormField>,
    /// Index into `fields`; `fields.len()` is the submit button.
    pub focus: usize,
    /// Problems from the last submission attempt.
    pub errors: Vec<FieldError>,
}

impl Default for IntakeFormState {
    fn default() -> Self {
        Self {
            fields: vec![
                FormField::text(Field::FirstName, "Enter your first name"),
                FormField::text(Field::LastName, "Enter your last name"),
                FormField::text(Field::Phone, "e.g. 11999999999"),
                FormField::choice::<BiologicalSex>(Field::Sex),
                FormField::numeric(Field::Age, "years (14-100)", 14.0, 100.0, true),
                FormField::numeric(Field::Height, "m, e.g. 1.70", 1.40, 2.50, false),
                FormField::numeric(Field::Weight, "kg, e.g. 80.0", 30.0, 300.0, false),
                FormField::choice::<FamilyHistory>(Field::FamilyHistory),
                FormField::choice::<YesNo>(Field::HighCaloricFood),
                FormField::choice::<Smoking>(Field::Smoking),
                FormField::choice::<YesNo>(Field::CalorieMonitoring),
                FormField::ordinal(Field::Water),
                FormField::ordinal(Field::Alcohol),
                FormField::ordinal(Field::PhysicalActivity),
                FormField::ordinal(Field::ScreenTime),
                FormField::ordinal(Field::Vegetables),
                FormField::ordinal(Field::MainMeals),
                FormField::ordinal(Field::Snacks),
                FormField::choice::<Transport>(Field::Transport),
            ],
            focus: 0,
            errors: Vec::new(),
        }
    }
}

impl IntakeFormState {
    pub fn is_submit_focused(&self) -> bool {
        self.focus == self.fields.len()
    }

    fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    pub fn next_field(&mut self) {
        self.commit_focused();
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn prev_field(&mut self) {
        self.commit_focused();
        if self.focus == 0 {
            self.focus = self.fields.len();
        } else {
            self.focus -= 1;
        }
    }

    /// Enforce the numeric range of the focused control.
    ///
    /// Out-of-range values are clamped to the nearest bound; unparseable
    /// text is cleared.
    fn commit_focused(&mut self) {
        let Some(FormField {
            input:
                FieldInput::Numeric {
                    value,
                    min,
                    max,
                    integer,
                    ..
                },
            ..
        }) = self.focused_mut()
        else {
            return;
        };

        if value.is_empty() {
            return;
        }
        *value = match value.parse::<f64>() {
            Ok(v) if v.is_finite() => {
                let clamped = v.clamp(*min, *max);
                if *integer {
                    format!("{}", clamped.round() as u32)
                } else if clamped == v {
                    value.clone()
                } else {
                    format!("{clamped}")
                }
            }
            _ => String::new(),
        };
    }

    pub fn input_char(&mut self, c: char) {
        let Some(form_field) = self.focused_mut() else {
            return;
        };
        let is_phone = form_field.field == Field::Phone;

        match &mut form_field.input {
            FieldInput::Text { value, .. } => {
                let accepted = if is_phone {
                    c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-' | '+')
                } else {
                    !c.is_control()
                };
                if accepted {
                    value.push(c);
                }
            }
            FieldInput::Numeric { value, integer, .. } => {
                if c.is_ascii_digit() {
                    value.push(c);
                } else if !*integer && matches!(c, '.' | ',') && !value.contains('.') {
                    value.push('.');
                }
            }
            FieldInput::Select { options, selected } => {
                // Digits pick an option directly (1-based).
                if let Some(n) = c.to_digit(10) {
                    let n = n as usize;
                    if n >= 1 && n <= options.len() {
                        *selected = Some(n - 1);
                    }
                }
            }
        }
        self.errors.clear();
    }

    pub fn delete_char(&mut self) {
        if let Some(form_field) = self.focused_mut() {
            match &mut form_field.input {
                FieldInput::Text { value, .. } | FieldInput::Numeric { value, .. } => {
                    value.pop();
                }
                FieldInput::Select { .. } => {}
            }
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(form_field) = self.focused_mut() {
            match &mut form_field.input {
                FieldInput::Text { value, .. } | FieldInput::Numeric { value, .. } => {
                    value.zeroize();
                }
                FieldInput::Select { selected, .. } => *selected = None,
            }
        }
    }

    /// Step the focused select control through its options.
    pub fn cycle_option(&mut self, forward: bool) {
        if let Some(FormField {
            input: FieldInput::Select { options, selected },
            ..
        }) = self.focused_mut()
        {
            let n = options.len();
            if n == 0 {
                return;
            }
            *selected = Some(match (*selected, forward) {
                (None, true) => 0,
                (None, false) => n - 1,
                (Some(i), true) => (i + 1) % n,
                (Some(i), false) => (i + n - 1) % n,
            });
            self.errors.clear();
        }
    }

    fn input(&self, field: Field) -> Option<&FieldInput> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| &f.input)
    }

    fn text(&self, field: Field) -> String {
        match self.input(field) {
            Some(FieldInput::Text { value, .. }) => value.clone(),
            _ => String::new(),
        }
    }

    fn number(&self, field: Field) -> Option<f64> {
        match self.input(field) {
            Some(FieldInput::Numeric {
                value, min, max, ..
            }) => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(*min, *max)),
            _ => None,
        }
    }

    fn selected(&self, field: Field) -> Option<usize> {
        match self.input(field) {
            Some(FieldInput::Select { selected, .. }) => *selected,
            _ => None,
        }
    }

    fn choice<T: Choice>(&self, field: Field) -> Option<T> {
        self.selected(field).and_then(|i| T::ALL.get(i).copied())
    }

    fn level(&self, field: Field) -> Option<String> {
        let attribute = field.ordinal()?;
        self.selected(field)
            .and_then(|i| ordinal_encoding().levels(attribute).get(i))
            .map(|level| (*level).to_string())
    }

    /// Collect control values into a raw form for validation.
    pub fn to_intake_form(&mut self) -> IntakeForm {
        self.commit_focused();
        IntakeForm {
            first_name: self.text(Field::FirstName),
            last_name: self.text(Field::LastName),
            phone: self.text(Field::Phone),
            age: self.number(Field::Age).map(|v| v.round() as u32),
            height_m: self.number(Field::Height),
            weight_kg: self.number(Field::Weight),
            sex: self.choice(Field::Sex),
            family_history: self.choice(Field::FamilyHistory),
            high_caloric_food: self.choice(Field::HighCaloricFood),
            smoking: self.choice(Field::Smoking),
            calorie_monitoring: self.choice(Field::CalorieMonitoring),
            transport: self.choice(Field::Transport),
            vegetables: self.level(Field::Vegetables),
            main_meals: self.level(Field::MainMeals),
            snacks: self.level(Field::Snacks),
            water: self.level(Field::Water),
            physical_activity: self.level(Field::PhysicalActivity),
            screen_time: self.level(Field::ScreenTime),
            alcohol: self.level(Field::Alcohol),
        }
    }

    /// Wipe all buffers and reset every control.
    ///
    /// Called once a screening completes so entered data does not linger
    /// in UI state.
    pub fn clear_sensitive(&mut self) {
        for form_field in self.fields.iter_mut() {
            match &mut form_field.input {
                FieldInput::Text { value, .. } | FieldInput::Numeric { value, .. } => {
                    value.zeroize();
                }
                FieldInput::Select { selected, .. } => *selected = None,
            }
        }
        self.errors.clear();
        self.focus = 0;
    }

    /// Load sample data for testing
    pub fn load_sample_data(&mut self) {
        for form_field in self.fields.iter_mut() {
            match (&form_field.field, &mut form_field.input) {
                (Field::FirstName, FieldInput::Text { value, .. }) => *value = "Maria".into(),
                (Field::LastName, FieldInput::Text { value, .. }) => *value = "Silva".into(),
                (Field::Phone, FieldInput::Text { value, .. }) => *value = "11987654321".into(),
                (Field::Age, FieldInput::Numeric { value, .. }) => *value = "34".into(),
                (Field::Height, FieldInput::Numeric { value, .. }) => *value = "1.65".into(),
                (Field::Weight, FieldInput::Numeric { value, .. }) => *value = "82.5".into(),
                (_, FieldInput::Select { options, selected }) if !options.is_empty() => {
                    *selected = Some(1.min(options.len() - 1));
                }
                _ => {}
            }
        }
        self.errors.clear();
    }
}

/// Render the intake form
pub fn render_intake_form(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    // Border and heading, then every error in two columns.
    let footer_height = if state.errors.is_empty() {
        3
    } else {
        state.errors.len().div_ceil(2) as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Min(0),                // Fields
            Constraint::Length(3),             // Submit button
            Constraint::Length(footer_height), // Errors or key hints
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_submit_button(f, chunks[2], state.is_submit_focused());
    render_form_footer(f, chunks[3], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Obesity Screening", MedicalTheme::title()),
        Span::styled(
            " │ All fields are mandatory",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .margin(1)
        .split(area);

    let [a, b] = COLUMN_SPLITS;
    let titles = [" Personal & Biometrics ", " Health & Diet ", " Routine "];
    let ranges = [0..a, a..b, b..state.fields.len()];

    for ((column, range), title) in columns.iter().zip(ranges).zip(titles) {
        let offset = range.start;
        render_field_column(f, *column, title, &state.fields[range], offset, state);
    }
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    title: &str,
    fields: &[FormField],
    offset: usize,
    state: &IntakeFormState,
) {
    let block = Block::default()
        .title(Span::styled(title.to_string(), MedicalTheme::subtitle()))
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, form_field) in fields.iter().enumerate() {
        let is_focused = offset + i == state.focus;
        let has_error = state.errors.iter().any(|e| e.field() == form_field.field);
        render_field(f, chunks[i], form_field, is_focused, has_error);
    }
}

fn render_field(
    f: &mut Frame,
    area: Rect,
    form_field: &FormField,
    is_focused: bool,
    has_error: bool,
) {
    let (border_style, title_style) = match (is_focused, has_error) {
        (true, false) => (MedicalTheme::border_focused(), MedicalTheme::focused()),
        (true, true) => (MedicalTheme::border_focused(), MedicalTheme::danger()),
        (false, true) => (MedicalTheme::danger(), MedicalTheme::danger()),
        (false, false) => (MedicalTheme::border(), MedicalTheme::text_secondary()),
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", form_field.field.label()),
            title_style,
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut spans = vec![Span::raw(" ")];
    match &form_field.input {
        FieldInput::Text { value, placeholder } | FieldInput::Numeric { value, placeholder, .. } => {
            if value.is_empty() {
                spans.push(Span::styled(*placeholder, MedicalTheme::text_muted()));
            } else {
                spans.push(Span::styled(value.as_str(), MedicalTheme::text()));
            }
            if is_focused {
                spans.push(Span::styled("▌", MedicalTheme::cursor()));
            }
        }
        FieldInput::Select { options, selected } => match selected.and_then(|i| options.get(i)) {
            Some(option) => {
                if is_focused {
                    spans.push(Span::styled("‹ ", MedicalTheme::key_hint()));
                }
                spans.push(Span::styled(*option, MedicalTheme::text()));
                if is_focused {
                    spans.push(Span::styled(" ›", MedicalTheme::key_hint()));
                }
            }
            None => spans.push(Span::styled("Select...", MedicalTheme::text_muted())),
        },
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_submit_button(f: &mut Frame, area: Rect, is_focused: bool) {
    let (style, border) = if is_focused {
        (MedicalTheme::selected(), MedicalTheme::border_focused())
    } else {
        (MedicalTheme::focused(), MedicalTheme::border())
    };

    let button = Paragraph::new(Line::from(Span::styled(" REGISTER AND CALCULATE ", style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));

    f.render_widget(button, area);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &IntakeFormState) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    if state.errors.is_empty() {
        let hints = Line::from(vec![
            Span::styled("[↑↓/Tab] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→/1-9] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Del] ", MedicalTheme::key_hint()),
            Span::styled("Clear ", MedicalTheme::key_desc()),
            Span::styled("[F2] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Enter on button] ", MedicalTheme::key_hint()),
            Span::styled("Submit ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]);
        f.render_widget(Paragraph::new(hints).block(block), area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let heading = Paragraph::new(Line::from(Span::styled(
        "! Form incomplete or invalid. Check the fields below:",
        MedicalTheme::danger(),
    )));
    f.render_widget(heading, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(rows[1]);

    let per_column = state.errors.len().div_ceil(2);
    for (column, errors) in columns.iter().zip(state.errors.chunks(per_column)) {
        let lines: Vec<Line> = errors
            .iter()
            .map(|e| Line::from(Span::styled(format!("  • {e}"), MedicalTheme::danger())))
            .collect();
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), *column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::ui::tests::render_to_text;

    fn focus_on(state: &mut IntakeFormState, field: Field) {
        state.focus = state
            .fields
            .iter()
            .position(|f| f.field == field)
            .expect("field on form");
    }

    fn type_str(state: &mut IntakeFormState, s: &str) {
        for c in s.chars() {
            state.input_char(c);
        }
    }

    #[test]
    fn test_form_covers_every_field() {
        let state = IntakeFormState::default();
        assert_eq!(state.fields.len(), 19);
        assert!(COLUMN_SPLITS[1] < state.fields.len());
    }

    #[test]
    fn test_new_form_is_empty() {
        let mut state = IntakeFormState::default();
        let errors = state.to_intake_form().validate().expect_err("empty form");
        assert_eq!(errors.len(), 19);
    }

    #[test]
    fn test_sample_data_validates() {
        let mut state = IntakeFormState::default();
        state.load_sample_data();
        let record = state.to_intake_form().validate().expect("sample is valid");
        assert_eq!(record.age, 34);
        assert_eq!(record.sex, BiologicalSex::Female);
        assert_eq!(record.habits.main_meals, "two");
    }

    #[test]
    fn test_focus_wraps_through_submit_button() {
        let mut state = IntakeFormState::default();
        state.prev_field();
        assert!(state.is_submit_focused());
        state.next_field();
        assert_eq!(state.focus, 0);
    }

    #[test]
    fn test_numeric_control_clamps_on_leave() {
        let mut state = IntakeFormState::default();
        focus_on(&mut state, Field::Height);
        type_str(&mut state, "175");
        state.next_field();
        assert_eq!(state.to_intake_form().height_m, Some(2.5));

        focus_on(&mut state, Field::Age);
        type_str(&mut state, "7");
        state.next_field();
        assert_eq!(state.to_intake_form().age, Some(14));
    }

    #[test]
    fn test_numeric_control_filters_input() {
        let mut state = IntakeFormState::default();
        focus_on(&mut state, Field::Weight);
        type_str(&mut state, "8a0,5.3");
        assert_eq!(state.to_intake_form().weight_kg, Some(80.53));

        focus_on(&mut state, Field::Age);
        type_str(&mut state, "3.4");
        assert_eq!(state.to_intake_form().age, Some(34));
    }

    #[test]
    fn test_phone_control_filters_input() {
        let mut state = IntakeFormState::default();
        focus_on(&mut state, Field::Phone);
        type_str(&mut state, "(11) 9abc8765-4321");
        assert_eq!(state.to_intake_form().phone, "(11) 98765-4321");
    }

    #[test]
    fn test_select_cycling_and_clearing() {
        let mut state = IntakeFormState::default();
        focus_on(&mut state, Field::Transport);
        assert_eq!(state.to_intake_form().transport, None);

        state.cycle_option(false);
        assert_eq!(state.to_intake_form().transport, Some(Transport::PublicTransport));
        state.cycle_option(true);
        assert_eq!(state.to_intake_form().transport, Some(Transport::Walking));

        state.input_char('3');
        assert_eq!(state.to_intake_form().transport, Some(Transport::Car));

        state.clear_field();
        assert_eq!(state.to_intake_form().transport, None);
    }

    #[test]
    fn test_ordinal_select_yields_level_text() {
        let mut state = IntakeFormState::default();
        focus_on(&mut state, Field::Water);
        state.cycle_option(false);
        assert_eq!(state.to_intake_form().water.as_deref(), Some("> 2 L/day"));
    }

    #[test]
    fn test_clear_sensitive_resets_everything() {
        let mut state = IntakeFormState::default();
        state.load_sample_data();
        state.errors.push(FieldError::InvalidPhone);
        state.clear_sensitive();

        assert!(state.errors.is_empty());
        assert_eq!(state.focus, 0);
        let errors = state.to_intake_form().validate().expect_err("cleared");
        assert_eq!(errors.len(), 19);
    }

    #[test]
    fn test_every_error_is_drawn() {
        let mut state = IntakeFormState::default();
        state.errors = state.to_intake_form().validate().expect_err("empty form");
        assert_eq!(state.errors.len(), 19);

        for (width, height) in [(160, 60), (100, 40)] {
            let screen = render_to_text(width, height, |f| {
                let area = f.area();
                render_intake_form(f, area, &state)
            });
            let missing: Vec<String> = state
                .errors
                .iter()
                .map(ToString::to_string)
                .filter(|e| !screen.contains(e.as_str()))
                .collect();
            assert!(missing.is_empty(), "{width}x{height} hides {missing:?}");
        }
    }

    #[test]
    fn test_invalid_phone_is_drawn() {
        let mut state = IntakeFormState::default();
        state.load_sample_data();
        focus_on(&mut state, Field::Phone);
        state.clear_field();
        type_str(&mut state, "123");
        state.errors = state.to_intake_form().validate().expect_err("bad phone");

        let screen = render_to_text(160, 60, |f| {
            let area = f.area();
            render_intake_form(f, area, &state)
        });
        assert!(screen.contains(&FieldError::InvalidPhone.to_string()));
    }

    #[test]
    fn test_key_hints_without_errors() {
        let state = IntakeFormState::default();
        let screen = render_to_text(160, 60, |f| {
            let area = f.area();
            render_intake_form(f, area, &state)
        });
        assert!(screen.contains("REGISTER AND CALCULATE"));
        assert!(screen.contains("Sample Data"));
    }

    #[test]
    fn test_ordinal_options_come_from_encoding_table() {
        let state = IntakeFormState::default();
        for form_field in &state.fields {
            if let (Some(attribute), FieldInput::Select { options, .. }) =
                (form_field.field.ordinal(), &form_field.input)
            {
                assert_eq!(options.as_slice(), ordinal_encoding().levels(attribute));
            }
        }
    }
}

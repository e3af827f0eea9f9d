//! Screening outcome view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::ScreeningOutcome;
use crate::tui::styles::MedicalTheme;

/// BMI range covered by the gauge.
const GAUGE_MIN_BMI: f64 = 10.0;
const GAUGE_MAX_BMI: f64 = 50.0;

/// Outcome state
#[derive(Debug, Clone, Default)]
pub enum OutcomeState {
    /// Nothing screened yet
    #[default]
    Idle,
    /// Completed with result
    Complete { outcome: ScreeningOutcome },
    /// Processing failed after validation
    Error { message: String },
}

/// Render the outcome screen
pub fn render_outcome(f: &mut Frame, area: Rect, state: &OutcomeState, model_label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_outcome_header(f, chunks[0], model_label);
    match state {
        OutcomeState::Idle => render_idle(f, chunks[1]),
        OutcomeState::Complete { outcome } => render_result(f, chunks[1], outcome),
        OutcomeState::Error { message } => render_error(f, chunks[1], message),
    }
    render_outcome_footer(f, chunks[2]);
}

fn render_outcome_header(f: &mut Frame, area: Rect, model_label: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Screening Result", MedicalTheme::title()),
        Span::styled(format!(" │ {model_label}"), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(Line::from(Span::styled(
        "No screening submitted yet",
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_result(f: &mut Frame, area: Rect, outcome: &ScreeningOutcome) {
    let block = Block::default()
        .title(Span::styled(" Registration complete ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Patient
            Constraint::Length(4), // Classification
            Constraint::Length(3), // BMI gauge
            Constraint::Min(0),    // Guidance
        ])
        .margin(1)
        .split(inner);

    let patient = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Patient: ", MedicalTheme::text_secondary()),
            Span::styled(outcome.patient_name.as_str(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Contact: ", MedicalTheme::text_secondary()),
            Span::styled(outcome.phone_display.as_str(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled("Screened at: ", MedicalTheme::text_secondary()),
            Span::styled(
                outcome.screened_at.format("%Y-%m-%d %H:%M UTC").to_string(),
                MedicalTheme::text_muted(),
            ),
        ]),
    ]);
    f.render_widget(patient, chunks[0]);

    let class_style = MedicalTheme::weight_class(outcome.weight_class);
    let classification = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Nutritional status: {}", outcome.weight_class),
            class_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Calculated BMI: ", MedicalTheme::text_secondary()),
            Span::styled(outcome.bmi.to_string(), MedicalTheme::text()),
        ]),
    ])
    .alignment(Alignment::Center);
    f.render_widget(classification, chunks[1]);

    let ratio = ((outcome.bmi.value() - GAUGE_MIN_BMI) / (GAUGE_MAX_BMI - GAUGE_MIN_BMI))
        .clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" BMI ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(class_style)
        .ratio(ratio)
        .label(outcome.bmi.to_string());
    f.render_widget(gauge, chunks[2]);

    if let Some(guidance) = outcome.weight_class.guidance() {
        let guidance = Paragraph::new(Line::from(Span::styled(guidance.message(), class_style)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(guidance, chunks[3]);
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_outcome_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("New Screening ", MedicalTheme::key_desc()),
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bmi, Guidance, WeightClass};
    use crate::tui::ui::tests::render_to_text;
    use crate::ScreeningError;

    fn outcome(weight_class: WeightClass) -> ScreeningOutcome {
        ScreeningOutcome {
            patient_name: "Maria Silva".into(),
            phone_display: "(11) 99999-9999".into(),
            bmi: Bmi::from_measurements(70.0, 1.75),
            class_code: 1,
            weight_class,
            screened_at: chrono::Utc::now(),
        }
    }

    fn draw(state: &OutcomeState) -> String {
        render_to_text(120, 36, |f| {
            let area = f.area();
            render_outcome(f, area, state, "demo v1.0.0")
        })
    }

    #[test]
    fn test_result_screen_shows_outcome() {
        let screen = draw(&OutcomeState::Complete {
            outcome: outcome(WeightClass::Normal),
        });

        assert!(screen.contains("Maria Silva"));
        assert!(screen.contains("(11) 99999-9999"));
        assert!(screen.contains("22.86"));
        assert!(screen.contains("Nutritional status: Normal"));
        assert!(screen.contains(Guidance::Healthy.message()));
        assert!(screen.contains("demo v1.0.0"));
    }

    #[test]
    fn test_unknown_class_has_no_guidance() {
        let screen = draw(&OutcomeState::Complete {
            outcome: outcome(WeightClass::Unknown),
        });

        assert!(screen.contains("Nutritional status: Unknown"));
        assert!(!screen.contains("Congratulations"));
        assert!(!screen.contains("Attention"));
    }

    #[test]
    fn test_processing_error_screen() {
        let message = ScreeningError::Processing("shape mismatch".into()).to_string();
        let screen = draw(&OutcomeState::Error { message });

        assert!(screen.contains("Internal error while processing data: shape mismatch"));
    }
}

//! UI module: View components for the TUI.

pub mod intake;
pub mod outcome;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This screening is indicative only and does not replace evaluation by a physician or nutritionist.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Data entered here is kept in memory only and cleared after each screening.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Shown instead of the form when the model artifacts could not be loaded.
pub fn render_fatal(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "! Model artifacts unavailable",
            MedicalTheme::danger(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
        Line::from(""),
        Line::from(Span::styled(
            "Screening is disabled. Restore the model files and restart.",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Fatal error ", MedicalTheme::danger()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ScreeningError;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    /// Draw into an in-memory terminal and return the screen as text rows.
    pub(crate) fn render_to_text(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal.draw(draw).expect("draw");

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_fatal_screen_shows_load_error() {
        let message = ScreeningError::MissingArtifact {
            path: PathBuf::from("models/model.json"),
            reason: "failed to read: not found".into(),
        }
        .to_string();

        let screen = render_to_text(120, 20, |f| {
            let area = f.area();
            render_fatal(f, area, &message)
        });
        assert!(screen.contains("Model artifacts unavailable"));
        assert!(screen.contains(&message), "load error missing:\n{screen}");
    }

    #[test]
    fn test_disclaimer_is_drawn() {
        let screen = render_to_text(160, 3, |f| {
            let area = f.area();
            render_disclaimer(f, area)
        });
        assert!(screen.contains("does not replace evaluation by a physician"));
    }
}

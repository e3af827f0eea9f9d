//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{load_artifacts, ModelArtifacts, PipelineModel};
use crate::application::ScreeningService;
use crate::config::Settings;
use crate::ScreeningError;

use super::ui::{
    intake::{render_intake_form, IntakeFormState},
    outcome::{render_outcome, OutcomeState},
    render_disclaimer, render_fatal,
};

/// Current screen/view in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Artifacts failed to load; nothing can be screened.
    Fatal,
    Intake,
    Outcome,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// `None` when the model artifacts could not be loaded
    service: Option<ScreeningService<PipelineModel>>,

    /// Model name and version shown next to results
    model_label: String,

    /// Load failure shown on the fatal screen
    fatal_message: String,

    form_state: IntakeFormState,

    outcome_state: OutcomeState,
}

impl App {
    /// Create the application, loading model artifacts from the configured
    /// directory. A load failure leaves the app on the fatal screen.
    pub fn new(settings: &Settings) -> Self {
        Self::with_artifacts(load_artifacts(&settings.model_dir))
    }

    /// Create the application from an already attempted artifact load.
    pub fn with_artifacts(loaded: Result<ModelArtifacts, ScreeningError>) -> Self {
        let mut app = Self {
            screen: Screen::Intake,
            should_quit: false,
            service: None,
            model_label: String::new(),
            fatal_message: String::new(),
            form_state: IntakeFormState::default(),
            outcome_state: OutcomeState::default(),
        };

        match loaded {
            Ok(artifacts) => {
                let metadata = artifacts.metadata;
                app.model_label = format!("{} v{}", metadata.model_name, metadata.version);
                app.service = Some(ScreeningService::new(Arc::new(artifacts.model)));
            }
            Err(e) => {
                tracing::error!("Cannot start screening: {}", e);
                app.fatal_message = e.to_string();
                app.screen = Screen::Fatal;
            }
        }

        app
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Fatal => render_fatal(f, content_area, &self.fatal_message),
                    Screen::Intake => render_intake_form(f, content_area, &self.form_state),
                    Screen::Outcome => {
                        render_outcome(f, content_area, &self.outcome_state, &self.model_label)
                    }
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Esc
            || (key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Fatal => {}
            Screen::Intake => self.handle_intake_key(key, modifiers),
            Screen::Outcome => self.handle_outcome_key(key),
        }
    }

    fn handle_intake_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => self.form_state.cycle_option(false),
            KeyCode::Right => self.form_state.cycle_option(true),
            KeyCode::F(2) => self.form_state.load_sample_data(),
            // Shortcuts like Ctrl+C are not text.
            KeyCode::Char(_)
                if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => {
                if self.form_state.is_submit_focused() {
                    self.submit_intake();
                } else {
                    self.form_state.next_field();
                }
            }
            _ => {}
        }
    }

    fn handle_outcome_key(&mut self, key: KeyCode) {
        if key == KeyCode::Enter {
            self.outcome_state = OutcomeState::Idle;
            self.screen = Screen::Intake;
        }
    }

    fn submit_intake(&mut self) {
        let Some(service) = &self.service else {
            return;
        };

        let form = self.form_state.to_intake_form();
        match service.submit(&form) {
            Ok(outcome) => {
                self.outcome_state = OutcomeState::Complete { outcome };
                self.screen = Screen::Outcome;
                // Clear plaintext buffers from the UI immediately.
                self.form_state.clear_sensitive();
            }
            Err(ScreeningError::Validation(errors)) => {
                self.form_state.errors = errors;
            }
            Err(e) => {
                self.outcome_state = OutcomeState::Error {
                    message: e.to_string(),
                };
                self.screen = Screen::Outcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeightClass;
    use std::path::PathBuf;

    fn bundled_app() -> App {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models");
        App::with_artifacts(load_artifacts(&dir))
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    fn focus_submit(app: &mut App) {
        press(app, KeyCode::Up);
        assert!(app.form_state.is_submit_focused());
    }

    #[test]
    fn test_missing_artifacts_show_fatal_screen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = App::with_artifacts(load_artifacts(dir.path()));

        assert_eq!(app.screen, Screen::Fatal);
        assert!(app.fatal_message.contains("model.json"));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Fatal);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_empty_submission_lists_errors() {
        let mut app = bundled_app();
        assert_eq!(app.screen, Screen::Intake);

        focus_submit(&mut app);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Intake);
        assert_eq!(app.form_state.errors.len(), 19);
        assert_eq!(
            app.form_state.errors[0].to_string(),
            "Field 'First name' is required."
        );
    }

    #[test]
    fn test_enter_on_field_only_moves_focus() {
        let mut app = bundled_app();
        app.form_state.load_sample_data();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Intake);
        assert_eq!(app.form_state.focus, 1);
    }

    #[test]
    fn test_sample_submission_completes_and_clears_form() {
        let mut app = bundled_app();
        press(&mut app, KeyCode::F(2));
        focus_submit(&mut app);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Outcome);
        match &app.outcome_state {
            OutcomeState::Complete { outcome } => {
                assert_eq!(outcome.patient_name, "Maria Silva");
                assert_eq!(outcome.phone_display, "(11) 98765-4321");
                assert_ne!(outcome.weight_class, WeightClass::Unknown);
            }
            other => panic!("expected a result, got {other:?}"),
        }
        assert!(app.form_state.to_intake_form().first_name.is_empty());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Intake);
    }

    #[test]
    fn test_control_chars_are_not_typed() {
        let mut app = bundled_app();
        app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.handle_key(KeyCode::Char('x'), KeyModifiers::ALT);
        app.handle_key(KeyCode::Char('M'), KeyModifiers::SHIFT);

        assert!(!app.should_quit);
        assert_eq!(app.form_state.to_intake_form().first_name, "M");
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut app = bundled_app();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }
}

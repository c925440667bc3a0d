//! Main TUI application state machine.
//!
//! Handles:
//! - Input event handling
//! - Form / result state transitions
//! - Service integration
//!
//! The form is live: the preview is rebuilt from the current values on every
//! frame, and any value change clears a shown result. Inference only runs on
//! Predict.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::{load_artifacts, LogisticClassifier};
use crate::application::PredictionService;
use crate::config::AppConfig;

use super::ui::{
    form::{render_form, FormState},
    help::{panel_height, render_help},
    preview::render_preview,
    render_disclaimer, render_footer, render_header,
    result::{render_result, ResultState},
};

/// Main application state
pub struct App {
    /// Whether the app should quit
    should_quit: bool,

    /// Prediction service over the loaded artifacts
    service: PredictionService<LogisticClassifier>,

    form_state: FormState,

    result_state: ResultState,

    /// Whether the help panel is expanded
    help_expanded: bool,
}

impl App {
    /// Load artifacts named by `config` and build the application.
    ///
    /// Nothing touches the terminal here, so a failure leaves the screen
    /// untouched.
    ///
    /// # Errors
    /// Returns error if an artifact is missing, malformed, fails its
    /// manifest check or disagrees with the other artifact.
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let (classifier, schema) = load_artifacts(&config.artifact_paths(), &config.positive_label)
            .with_context(|| {
                format!(
                    "Failed to load model artifacts ({:?}, {:?})",
                    config.model_path, config.features_path
                )
            })?;

        let service = PredictionService::new(Arc::new(classifier), Arc::new(schema))
            .context("Model and feature schema are incompatible")?;
        tracing::info!(
            "Prediction service ready (positive_label={:?}, columns={})",
            service.positive_label(),
            service.schema().len()
        );

        Ok(Self::with_service(service))
    }

    /// Create application with an injected service (Composition Root pattern).
    #[must_use]
    pub fn with_service(service: PredictionService<LogisticClassifier>) -> Self {
        Self {
            should_quit: false,
            service,
            form_state: FormState::default(),
            result_state: ResultState::default(),
            help_expanded: false,
        }
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
            terminal.draw(|f| self.draw(f))?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
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

    /// Draw one frame.
    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(24),   // Form + side panels
                Constraint::Length(panel_height(self.help_expanded)),
                Constraint::Length(3), // Footer
                Constraint::Length(3), // Disclaimer
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(body[1]);

        let record = self.service.build_record(&self.form_state.to_inputs());

        render_header(f, chunks[0]);
        render_form(f, body[0], &self.form_state);
        render_result(f, side[0], &self.result_state);
        render_preview(f, side[1], &record);
        render_help(f, chunks[2], self.help_expanded);
        render_footer(f, chunks[3], self.form_state.selected_control());
        render_disclaimer(f, chunks[4]);
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let changed = match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                false
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_control();
                false
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_control();
                false
            }
            KeyCode::Left => self.form_state.adjust(-1),
            KeyCode::Right => self.form_state.adjust(1),
            KeyCode::PageDown => self.form_state.adjust_coarse(false),
            KeyCode::PageUp => self.form_state.adjust_coarse(true),
            KeyCode::Home => self.form_state.jump(false),
            KeyCode::End => self.form_state.jump(true),
            KeyCode::Char('r') | KeyCode::Char('R') => self.form_state.reset_values(),
            KeyCode::Char('?') => {
                self.help_expanded = !self.help_expanded;
                false
            }
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.form_state.focus_predict();
                self.predict();
                false
            }
            _ => false,
        };

        if changed {
            self.result_state = ResultState::Idle;
        }
    }

    fn predict(&mut self) {
        let inputs = self.form_state.to_inputs();
        self.result_state = match self.service.predict(&inputs) {
            Ok(prediction) => ResultState::Shown { prediction },
            Err(e) => {
                tracing::error!("Prediction failed: {}", e);
                ResultState::Error {
                    message: e.to_string(),
                }
            }
        };
    }
}

//! Prediction result panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Prediction, Verdict};
use crate::tui::styles::MedicalTheme;

/// What the result panel currently shows.
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// No prediction for the current inputs
    #[default]
    Idle,
    /// Outcome of the last Predict
    Shown { prediction: Prediction },
    /// Predict failed
    Error { message: String },
}

impl ResultState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Render the result panel
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    match state {
        ResultState::Idle => render_idle(f, area),
        ResultState::Shown { prediction } => render_prediction(f, area, prediction),
        ResultState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Adjust the inputs, then press Predict",
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Result ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_prediction(f: &mut Frame, area: Rect, prediction: &Prediction) {
    let verdict_style = MedicalTheme::verdict(prediction.verdict);
    let block = Block::default()
        .title(Span::styled(" Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(verdict_style);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Message
            Constraint::Length(3), // Probability
            Constraint::Min(0),    // Timestamp
        ])
        .split(inner);

    let icon = match prediction.verdict {
        Verdict::AtRisk => "!",
        Verdict::NotAtRisk => "OK",
    };

    let mut lines: Vec<Line> = prediction
        .message()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                Line::from(Span::styled(
                    format!("{icon} {line}"),
                    verdict_style.add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(line.to_string(), MedicalTheme::text()))
            }
        })
        .collect();
    lines.push(Line::from(Span::styled(
        format!("Model label: {}", prediction.label),
        MedicalTheme::text_muted(),
    )));

    let message = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(message, chunks[0]);

    let percent = (prediction.probability * 100.0).round().clamp(0.0, 100.0) as u16;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Disease Probability ",
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(verdict_style)
        .percent(percent)
        .label(prediction.probability_text());
    f.render_widget(gauge, chunks[1]);

    let stamp = Paragraph::new(Line::from(Span::styled(
        format!(
            "Computed {}",
            prediction.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(stamp, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(Span::styled("! Prediction failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Result ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

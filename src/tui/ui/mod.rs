//! UI module: View components for the TUI.

pub mod form;
pub mod help;
pub mod preview;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;
use form::Control;

pub fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" Heart Disease Prediction", MedicalTheme::title()),
            Span::styled(" │ CardioRisk", MedicalTheme::text_secondary()),
        ]),
        Line::from(Span::styled(
            " Predict the likelihood of heart disease based on important medical features.",
            MedicalTheme::text_muted(),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Columns marked \"assumed\" use a fixed reference profile, not patient data.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Key hints plus the help hint of the focused control.
pub fn render_footer(f: &mut Frame, area: Rect, focused: Control) {
    let keys = Line::from(vec![
        Span::styled("[↑↓] ", MedicalTheme::key_hint()),
        Span::styled("Select ", MedicalTheme::key_desc()),
        Span::styled("[←→] ", MedicalTheme::key_hint()),
        Span::styled("Adjust ", MedicalTheme::key_desc()),
        Span::styled("[PgUp/PgDn] ", MedicalTheme::key_hint()),
        Span::styled("Step 10 ", MedicalTheme::key_desc()),
        Span::styled("[Enter] ", MedicalTheme::key_hint()),
        Span::styled("Predict ", MedicalTheme::key_desc()),
        Span::styled("[R] ", MedicalTheme::key_hint()),
        Span::styled("Reset ", MedicalTheme::key_desc()),
        Span::styled("[?] ", MedicalTheme::key_hint()),
        Span::styled("Help ", MedicalTheme::key_desc()),
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);
    let hint = Line::from(vec![
        Span::styled(format!("{}: ", focused.label()), MedicalTheme::focused()),
        Span::styled(focused.hint(), MedicalTheme::text_secondary()),
    ]);

    let footer = Paragraph::new(vec![hint, keys]).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

//! Collapsible "What do these features mean?" panel.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::ChestPainType;
use crate::tui::styles::MedicalTheme;

const TITLE: &str = "What do these features mean?";

fn chest_pain_description(kind: ChestPainType) -> &'static str {
    match kind {
        ChestPainType::TypicalAngina => "Chest pain due to heart ischemia.",
        ChestPainType::AtypicalAngina => "Chest pain not following the typical pattern.",
        ChestPainType::NonAnginalPain => "Chest pain from other causes.",
        ChestPainType::Asymptomatic => "No chest pain.",
    }
}

fn entry<'a>(term: &'a str, text: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{term}: "), MedicalTheme::subtitle()),
        Span::styled(text, MedicalTheme::text()),
    ])
}

/// Help text lines, in display order.
fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        entry(
            "ST Depression",
            "A measure of the deviation of the ST segment on an ECG during stress test. High values indicate possible heart problems.",
        ),
        Line::from(""),
        entry(
            "Thallium Test",
            "A nuclear imaging test showing blood flow to the heart. Values indicate areas with reduced blood flow.",
        ),
        Line::from(""),
        entry(
            "Number of Vessels (Fluoroscopy)",
            "The count of major coronary arteries with significant blockage.",
        ),
        Line::from(""),
        Line::from(Span::styled("Chest Pain Type:", MedicalTheme::subtitle())),
    ];

    lines.extend(ChestPainType::ALL.into_iter().map(|kind| {
        Line::from(vec![
            Span::styled(format!("  - {}: ", kind.label()), MedicalTheme::info()),
            Span::styled(chest_pain_description(kind), MedicalTheme::text_secondary()),
        ])
    }));

    lines
}

/// Height the panel needs in the given state.
#[must_use]
pub fn panel_height(expanded: bool) -> u16 {
    if expanded {
        14
    } else {
        3
    }
}

/// Render the help panel, collapsed to its title unless `expanded`.
pub fn render_help(f: &mut Frame, area: Rect, expanded: bool) {
    let marker = if expanded { "▼" } else { "▶" };
    let block = Block::default()
        .title(Span::styled(
            format!(" {marker} {TITLE} [?] "),
            MedicalTheme::text_secondary(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let body = if expanded {
        help_lines()
    } else {
        vec![Line::from(Span::styled(
            "Press ? to expand",
            MedicalTheme::text_muted(),
        ))]
    };

    let p = Paragraph::new(body).block(block).wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_covers_every_chest_pain_category() {
        let text: String = help_lines()
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect();
        for kind in ChestPainType::ALL {
            assert!(text.contains(kind.label()));
        }
        assert!(text.contains("ST Depression"));
        assert!(text.contains("Thallium Test"));
    }
}

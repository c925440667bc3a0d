//! Live preview of the record that Predict would send to the classifier.
//!
//! Rows follow schema order. Values taken from the fixed reference profile
//! are marked "assumed" so it is visible which columns the form does not
//! control.

use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::domain::{FeatureField, FeatureRecord};
use crate::tui::styles::MedicalTheme;

fn format_value(field: FeatureField, value: f64) -> String {
    if field == FeatureField::StDepression {
        format!("{value:.1}")
    } else {
        format!("{value:.0}")
    }
}

/// Render the record preview table
pub fn render_preview(f: &mut Frame, area: Rect, record: &FeatureRecord) {
    let header = Row::new(vec![
        Cell::from("Column"),
        Cell::from("Value"),
        Cell::from("Source"),
    ])
    .style(MedicalTheme::text_secondary());

    let rows: Vec<Row> = record
        .iter()
        .map(|(column, field, value)| {
            let (source, style) = if field.is_user_supplied() {
                ("form", MedicalTheme::text())
            } else {
                ("assumed", MedicalTheme::text_muted())
            };
            Row::new(vec![
                Cell::from(column.to_string()),
                Cell::from(format_value(field, value)),
                Cell::from(source),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(6),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(Span::styled(
                format!(" Feature Record ({} columns) ", record.len()),
                MedicalTheme::subtitle(),
            ))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(table, area);
}

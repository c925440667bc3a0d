//! Medical-themed color palette and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Verdict;

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    // === Primary Colors ===

    /// Deep teal - Primary color
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for accents
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    /// Rose - errors
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Blue - Info
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Background Colors ===

    /// Near-black with blue tint
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    /// Card/panel background
    pub const BG_CARD: Color = Color::Rgb(51, 65, 85); // #334155

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Preset Styles ===

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for the highlighted option of a choice control
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for the Predict button
    #[must_use]
    pub fn button(focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Self::TEXT_PRIMARY)
                .bg(Self::PRIMARY_DARK)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_CARD)
        }
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Get verdict style
    #[must_use]
    pub fn verdict(verdict: Verdict) -> Style {
        let (r, g, b) = verdict.color();
        Style::default().fg(Color::Rgb(r, g, b))
    }
}

//! Risk input form: sliders, a chest-pain dropdown, two step-sliders and the
//! Predict button.
//!
//! Every control is bounded, so the form can only ever hold in-range values.

use std::ops::RangeInclusive;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph},
    Frame,
};

use crate::domain::{
    ChestPainType, ClinicalInputs, AGE_RANGE, CHOLESTEROL_RANGE, MAX_HEART_RATE_RANGE,
    ORDINAL_RANGE, ST_DEPRESSION_TENTHS_RANGE,
};
use crate::tui::styles::MedicalTheme;

/// A focusable element of the form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Age,
    Cholesterol,
    MaxHeartRate,
    StDepression,
    ChestPain,
    Thallium,
    Vessels,
    Predict,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Self::Age,
        Self::Cholesterol,
        Self::MaxHeartRate,
        Self::StDepression,
        Self::ChestPain,
        Self::Thallium,
        Self::Vessels,
        Self::Predict,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Cholesterol => "Cholesterol",
            Self::MaxHeartRate => "Max Heart Rate",
            Self::StDepression => "ST Depression",
            Self::ChestPain => "Chest Pain Type",
            Self::Thallium => "Thallium Test Result",
            Self::Vessels => "Number of Vessels (Fluoroscopy)",
            Self::Predict => "Predict",
        }
    }

    /// One-line help shown while the control is focused.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Age => "Age of the patient in years",
            Self::Cholesterol => "Blood cholesterol level (mg/dL)",
            Self::MaxHeartRate => "Maximum heart rate achieved during exercise",
            Self::StDepression => {
                "ST depression induced by exercise relative to rest, measured in mm. Indicates stress on the heart."
            }
            Self::ChestPain => "Type of chest pain experienced by the patient.",
            Self::Thallium => {
                "Result of the Thallium stress test. Indicates areas of poor blood flow in the heart."
            }
            Self::Vessels => {
                "Number of major heart blood vessels narrowed or blocked, determined via imaging."
            }
            Self::Predict => "Run the classifier on the current values",
        }
    }

    /// Increment used by PageUp/PageDown.
    fn coarse_step(self) -> i32 {
        match self {
            Self::Age | Self::Cholesterol | Self::MaxHeartRate | Self::StDepression => 10,
            _ => 1,
        }
    }
}

/// Form state: current control values and focus.
///
/// ST depression is held in tenths of a millimetre so the slider stays on its
/// 0.1 grid exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub age: u32,
    pub cholesterol: u32,
    pub max_heart_rate: u32,
    pub st_depression_tenths: u32,
    pub chest_pain: ChestPainType,
    pub thallium: u8,
    pub vessels: u8,
    /// Index into `Control::ALL`; only the navigation methods move it
    selected: usize,
}

impl Default for FormState {
    fn default() -> Self {
        let inputs = ClinicalInputs::default();
        Self {
            age: inputs.age,
            cholesterol: inputs.cholesterol,
            max_heart_rate: inputs.max_heart_rate,
            st_depression_tenths: 10,
            chest_pain: inputs.chest_pain,
            thallium: inputs.thallium,
            vessels: inputs.vessels,
            selected: 0,
        }
    }
}

fn step_u32(value: u32, delta: i32, range: &RangeInclusive<u32>) -> u32 {
    let stepped = i64::from(value) + i64::from(delta);
    let clamped = stepped.clamp(i64::from(*range.start()), i64::from(*range.end()));
    u32::try_from(clamped).unwrap_or(*range.start())
}

fn step_u8(value: u8, delta: i32, range: &RangeInclusive<u8>) -> u8 {
    let stepped = i32::from(value) + delta;
    let clamped = stepped.clamp(i32::from(*range.start()), i32::from(*range.end()));
    u8::try_from(clamped).unwrap_or(*range.start())
}

impl FormState {
    #[must_use]
    pub fn selected_control(&self) -> Control {
        Control::ALL[self.selected]
    }

    pub fn next_control(&mut self) {
        self.selected = (self.selected + 1) % Control::ALL.len();
    }

    pub fn prev_control(&mut self) {
        if self.selected == 0 {
            self.selected = Control::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Focus the Predict button.
    pub fn focus_predict(&mut self) {
        self.selected = Control::ALL.len() - 1;
    }

    /// Move the focused control by `steps` (negative moves down).
    ///
    /// Returns `true` if a value changed.
    pub fn adjust(&mut self, steps: i32) -> bool {
        let before = self.to_inputs();
        match self.selected_control() {
            Control::Age => self.age = step_u32(self.age, steps, &AGE_RANGE),
            Control::Cholesterol => {
                self.cholesterol = step_u32(self.cholesterol, steps, &CHOLESTEROL_RANGE)
            }
            Control::MaxHeartRate => {
                self.max_heart_rate = step_u32(self.max_heart_rate, steps, &MAX_HEART_RATE_RANGE)
            }
            Control::StDepression => {
                self.st_depression_tenths =
                    step_u32(self.st_depression_tenths, steps, &ST_DEPRESSION_TENTHS_RANGE)
            }
            Control::ChestPain => {
                self.chest_pain = match steps.signum() {
                    1 => self.chest_pain.next(),
                    -1 => self.chest_pain.prev(),
                    _ => self.chest_pain,
                }
            }
            Control::Thallium => self.thallium = step_u8(self.thallium, steps, &ORDINAL_RANGE),
            Control::Vessels => self.vessels = step_u8(self.vessels, steps, &ORDINAL_RANGE),
            Control::Predict => {}
        }
        self.to_inputs() != before
    }

    /// Move the focused control by its coarse increment.
    pub fn adjust_coarse(&mut self, up: bool) -> bool {
        let step = self.selected_control().coarse_step();
        self.adjust(if up { step } else { -step })
    }

    /// Jump the focused control to its minimum or maximum.
    pub fn jump(&mut self, to_max: bool) -> bool {
        let before = self.to_inputs();
        let pick_u32 = |r: &RangeInclusive<u32>| if to_max { *r.end() } else { *r.start() };
        let pick_u8 = |r: &RangeInclusive<u8>| if to_max { *r.end() } else { *r.start() };

        match self.selected_control() {
            Control::Age => self.age = pick_u32(&AGE_RANGE),
            Control::Cholesterol => self.cholesterol = pick_u32(&CHOLESTEROL_RANGE),
            Control::MaxHeartRate => self.max_heart_rate = pick_u32(&MAX_HEART_RATE_RANGE),
            Control::StDepression => {
                self.st_depression_tenths = pick_u32(&ST_DEPRESSION_TENTHS_RANGE)
            }
            Control::ChestPain => {
                self.chest_pain = if to_max {
                    ChestPainType::Asymptomatic
                } else {
                    ChestPainType::TypicalAngina
                }
            }
            Control::Thallium => self.thallium = pick_u8(&ORDINAL_RANGE),
            Control::Vessels => self.vessels = pick_u8(&ORDINAL_RANGE),
            Control::Predict => {}
        }
        self.to_inputs() != before
    }

    /// Restore every control to its default, keeping focus.
    ///
    /// Returns `true` if a value changed.
    pub fn reset_values(&mut self) -> bool {
        let selected = self.selected;
        let changed = *self != Self { selected, ..Self::default() };
        *self = Self {
            selected,
            ..Self::default()
        };
        changed
    }

    /// Current values as clinical inputs.
    #[must_use]
    pub fn to_inputs(&self) -> ClinicalInputs {
        ClinicalInputs {
            age: self.age,
            cholesterol: self.cholesterol,
            max_heart_rate: self.max_heart_rate,
            st_depression: f64::from(self.st_depression_tenths) / 10.0,
            chest_pain: self.chest_pain,
            thallium: self.thallium,
            vessels: self.vessels,
        }
    }
}

/// Render the input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let constraints: Vec<Constraint> = Control::ALL
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, control) in Control::ALL.iter().enumerate() {
        let focused = i == state.selected;
        let area = chunks[i];
        match control {
            Control::Age => render_slider(f, area, *control, focused, state.age, &AGE_RANGE, ""),
            Control::Cholesterol => render_slider(
                f,
                area,
                *control,
                focused,
                state.cholesterol,
                &CHOLESTEROL_RANGE,
                " mg/dL",
            ),
            Control::MaxHeartRate => render_slider(
                f,
                area,
                *control,
                focused,
                state.max_heart_rate,
                &MAX_HEART_RATE_RANGE,
                " bpm",
            ),
            Control::StDepression => render_st_slider(f, area, focused, state.st_depression_tenths),
            Control::ChestPain => {
                let options: Vec<&str> = ChestPainType::ALL.iter().map(|c| c.label()).collect();
                render_choice(
                    f,
                    area,
                    *control,
                    focused,
                    &options,
                    usize::from(state.chest_pain.code()),
                );
            }
            Control::Thallium | Control::Vessels => {
                let value = if *control == Control::Thallium {
                    state.thallium
                } else {
                    state.vessels
                };
                render_choice(f, area, *control, focused, &["0", "1", "2", "3"], usize::from(value));
            }
            Control::Predict => render_predict_button(f, area, focused),
        }
    }
}

fn control_block(control: Control, focused: bool) -> Block<'static> {
    let (border_style, title_style) = if focused {
        (MedicalTheme::border_focused(), MedicalTheme::focused())
    } else {
        (MedicalTheme::border(), MedicalTheme::text_secondary())
    };

    Block::default()
        .title(Span::styled(format!(" {} ", control.label()), title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn ratio_in(value: u32, range: &RangeInclusive<u32>) -> f64 {
    let span = f64::from(range.end() - range.start());
    if span <= 0.0 {
        return 0.0;
    }
    (f64::from(value.saturating_sub(*range.start())) / span).clamp(0.0, 1.0)
}

fn render_slider(
    f: &mut Frame,
    area: Rect,
    control: Control,
    focused: bool,
    value: u32,
    range: &RangeInclusive<u32>,
    unit: &str,
) {
    let gauge = LineGauge::default()
        .block(control_block(control, focused))
        .filled_style(MedicalTheme::focused())
        .unfilled_style(MedicalTheme::text_muted())
        .ratio(ratio_in(value, range))
        .label(Span::styled(
            format!("{value}{unit} ({}-{})", range.start(), range.end()),
            MedicalTheme::text(),
        ));
    f.render_widget(gauge, area);
}

fn render_st_slider(f: &mut Frame, area: Rect, focused: bool, tenths: u32) {
    let gauge = LineGauge::default()
        .block(control_block(Control::StDepression, focused))
        .filled_style(MedicalTheme::focused())
        .unfilled_style(MedicalTheme::text_muted())
        .ratio(ratio_in(tenths, &ST_DEPRESSION_TENTHS_RANGE))
        .label(Span::styled(
            format!("{:.1} mm (0.0-6.0)", f64::from(tenths) / 10.0),
            MedicalTheme::text(),
        ));
    f.render_widget(gauge, area);
}

fn render_choice(
    f: &mut Frame,
    area: Rect,
    control: Control,
    focused: bool,
    options: &[&str],
    chosen: usize,
) {
    let mut spans = vec![Span::styled(
        if focused { " ◀ " } else { "   " },
        MedicalTheme::key_hint(),
    )];
    for (i, option) in options.iter().enumerate() {
        let style = if i == chosen {
            MedicalTheme::selected()
        } else {
            MedicalTheme::text_muted()
        };
        spans.push(Span::styled(format!(" {option} "), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        if focused { "▶" } else { " " },
        MedicalTheme::key_hint(),
    ));

    let content = Paragraph::new(Line::from(spans)).block(control_block(control, focused));
    f.render_widget(content, area);
}

fn render_predict_button(f: &mut Frame, area: Rect, focused: bool) {
    let label = if focused { "[ Predict ]" } else { "  Predict  " };
    let button = Paragraph::new(Line::from(Span::styled(label, MedicalTheme::button(focused))))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if focused {
                    MedicalTheme::border_focused()
                } else {
                    MedicalTheme::border()
                }),
        );
    f.render_widget(button, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus(state: &mut FormState, control: Control) {
        state.selected = Control::ALL
            .iter()
            .position(|c| *c == control)
            .expect("known control");
    }

    #[test]
    fn test_default_form_matches_default_inputs() {
        assert_eq!(FormState::default().to_inputs(), ClinicalInputs::default());
    }

    #[test]
    fn test_focus_stays_on_a_control() {
        let mut state = FormState::default();
        for _ in 0..Control::ALL.len() * 3 {
            state.next_control();
            assert!(Control::ALL.contains(&state.selected_control()));
        }
        for _ in 0..Control::ALL.len() * 3 {
            state.prev_control();
            assert!(Control::ALL.contains(&state.selected_control()));
        }
        state.focus_predict();
        state.next_control();
        assert_eq!(state.selected_control(), Control::Age);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = FormState::default();
        state.prev_control();
        assert_eq!(state.selected_control(), Control::Predict);
        state.next_control();
        assert_eq!(state.selected_control(), Control::Age);
    }

    #[test]
    fn test_sliders_clamp_at_bounds() {
        let mut state = FormState::default();

        focus(&mut state, Control::Age);
        assert!(state.jump(true));
        assert_eq!(state.age, 100);
        assert!(!state.adjust(1));
        assert_eq!(state.age, 100);
        assert!(state.adjust(-500));
        assert_eq!(state.age, 20);

        focus(&mut state, Control::MaxHeartRate);
        assert!(state.adjust_coarse(true));
        assert_eq!(state.max_heart_rate, 160);
        state.jump(false);
        assert_eq!(state.max_heart_rate, 60);
    }

    #[test]
    fn test_st_depression_steps_by_tenths() {
        let mut state = FormState::default();
        focus(&mut state, Control::StDepression);

        state.adjust(3);
        assert!((state.to_inputs().st_depression - 1.3).abs() < 1e-12);

        state.jump(true);
        assert!((state.to_inputs().st_depression - 6.0).abs() < f64::EPSILON);
        assert!(!state.adjust(1));

        state.jump(false);
        assert_eq!(state.to_inputs().st_depression, 0.0);
    }

    #[test]
    fn test_choice_controls() {
        let mut state = FormState::default();

        focus(&mut state, Control::ChestPain);
        state.adjust(1);
        assert_eq!(state.chest_pain, ChestPainType::AtypicalAngina);
        state.adjust(-2);
        assert_eq!(state.chest_pain, ChestPainType::TypicalAngina);

        focus(&mut state, Control::Vessels);
        state.adjust_coarse(true);
        state.adjust_coarse(true);
        assert_eq!(state.vessels, 2);
        state.jump(true);
        assert_eq!(state.vessels, 3);
        assert!(!state.adjust(1));
    }

    #[test]
    fn test_predict_button_has_no_value() {
        let mut state = FormState::default();
        state.focus_predict();
        assert!(!state.adjust(1));
        assert!(!state.jump(true));
    }

    #[test]
    fn test_reset_values_keeps_focus() {
        let mut state = FormState::default();
        focus(&mut state, Control::Cholesterol);
        state.adjust(25);
        assert!(state.reset_values());
        assert_eq!(state.cholesterol, 200);
        assert_eq!(state.selected_control(), Control::Cholesterol);
        assert!(!state.reset_values());
    }

    #[test]
    fn test_every_control_has_help() {
        for control in Control::ALL {
            assert!(!control.label().is_empty());
            assert!(!control.hint().is_empty());
        }
    }
}

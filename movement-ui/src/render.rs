//! Frame rendering: chord row, control rows, transport readouts.
//!
//! Layout follows the original two-row design: the progression across the
//! top (REVERSED = selected, UNDERLINED = playing), the control fields
//! below, and the inactive mode's rows drawn DIM.

use std::time::Duration;

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use movement_core::PresetBank;
use movement_types::Patch;

use crate::input::{Control, EditorState, UiMode};

const CELL_WIDTH: usize = 7;

/// Everything the renderer reads, gathered in one place.
pub struct ViewState<'a> {
    pub patch: &'a Patch,
    pub editor: &'a EditorState,
    pub bank: &'a PresetBank,
    pub playing_step: Option<usize>,
    pub running: bool,
    pub change_latency: Option<Duration>,
    pub clock_port: Option<&'a str>,
}

pub fn draw(frame: &mut Frame, view: &ViewState) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::default());
    lines.push(chord_row(view));
    lines.push(Line::default());
    lines.push(degree_row(view));
    lines.push(preset_row(view));
    lines.push(control_row(
        view,
        &[Control::Tonic, Control::Octave, Control::Beats],
    ));
    lines.push(control_row(view, &[Control::Add, Control::Delete]));
    lines.push(Line::default());
    lines.push(status_row(view));

    frame.render_widget(Paragraph::new(lines), frame.area());
}

fn pad(text: &str) -> String {
    format!("{:<width$}", text, width = CELL_WIDTH)
}

fn dim_unless(mode_matches: bool) -> Style {
    if mode_matches {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    }
}

fn chord_row(view: &ViewState) -> Line<'static> {
    let base = dim_unless(view.editor.mode == UiMode::Edit);
    let mut spans = vec![Span::raw(" ")];
    for (index, step) in view.patch.progression.steps().iter().enumerate() {
        let mut style = base;
        if view.playing_step == Some(index) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if view.editor.step_index == index {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(pad(&step.token()), style));
        spans.push(Span::styled(" ", base));
    }
    Line::from(spans)
}

fn control_value(view: &ViewState, control: Control) -> String {
    let step = view.patch.progression.step(view.editor.step_index);
    match control {
        Control::Degree => format!("deg: {}", step.degree.name()),
        Control::Quality => format!(
            "qlt: {}",
            step.quality.map(|q| q.symbol()).unwrap_or("-")
        ),
        Control::Preset => unreachable!("preset renders on its own row"),
        Control::Tonic => format!("tnc: {}", view.patch.tonic.name()),
        Control::Octave => format!("oct: {}", view.patch.octave),
        Control::Beats => format!("len: {}", step.beats),
        Control::Add => "add".to_string(),
        Control::Delete => "del".to_string(),
    }
}

fn control_row(view: &ViewState, controls: &[Control]) -> Line<'static> {
    let base = dim_unless(view.editor.mode == UiMode::Ctl);
    let mut spans = vec![Span::raw(" ")];
    for control in controls {
        let mut style = base;
        if view.editor.control == *control {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(pad(&control_value(view, *control)), style));
        spans.push(Span::styled(" ", base));
    }
    Line::from(spans)
}

/// Degree/quality cells plus the inert `inv`/`spr` slots. Inversion and
/// spread are not implemented; the cells render as "-" and take no focus.
fn degree_row(view: &ViewState) -> Line<'static> {
    let base = dim_unless(view.editor.mode == UiMode::Ctl);
    let mut line = control_row(view, &[Control::Degree, Control::Quality]);
    for label in ["inv: -", "spr: -"] {
        line.spans.push(Span::styled(pad(label), base));
        line.spans.push(Span::styled(" ", base));
    }
    line
}

fn preset_row(view: &ViewState) -> Line<'static> {
    let base = dim_unless(view.editor.mode == UiMode::Ctl);
    let name = if view.patch.preset_dirty {
        "-".to_string()
    } else {
        view.bank.name(view.patch.preset_index).to_string()
    };
    let mut style = base;
    if view.editor.control == Control::Preset {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("pst: {}", name), style),
    ])
}

fn status_row(view: &ViewState) -> Line<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let transport = if view.running { "playing" } else { "stopped" };
    let clock = view.clock_port.unwrap_or("no clock");
    let latency = match view.change_latency {
        Some(d) => format!("ltc: {:.2}ms", d.as_secs_f64() * 1000.0),
        None => "ltc: -".to_string(),
    };
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{}  {}  {}", latency, transport, clock),
            dim,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::EditorState;
    use movement_core::PresetBank;
    use movement_types::Patch;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn degree_row_keeps_the_inert_placeholders() {
        let bank = PresetBank::builtin().unwrap();
        let patch = Patch::new(bank.progression(0));
        let editor = EditorState::new();
        let view = ViewState {
            patch: &patch,
            editor: &editor,
            bank: &bank,
            playing_step: None,
            running: false,
            change_latency: None,
            clock_port: None,
        };
        let text = line_text(&degree_row(&view));
        assert!(text.contains("deg: I"));
        assert!(text.contains("qlt: -"));
        assert!(text.contains("inv: -"));
        assert!(text.contains("spr: -"));
    }

    #[test]
    fn selected_chord_cell_is_reversed() {
        let bank = PresetBank::builtin().unwrap();
        let patch = Patch::new(bank.progression(0));
        let editor = EditorState::new();
        let view = ViewState {
            patch: &patch,
            editor: &editor,
            bank: &bank,
            playing_step: Some(1),
            running: true,
            change_latency: None,
            clock_port: None,
        };
        let line = chord_row(&view);
        // spans: leading pad, then cell/space pairs
        assert!(line.spans[1]
            .style
            .add_modifier
            .contains(Modifier::REVERSED));
        assert!(line.spans[3]
            .style
            .add_modifier
            .contains(Modifier::UNDERLINED));
    }
}

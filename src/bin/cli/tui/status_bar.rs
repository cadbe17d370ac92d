use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app_state::{Mode, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    // Show flash message if present
    if let Some(ref msg) = state.flash_message {
        let flash = Paragraph::new(format!(" {}", msg))
            .style(Style::default().bg(Color::Green).fg(Color::Black));
        f.render_widget(flash, area);
        return;
    }

    match state.mode {
        Mode::AddPrompt => {
            let text = format!(" Prompt: {}█", state.input_text);
            let prompt = Paragraph::new(text)
                .style(Style::default().bg(Color::Blue).fg(Color::White));
            f.render_widget(prompt, area);
        }
        Mode::AddAnswer => {
            let text = format!(" Answer for \"{}\": {}█", state.pending_prompt, state.input_text);
            let prompt = Paragraph::new(text)
                .style(Style::default().bg(Color::Magenta).fg(Color::White));
            f.render_widget(prompt, area);
        }
        Mode::Review => {
            let hints = if state.app.session.accepts_input() {
                " Space: flip  l/h: knew it / missed it  e: edit  ?: help  q: quit "
            } else {
                " r: new round  e: edit  ?: help  q: quit "
            };
            draw_hints(f, area, hints);
        }
        Mode::Editor => {
            draw_hints(
                f,
                area,
                " a: add  d: delete  j/k: navigate  Esc: back to review  q: quit ",
            );
        }
    }
}

fn draw_hints(f: &mut Frame, area: Rect, hints: &str) {
    let status = Paragraph::new(hints)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}

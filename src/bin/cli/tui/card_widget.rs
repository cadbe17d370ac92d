use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use super::app_state::TuiState;
use memocards_lib::{EndReason, RoundState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let session = &state.app.session;
    let remaining = session.current_stack().len();

    let title = format!(" {} left ", remaining);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if session.accepts_input() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let text = match (session.round_state(), session.head()) {
        (RoundState::Ended(EndReason::StackEmpty), _) | (_, None) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "All cards done!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press r to start again, or e to edit the stack.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        (RoundState::Ended(EndReason::Timeout), Some(_)) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Time is up!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} cards still to go. Press r to try again.", remaining),
                Style::default().fg(Color::DarkGray),
            )),
        ],
        (_, Some(card)) => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    card.prompt.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            if session.is_revealed() {
                lines.push(Line::from(Span::styled(
                    card.answer.clone(),
                    Style::default().fg(Color::Yellow),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "Space to flip",
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
            lines
        }
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

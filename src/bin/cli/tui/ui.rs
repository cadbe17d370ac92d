use ratatui::layout::{Constraint, Direction, Flex, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use super::app_state::{Mode, TuiState};
use super::{card_widget, editor_widget, status_bar};
use memocards_lib::{EndReason, RoundState};

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let size = f.area();

    // Main layout: timer + content area + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    let timer_area = outer[0];
    let main_area = outer[1];
    let status_area = outer[2];

    draw_timer(f, timer_area, state);

    match state.mode {
        Mode::Review => {
            let card_area = centered(main_area, 60, 12);
            // Save area for mouse hit-testing
            state.card_area = Some(card_area);
            card_widget::draw(f, card_area, state);
        }
        _ => {
            state.card_area = None;
            state.drag_start = None;
            editor_widget::draw(f, main_area, state);
        }
    }

    status_bar::draw(f, status_area, state);

    if state.show_help {
        draw_help(f, size, state);
    }
}

fn draw_timer(f: &mut Frame, area: Rect, state: &TuiState) {
    let session = &state.app.session;
    let duration = state.app.config.round_duration.max(1);
    let remaining = session.remaining();

    let (label, color) = match session.round_state() {
        RoundState::Running => (format!("{}s left", remaining), Color::Cyan),
        RoundState::Paused => (format!("paused, {}s left", remaining), Color::Yellow),
        RoundState::Ended(EndReason::Timeout) => ("time is up".to_string(), Color::Red),
        RoundState::Ended(EndReason::StackEmpty) => ("stack cleared".to_string(), Color::Green),
    };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(f64::from(remaining.min(duration)) / f64::from(duration))
        .label(label);
    f.render_widget(gauge, area);
}

fn draw_help(f: &mut Frame, area: Rect, state: &TuiState) {
    let lines: Vec<Line> = match state.mode {
        Mode::Review => vec![
            Line::from(" Space / Enter   flip the card"),
            Line::from(" l / Right       knew it"),
            Line::from(" h / Left        missed it"),
            Line::from(" drag the card   swipe left or right"),
            Line::from(" r               restart round"),
            Line::from(" e               edit cards"),
            Line::from(" a               add a card"),
            Line::from(" q               quit"),
        ],
        _ => vec![
            Line::from(" j / k           move selection"),
            Line::from(" a / n           add a card"),
            Line::from(" d               delete selected card"),
            Line::from(" Esc / e         back to review"),
            Line::from(" q               quit"),
        ],
    };

    let popup = centered(area, 44, lines.len() as u16 + 2);
    let block = Block::default()
        .title(" Help (? to close) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Rect of at most `width` x `height` centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

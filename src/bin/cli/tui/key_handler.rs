use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use super::app_state::{Mode, TuiState};
use memocards_lib::Outcome;

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    match state.mode {
        Mode::Review => handle_review_key(state, key),
        Mode::Editor => handle_editor_key(state, key),
        Mode::AddPrompt | Mode::AddAnswer => handle_input_key(state, key),
    }
}

fn handle_review_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Char(' ') | KeyCode::Enter => {
            state.app.session.toggle_reveal();
        }
        KeyCode::Char('l') | KeyCode::Right => state.resolve(Outcome::Correct),
        KeyCode::Char('h') | KeyCode::Left => state.resolve(Outcome::Incorrect),
        KeyCode::Char('r') => state.start_round(),
        KeyCode::Char('e') => state.open_editor(),
        KeyCode::Char('a') => {
            state.open_editor();
            state.begin_add();
        }
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

fn handle_editor_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => state.quit = true,
        KeyCode::Esc | KeyCode::Char('e') => state.close_editor(),
        KeyCode::Char('j') | KeyCode::Down => state.editor_move_down(),
        KeyCode::Char('k') | KeyCode::Up => state.editor_move_up(),
        KeyCode::Char('a') | KeyCode::Char('n') => state.begin_add(),
        KeyCode::Char('d') | KeyCode::Delete => state.delete_selected(),
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
        }
        _ => {}
    }
}

fn handle_input_key(state: &mut TuiState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.cancel_add(),
        KeyCode::Enter => state.submit_input(),
        KeyCode::Backspace => {
            state.input_text.pop();
        }
        KeyCode::Char(c) => {
            state.input_text.push(c);
        }
        _ => {}
    }
}

pub fn handle_mouse(state: &mut TuiState, mouse: MouseEvent) {
    if state.mode != Mode::Review {
        match mouse.kind {
            MouseEventKind::ScrollDown => state.editor_move_down(),
            MouseEventKind::ScrollUp => state.editor_move_up(),
            _ => {}
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // Only the card itself can be dragged
            if let Some(ref area) = state.card_area {
                if mouse.column >= area.x
                    && mouse.column < area.x + area.width
                    && mouse.row >= area.y
                    && mouse.row < area.y + area.height
                {
                    state.drag_start = Some(mouse.column);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.finish_drag(mouse.column);
        }
        _ => {}
    }
}

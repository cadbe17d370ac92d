use std::time::Instant;

use anyhow::Result;
use ratatui::prelude::Rect;
use uuid::Uuid;

use crate::app::App;
use memocards_lib::review::TickClock;
use memocards_lib::{Card, Outcome, RoundState};

/// Horizontal drag points per terminal column, so a swipe of a dozen
/// columns clears the threshold
pub const DRAG_POINTS_PER_COLUMN: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Review,
    Editor,
    AddPrompt,
    AddAnswer,
}

pub struct TuiState {
    pub app: App,
    pub clock: TickClock,
    pub mode: Mode,

    // Editor state
    pub cards: Vec<Card>,
    pub editor_selected: usize,

    // Input mode state (AddPrompt / AddAnswer)
    pub input_text: String,
    pub pending_prompt: String,

    // Mouse swipe state
    pub card_area: Option<Rect>,
    pub drag_start: Option<u16>,

    pub flash_message: Option<String>,
    pub show_help: bool,
    pub quit: bool,
}

impl TuiState {
    pub fn new(app: App) -> Result<Self> {
        let clock = TickClock::new(app.config.tick_interval());
        let mut state = Self {
            app,
            clock,
            mode: Mode::Review,
            cards: Vec::new(),
            editor_selected: 0,
            input_text: String::new(),
            pending_prompt: String::new(),
            card_area: None,
            drag_start: None,
            flash_message: None,
            show_help: false,
            quit: false,
        };

        state.start_round();
        Ok(state)
    }

    /// Feed elapsed ticks into the round
    pub fn advance_clock(&mut self, now: Instant) {
        for _ in 0..self.clock.poll(now) {
            if self.app.session.tick() != RoundState::Running {
                break;
            }
        }
    }

    pub fn start_round(&mut self) {
        if let Err(e) = self.app.session.start() {
            self.flash_message = Some(format!("Cards not saved: {}", e));
        }
        self.clock.start(Instant::now());
    }

    pub fn background(&mut self) {
        self.app.session.background();
        self.clock.pause();
    }

    pub fn foreground(&mut self) {
        self.app.session.foreground();
        self.clock.resume(Instant::now());
    }

    pub fn resolve(&mut self, outcome: Outcome) {
        match self.app.session.resolve_head(outcome) {
            Ok(Some(resolution)) if resolution.exhausted => {
                self.flash_message = Some("All cards done! Press r to start again".to_string());
            }
            Ok(_) => {}
            Err(e) => {
                self.flash_message = Some(format!("Cards not saved: {}", e));
            }
        }
    }

    /// Mouse released over the card: a long drag swipes, a click flips
    pub fn finish_drag(&mut self, column: u16) {
        let Some(start) = self.drag_start.take() else {
            return;
        };

        let dx = (f64::from(column) - f64::from(start)) * DRAG_POINTS_PER_COLUMN;
        match Outcome::from_drag(dx) {
            Some(outcome) => self.resolve(outcome),
            None if column == start => {
                self.app.session.toggle_reveal();
            }
            None => {}
        }
    }

    // ===== Editor =====

    pub fn open_editor(&mut self) {
        self.mode = Mode::Editor;
        self.reload_cards();
    }

    /// Leaving the editor starts a fresh round with the edited cards
    pub fn close_editor(&mut self) {
        self.mode = Mode::Review;
        self.start_round();
    }

    pub fn reload_cards(&mut self) {
        match self.app.session.list_cards() {
            Ok(cards) => self.cards = cards,
            Err(e) => self.flash_message = Some(format!("Failed to list cards: {}", e)),
        }
        if self.editor_selected >= self.cards.len() {
            self.editor_selected = self.cards.len().saturating_sub(1);
        }
    }

    pub fn editor_move_down(&mut self) {
        if !self.cards.is_empty() && self.editor_selected < self.cards.len() - 1 {
            self.editor_selected += 1;
        }
    }

    pub fn editor_move_up(&mut self) {
        self.editor_selected = self.editor_selected.saturating_sub(1);
    }

    pub fn selected_card_id(&self) -> Option<Uuid> {
        self.cards.get(self.editor_selected).map(|c| c.id)
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_card_id() else {
            return;
        };
        if let Err(e) = self.app.session.remove_card(id) {
            self.flash_message = Some(format!("Cards not saved: {}", e));
        }
        self.reload_cards();
    }

    pub fn begin_add(&mut self) {
        self.mode = Mode::AddPrompt;
        self.input_text.clear();
        self.pending_prompt.clear();
    }

    pub fn cancel_add(&mut self) {
        self.input_text.clear();
        self.pending_prompt.clear();
        self.mode = Mode::Editor;
    }

    /// Enter pressed in one of the add fields
    pub fn submit_input(&mut self) {
        match self.mode {
            Mode::AddPrompt => {
                self.pending_prompt = std::mem::take(&mut self.input_text);
                self.mode = Mode::AddAnswer;
            }
            Mode::AddAnswer => {
                let answer = std::mem::take(&mut self.input_text);
                let prompt = std::mem::take(&mut self.pending_prompt);
                match self.app.session.add_card(&prompt, &answer) {
                    Ok(Some(card)) => {
                        self.flash_message = Some(format!("Added \"{}\"", card.prompt));
                        self.editor_selected = 0;
                    }
                    Ok(None) => {
                        self.flash_message =
                            Some("Prompt and answer must not be empty".to_string());
                    }
                    Err(e) => {
                        self.flash_message = Some(format!("Cards not saved: {}", e));
                    }
                }
                self.mode = Mode::Editor;
                self.reload_cards();
            }
            _ => {}
        }
    }

    /// Save anything a failed save left behind before exiting
    pub fn shutdown(&mut self) {
        if !self.app.session.is_durable() {
            if let Err(e) = self.app.session.flush() {
                log::error!("Failed to save cards on exit: {}", e);
            }
        }
    }
}

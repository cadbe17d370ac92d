//! Entry point for the presentation layer
//!
//! A `Session` wires the stack manager, the round controller and the
//! editor together and exposes them as the events a front end produces:
//! ticks, swipes, taps, focus changes and edits.

use tokio::sync::watch;
use uuid::Uuid;

use super::editor::Editor;
use super::round::{RoundController, RoundState};
use super::stack::{Resolution, StackManager, StackSnapshot};
use crate::cards::storage::Result;
use crate::cards::{Card, CardStore, Outcome};
use crate::config::Config;

pub struct Session<S: CardStore> {
    stack: StackManager<S>,
    round: RoundController,
    /// Head card whose answer is showing
    revealed: Option<Uuid>,
}

impl<S: CardStore> Session<S> {
    pub fn new(store: S, config: &Config) -> Result<Self> {
        let stack = StackManager::new(store)?;
        let round = RoundController::new(config.round_duration, stack.subscribe());
        Ok(Self {
            stack,
            round,
            revealed: None,
        })
    }

    /// First presentation: begins a fresh round
    pub fn start(&mut self) -> Result<()> {
        self.reset()
    }

    /// Reactivate every card and restart the countdown
    pub fn reset(&mut self) -> Result<()> {
        self.revealed = None;
        self.round.reset(&mut self.stack)?;
        Ok(())
    }

    pub fn tick(&mut self) -> RoundState {
        self.round.tick()
    }

    pub fn background(&mut self) -> RoundState {
        self.round.background()
    }

    pub fn foreground(&mut self) -> RoundState {
        self.round.foreground()
    }

    /// Resolve the card at `index`. Ignored while the round is not taking
    /// input (paused, ended or out of time).
    pub fn resolve(&mut self, index: usize, outcome: Outcome) -> Result<Option<Resolution>> {
        if !self.round.accepts_input() {
            log::debug!("Ignoring {:?}: round is {:?}", outcome, self.round.state());
            return Ok(None);
        }

        let resolution = self.stack.resolve(index, outcome);
        // A failed save still moved the card in memory
        if !matches!(resolution, Ok(None)) {
            self.revealed = None;
        }
        self.round.evaluate();
        resolution
    }

    pub fn resolve_head(&mut self, outcome: Outcome) -> Result<Option<Resolution>> {
        self.resolve(0, outcome)
    }

    /// Show or hide the head card's answer. Never touches the store.
    pub fn toggle_reveal(&mut self) -> bool {
        let head = self.stack.head().map(|c| c.id);
        self.revealed = match (self.is_revealed(), head) {
            (false, Some(id)) => Some(id),
            _ => None,
        };
        self.is_revealed()
    }

    /// Whether the current head's answer is showing
    pub fn is_revealed(&self) -> bool {
        match (self.revealed, self.stack.head()) {
            (Some(id), Some(head)) => head.id == id,
            _ => false,
        }
    }

    pub fn add_card(&mut self, prompt: &str, answer: &str) -> Result<Option<Card>> {
        let added = Editor::new(&mut self.stack).add(prompt, answer);
        self.revealed = None;
        self.round.evaluate();
        added
    }

    pub fn remove_card(&mut self, id: Uuid) -> Result<()> {
        let removed = Editor::new(&mut self.stack).remove(id);
        self.revealed = None;
        self.round.evaluate();
        removed
    }

    pub fn remove_cards(&mut self, ids: &[Uuid]) -> Result<usize> {
        let removed = Editor::new(&mut self.stack).remove_many(ids);
        self.revealed = None;
        self.round.evaluate();
        removed
    }

    /// Every card, for the edit screen
    pub fn list_cards(&self) -> Result<Vec<Card>> {
        self.stack.store().query_all()
    }

    /// Leaving the edit screen starts a new round with the edited deck
    pub fn finish_editing(&mut self) -> Result<()> {
        self.reset()
    }

    /// Try to save anything a failed save left behind
    pub fn flush(&mut self) -> Result<()> {
        self.stack.commit(|_| Ok(()))
    }

    /// False while some change exists only in memory
    pub fn is_durable(&self) -> bool {
        !self.stack.store().has_unsaved_changes()
    }

    pub fn head(&self) -> Option<Card> {
        self.stack.head()
    }

    pub fn current_stack(&self) -> Vec<Card> {
        self.stack.current_stack()
    }

    pub fn subscribe(&self) -> watch::Receiver<StackSnapshot> {
        self.stack.subscribe()
    }

    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    pub fn remaining(&self) -> u32 {
        self.round.remaining()
    }

    pub fn accepts_input(&self) -> bool {
        self.round.accepts_input()
    }

    pub fn store(&self) -> &S {
        self.stack.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{JsonFileStore, MemoryStore};
    use crate::review::round::EndReason;
    use tempfile::TempDir;

    fn config(round_duration: u32) -> Config {
        Config {
            round_duration,
            ..Config::default()
        }
    }

    fn session_with(prompts: &[&str]) -> Session<MemoryStore> {
        let mut session = Session::new(MemoryStore::new(), &config(100)).unwrap();
        // Added in reverse so the first prompt ends up on top
        for prompt in prompts.iter().rev() {
            session.add_card(prompt, "answer").unwrap();
        }
        session.start().unwrap();
        session
    }

    fn head_prompt(session: &Session<MemoryStore>) -> Option<String> {
        session.head().map(|c| c.prompt)
    }

    #[test]
    fn test_start_runs_round() {
        let session = session_with(&["a", "b"]);
        assert_eq!(session.round_state(), RoundState::Running);
        assert_eq!(session.remaining(), 100);
        assert_eq!(head_prompt(&session).as_deref(), Some("a"));
    }

    #[test]
    fn test_full_round_until_stack_is_empty() {
        let mut session = session_with(&["a", "b"]);

        session.resolve_head(Outcome::Incorrect).unwrap();
        assert_eq!(head_prompt(&session).as_deref(), Some("b"));
        session.resolve_head(Outcome::Correct).unwrap();
        assert_eq!(head_prompt(&session).as_deref(), Some("a"));

        let last = session.resolve_head(Outcome::Correct).unwrap().unwrap();
        assert!(last.exhausted);
        assert_eq!(session.round_state(), RoundState::Ended(EndReason::StackEmpty));

        session.reset().unwrap();
        assert_eq!(session.round_state(), RoundState::Running);
        assert_eq!(session.current_stack().len(), 2);
    }

    #[test]
    fn test_no_input_after_timeout() {
        let mut session = Session::new(MemoryStore::new(), &config(1)).unwrap();
        session.add_card("q", "a").unwrap();
        session.start().unwrap();

        assert_eq!(session.tick(), RoundState::Ended(EndReason::Timeout));
        assert!(session.resolve_head(Outcome::Correct).unwrap().is_none());
        assert!(session.head().unwrap().active);
    }

    #[test]
    fn test_no_input_while_backgrounded() {
        let mut session = session_with(&["a"]);
        session.background();

        assert!(session.resolve_head(Outcome::Correct).unwrap().is_none());
        assert_eq!(session.foreground(), RoundState::Running);
        assert!(session.resolve_head(Outcome::Correct).unwrap().is_some());
    }

    #[test]
    fn test_reveal_follows_head() {
        let mut session = session_with(&["a", "b"]);
        assert!(!session.is_revealed());

        assert!(session.toggle_reveal());
        assert!(session.is_revealed());
        assert!(!session.toggle_reveal());
        assert!(session.toggle_reveal());

        session.resolve_head(Outcome::Incorrect).unwrap();
        assert!(!session.is_revealed());
        assert!(!session.store().has_unsaved_changes());
    }

    #[test]
    fn test_reveal_hidden_when_single_card_comes_back() {
        let mut session = session_with(&["only"]);
        assert!(session.toggle_reveal());

        session.resolve_head(Outcome::Incorrect).unwrap();
        assert_eq!(head_prompt(&session).as_deref(), Some("only"));
        assert!(!session.is_revealed());
    }

    #[test]
    fn test_reveal_hidden_after_full_cycle() {
        let mut session = session_with(&["a", "b"]);
        assert!(session.toggle_reveal());

        session.resolve_head(Outcome::Incorrect).unwrap();
        session.resolve_head(Outcome::Incorrect).unwrap();
        assert_eq!(head_prompt(&session).as_deref(), Some("a"));
        assert!(!session.is_revealed());
    }

    #[test]
    fn test_reveal_cleared_by_edits() {
        let mut session = session_with(&["a", "b"]);
        session.toggle_reveal();
        session.add_card("c", "answer").unwrap();
        assert!(!session.is_revealed());

        session.toggle_reveal();
        let b = session.list_cards().unwrap().into_iter().find(|c| c.prompt == "b").unwrap();
        session.remove_card(b.id).unwrap();
        assert!(!session.is_revealed());
    }

    #[test]
    fn test_ignored_resolve_keeps_reveal() {
        let mut session = session_with(&["a", "b"]);
        session.toggle_reveal();

        assert!(session.resolve(1, Outcome::Correct).unwrap().is_none());
        assert!(session.is_revealed());
    }

    #[test]
    fn test_reveal_does_not_touch_store() {
        let mut session = session_with(&["a"]);
        let mut rx = session.subscribe();

        session.toggle_reveal();
        session.toggle_reveal();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_reveal_with_empty_stack() {
        let mut session = session_with(&[]);
        assert!(!session.toggle_reveal());
    }

    #[test]
    fn test_removing_last_card_ends_round() {
        let mut session = session_with(&["only"]);
        let id = session.head().unwrap().id;

        session.remove_card(id).unwrap();
        assert_eq!(session.round_state(), RoundState::Ended(EndReason::StackEmpty));
        assert!(session.list_cards().unwrap().is_empty());
    }

    #[test]
    fn test_finish_editing_restarts_round() {
        let mut session = session_with(&["a", "b"]);
        session.resolve_head(Outcome::Correct).unwrap();
        session.tick();

        session.add_card("c", "answer").unwrap();
        session.finish_editing().unwrap();

        assert_eq!(session.remaining(), 100);
        assert_eq!(session.current_stack().len(), 3);
        assert_eq!(head_prompt(&session).as_deref(), Some("c"));
    }

    #[test]
    fn test_remove_cards_in_bulk() {
        let mut session = session_with(&["a", "b", "c"]);
        let ids: Vec<Uuid> = session.list_cards().unwrap().iter().take(2).map(|c| c.id).collect();

        assert_eq!(session.remove_cards(&ids).unwrap(), 2);
        assert_eq!(session.list_cards().unwrap().len(), 1);
    }

    #[test]
    fn test_durability_flag_and_flush() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("cards");
        let store = JsonFileStore::open(data_dir.clone()).unwrap();
        let mut session = Session::new(store, &config(100)).unwrap();
        session.add_card("q", "a").unwrap();
        session.start().unwrap();
        assert!(session.is_durable());

        std::fs::remove_dir_all(&data_dir).unwrap();
        assert!(session.resolve_head(Outcome::Correct).is_err());
        assert!(!session.is_durable());
        assert_eq!(session.round_state(), RoundState::Ended(EndReason::StackEmpty));

        std::fs::create_dir_all(&data_dir).unwrap();
        session.flush().unwrap();
        assert!(session.is_durable());

        let reopened = JsonFileStore::open(data_dir).unwrap();
        assert!(reopened.query_active_ordered().unwrap().is_empty());
        assert_eq!(reopened.query_all().unwrap().len(), 1);
    }
}

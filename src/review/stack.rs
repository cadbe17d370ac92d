//! The active card stack
//!
//! `StackManager` owns the card store and is the only path through which
//! the store is mutated. Every committed mutation is followed by a fresh
//! `query_active_ordered()` that is published to subscribers over a
//! `watch` channel, so views and the round controller never poll.

use tokio::sync::watch;

use crate::cards::storage::Result;
use crate::cards::{Card, CardStore, Outcome};

/// Ordered active cards as of the last commit
#[derive(Debug, Clone, Default)]
pub struct StackSnapshot {
    pub cards: Vec<Card>,
    /// Bumped on every publish
    pub revision: u64,
}

impl StackSnapshot {
    /// The only card that can be resolved
    pub fn head(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// What a successful `resolve` did
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The card as stored after the change
    pub card: Card,
    pub outcome: Outcome,
    /// No active cards are left
    pub exhausted: bool,
}

pub struct StackManager<S: CardStore> {
    store: S,
    snapshot_tx: watch::Sender<StackSnapshot>,
}

impl<S: CardStore> StackManager<S> {
    pub fn new(store: S) -> Result<Self> {
        let cards = store.query_active_ordered()?;
        let (snapshot_tx, _) = watch::channel(StackSnapshot { cards, revision: 0 });
        Ok(Self { store, snapshot_tx })
    }

    /// Receive a new snapshot after every committed mutation
    pub fn subscribe(&self) -> watch::Receiver<StackSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> StackSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn current_stack(&self) -> Vec<Card> {
        self.snapshot_tx.borrow().cards.clone()
    }

    pub fn head(&self) -> Option<Card> {
        self.snapshot_tx.borrow().head().cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot_tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot_tx.borrow().is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolve the card at `index` of the current stack.
    ///
    /// Returns `Ok(None)` without touching the store when `index` is out of
    /// range or is not the head. A save failure is returned as an error
    /// after the in-memory change and the new snapshot are in place.
    pub fn resolve(&mut self, index: usize, outcome: Outcome) -> Result<Option<Resolution>> {
        let stack = self.current_stack();

        let Some(card) = stack.get(index) else {
            log::debug!("Ignoring resolve at {} (stack has {} cards)", index, stack.len());
            return Ok(None);
        };
        if index != 0 {
            log::debug!("Ignoring resolve at {}: only the head card is interactive", index);
            return Ok(None);
        }

        let mut card = card.clone();
        if outcome == Outcome::Correct {
            card.active = false;
        }
        card.touch();

        self.commit(|store| {
            if outcome == Outcome::Incorrect {
                card.order = match bottom_order(&stack) {
                    Some(order) => order,
                    None => {
                        // Renumbered orders are 0..len
                        renumber(store)?;
                        store.query_all()?.len() as i64
                    }
                };
            }
            store.update(&card)
        })?;

        let exhausted = self.is_empty();
        log::debug!(
            "Resolved card {} as {:?} ({} cards left)",
            card.id,
            outcome,
            self.len()
        );
        Ok(Some(Resolution {
            card,
            outcome,
            exhausted,
        }))
    }

    /// Re-query the store and publish the result
    pub fn refresh(&mut self) -> Result<()> {
        let cards = self.store.query_active_ordered()?;
        self.snapshot_tx.send_modify(|snapshot| {
            snapshot.cards = cards;
            snapshot.revision += 1;
        });
        Ok(())
    }

    /// Apply a mutation, save, and publish.
    ///
    /// The snapshot is republished even when the mutation or the save
    /// fails, so observers always see the in-memory state.
    pub(crate) fn commit<T>(&mut self, mutate: impl FnOnce(&mut S) -> Result<T>) -> Result<T> {
        let value = match mutate(&mut self.store) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Card update failed: {}", e);
                if let Err(refresh_err) = self.refresh() {
                    log::warn!("Failed to refresh card stack: {}", refresh_err);
                }
                return Err(e);
            }
        };

        let saved = self.store.save();
        self.refresh()?;

        if let Err(e) = saved {
            log::error!("Failed to save cards, changes are not durable: {}", e);
            return Err(e);
        }
        Ok(value)
    }
}

/// Order that places a card behind every card in `stack`, or `None`
/// when the largest order is already `i64::MAX`
fn bottom_order(stack: &[Card]) -> Option<i64> {
    match stack.iter().map(|c| c.order).max() {
        Some(max) => max.checked_add(1),
        None => Some(0),
    }
}

/// Rewrite every card's order as 0, 1, 2, ... keeping stack order
pub(crate) fn renumber<S: CardStore>(store: &mut S) -> Result<()> {
    let cards = store.query_all()?;
    log::warn!("Card order out of range, renumbering {} cards", cards.len());

    for (order, mut card) in (0_i64..).zip(cards) {
        if card.order != order {
            card.order = order;
            store.update(&card)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{JsonFileStore, MemoryStore};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn card(prompt: &str, order: i64) -> Card {
        Card::new(prompt.to_string(), format!("{} answer", prompt), order)
    }

    fn manager(cards: Vec<Card>) -> StackManager<MemoryStore> {
        StackManager::new(MemoryStore::from_cards(cards)).unwrap()
    }

    fn prompts(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.prompt.as_str()).collect()
    }

    #[test]
    fn test_incorrect_moves_head_to_bottom() {
        let x = card("X", 0);
        let y = card("Y", 1);
        let mut stack = manager(vec![x.clone(), y.clone()]);

        let resolution = stack.resolve(0, Outcome::Incorrect).unwrap().unwrap();
        assert_eq!(resolution.card, x);
        assert!(!resolution.exhausted);

        let current = stack.store().query_active_ordered().unwrap();
        assert_eq!(prompts(&current), vec!["Y", "X"]);
        assert_eq!(prompts(&stack.current_stack()), vec!["Y", "X"]);

        let stored_x = stack.store().get(x.id).unwrap().unwrap();
        assert!(stored_x.active);
        assert!(current.iter().filter(|c| c.id != x.id).all(|c| c.order < stored_x.order));
    }

    #[test]
    fn test_incorrect_card_comes_back_later_in_round() {
        let mut stack = manager(vec![card("A", 0), card("B", 1), card("C", 2)]);

        stack.resolve(0, Outcome::Incorrect).unwrap();
        stack.resolve(0, Outcome::Correct).unwrap();
        stack.resolve(0, Outcome::Correct).unwrap();

        assert_eq!(prompts(&stack.current_stack()), vec!["A"]);
    }

    #[test]
    fn test_incorrect_renumbers_when_order_runs_out() {
        let mut stack = manager(vec![card("A", 5), card("B", i64::MAX), card("C", -3)]);
        stack.resolve(0, Outcome::Correct).unwrap();

        stack.resolve(0, Outcome::Incorrect).unwrap();
        assert_eq!(prompts(&stack.current_stack()), vec!["B", "A"]);

        let orders: Vec<i64> = stack.current_stack().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![2, 3]);
    }

    #[test]
    fn test_correct_deactivates_card() {
        let a = card("A", 0);
        let mut stack = manager(vec![a.clone(), card("B", 1)]);

        let resolution = stack.resolve(0, Outcome::Correct).unwrap().unwrap();
        assert!(!resolution.card.active);

        let active = stack.store().query_active_ordered().unwrap();
        assert!(!active.contains(&a));
        assert!(!stack.store().get(a.id).unwrap().unwrap().active);
        assert_eq!(prompts(&stack.current_stack()), vec!["B"]);
    }

    #[test]
    fn test_last_correct_exhausts_stack() {
        let mut stack = manager(vec![card("Z", 0)]);

        let resolution = stack.resolve(0, Outcome::Correct).unwrap().unwrap();
        assert!(resolution.exhausted);
        assert!(stack.store().query_active_ordered().unwrap().is_empty());
        assert!(stack.head().is_none());
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let a = card("A", 0);
        let mut stack = manager(vec![a.clone()]);
        let before = stack.snapshot().revision;

        assert!(stack.resolve(1, Outcome::Correct).unwrap().is_none());
        assert!(stack.resolve(usize::MAX, Outcome::Incorrect).unwrap().is_none());

        let stored = stack.store().get(a.id).unwrap().unwrap();
        assert!(stored.active);
        assert_eq!(stored.order, 0);
        assert!(!stack.store().has_unsaved_changes());
        assert_eq!(stack.snapshot().revision, before);
    }

    #[test]
    fn test_non_head_is_rejected() {
        let b = card("B", 1);
        let mut stack = manager(vec![card("A", 0), b.clone()]);

        assert!(stack.resolve(1, Outcome::Correct).unwrap().is_none());
        assert!(stack.store().get(b.id).unwrap().unwrap().active);
        assert_eq!(prompts(&stack.current_stack()), vec!["A", "B"]);
    }

    #[test]
    fn test_resolve_on_empty_stack_is_ignored() {
        let mut stack = manager(Vec::new());
        assert!(stack.resolve(0, Outcome::Correct).unwrap().is_none());
    }

    #[test]
    fn test_ties_do_not_jitter() {
        let base = Utc::now();
        let mut first = card("first", 3);
        first.created_at = base;
        let mut second = card("second", 3);
        second.created_at = base + Duration::milliseconds(5);
        let mut stack = manager(vec![second, first]);

        stack.refresh().unwrap();
        let once = stack.current_stack();
        stack.refresh().unwrap();
        assert_eq!(prompts(&once), prompts(&stack.current_stack()));
        assert_eq!(prompts(&once), vec!["first", "second"]);
    }

    #[test]
    fn test_subscribers_see_each_commit() {
        let mut stack = manager(vec![card("A", 0), card("B", 1)]);
        let mut rx = stack.subscribe();
        assert!(!rx.has_changed().unwrap());

        stack.resolve(0, Outcome::Correct).unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(prompts(&snapshot.cards), vec!["B"]);
        assert_eq!(snapshot.revision, 1);
    }

    #[test]
    fn test_save_failure_is_reported_but_state_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("cards");
        let mut store = JsonFileStore::open(data_dir.clone()).unwrap();
        let a = card("A", 0);
        store.insert(a.clone()).unwrap();
        store.save().unwrap();

        let mut stack = StackManager::new(store).unwrap();
        std::fs::remove_dir_all(&data_dir).unwrap();

        assert!(stack.resolve(0, Outcome::Correct).is_err());
        assert!(stack.is_empty());
        assert!(!stack.store().get(a.id).unwrap().unwrap().active);
        assert!(stack.store().has_unsaved_changes());
    }
}

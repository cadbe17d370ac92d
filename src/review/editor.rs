//! Adding and removing cards, independent of round state

use uuid::Uuid;

use super::stack::{renumber, StackManager};
use crate::cards::storage::Result;
use crate::cards::{Card, CardStore};

/// Edits the whole card collection through the stack manager's commit
/// path, so the active stack is republished after every change.
pub struct Editor<'a, S: CardStore> {
    stack: &'a mut StackManager<S>,
}

impl<'a, S: CardStore> Editor<'a, S> {
    pub fn new(stack: &'a mut StackManager<S>) -> Self {
        Self { stack }
    }

    /// Every card, active or not, in stack order
    pub fn list(&self) -> Result<Vec<Card>> {
        self.stack.store().query_all()
    }

    /// Add a card on top of the whole collection.
    ///
    /// Both fields are trimmed; if either ends up empty nothing is stored
    /// and `Ok(None)` is returned.
    pub fn add(&mut self, prompt: &str, answer: &str) -> Result<Option<Card>> {
        let prompt = prompt.trim();
        let answer = answer.trim();
        if prompt.is_empty() || answer.is_empty() {
            log::debug!("Ignoring card with empty prompt or answer");
            return Ok(None);
        }

        let mut card = Card::new(prompt.to_string(), answer.to_string(), 0);
        self.stack.commit(|store| {
            card.order = match top_order(&store.query_all()?) {
                Some(order) => order,
                None => {
                    renumber(store)?;
                    -1
                }
            };
            store.insert(card.clone())
        })?;

        log::info!("Added card {} at order {}", card.id, card.order);
        Ok(Some(card))
    }

    /// Delete a card; deleting an unknown id is a no-op
    pub fn remove(&mut self, id: Uuid) -> Result<()> {
        self.stack.commit(|store| store.delete(id))?;
        log::info!("Removed card {}", id);
        Ok(())
    }

    /// Delete several cards with a single save, returning how many existed
    pub fn remove_many(&mut self, ids: &[Uuid]) -> Result<usize> {
        let removed = self.stack.commit(|store| {
            let mut removed = 0;
            for &id in ids {
                if store.get(id)?.is_some() {
                    store.delete(id)?;
                    removed += 1;
                }
            }
            Ok(removed)
        })?;

        log::info!("Removed {} cards", removed);
        Ok(removed)
    }
}

/// Order that places a new card ahead of every existing card, or `None`
/// when the smallest order is already `i64::MIN`
fn top_order(cards: &[Card]) -> Option<i64> {
    match cards.iter().map(|c| c.order).min() {
        Some(min) => min.checked_sub(1),
        None => Some(-1),
    }
}

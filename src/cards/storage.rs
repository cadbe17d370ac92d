//! Storage operations for cards
//!
//! Directory structure:
//! ```text
//! {data-dir}/
//! ├── config.toml   # Optional settings
//! └── cards.json    # Array of all cards
//! ```
//!
//! Mutations are applied in memory and only reach the disk on `save()`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use super::models::Card;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(PathBuf),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Card already exists: {0}")]
    DuplicateCard(Uuid),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Persistence collaborator for the card collection.
///
/// Mutations may be buffered; `save()` commits everything pending and is
/// atomic from the caller's point of view.
pub trait CardStore {
    /// Add a new card
    fn insert(&mut self, card: Card) -> Result<()>;

    /// Replace the stored fields of an existing card
    fn update(&mut self, card: &Card) -> Result<()>;

    /// Remove a card by id. Removing an absent card is not an error.
    fn delete(&mut self, id: Uuid) -> Result<()>;

    fn get(&self, id: Uuid) -> Result<Option<Card>>;

    /// Every card, in stack order
    fn query_all(&self) -> Result<Vec<Card>>;

    /// Active cards only, in stack order
    fn query_active_ordered(&self) -> Result<Vec<Card>> {
        let mut cards = self.query_all()?;
        cards.retain(|c| c.active);
        Ok(cards)
    }

    /// Flush pending mutations
    fn save(&mut self) -> Result<()>;

    /// True while some mutation has not been committed by `save()`
    fn has_unsaved_changes(&self) -> bool;
}

/// Stack order: ascending `order`, then insertion time, then id
pub fn stack_order(a: &Card, b: &Card) -> Ordering {
    a.order
        .cmp(&b.order)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Volatile store, also the in-memory half of `JsonFileStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    cards: HashMap<Uuid, Card>,
    dirty: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-persisted cards; starts clean
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut map = HashMap::new();
        for card in cards {
            if let Some(previous) = map.insert(card.id, card) {
                log::warn!("Duplicate card {} in store, keeping the last copy", previous.id);
            }
        }
        Self {
            cards: map,
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardStore for MemoryStore {
    fn insert(&mut self, card: Card) -> Result<()> {
        if self.cards.contains_key(&card.id) {
            return Err(PersistenceError::DuplicateCard(card.id));
        }
        self.cards.insert(card.id, card);
        self.dirty = true;
        Ok(())
    }

    fn update(&mut self, card: &Card) -> Result<()> {
        let stored = self
            .cards
            .get_mut(&card.id)
            .ok_or(PersistenceError::CardNotFound(card.id))?;
        *stored = card.clone();
        self.dirty = true;
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        if self.cards.remove(&id).is_some() {
            self.dirty = true;
        }
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<Option<Card>> {
        Ok(self.cards.get(&id).cloned())
    }

    fn query_all(&self) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self.cards.values().cloned().collect();
        cards.sort_by(stack_order);
        Ok(cards)
    }

    fn save(&mut self) -> Result<()> {
        self.dirty = false;
        Ok(())
    }

    fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }
}

/// Store backed by a single `cards.json` file
#[derive(Debug)]
pub struct JsonFileStore {
    /// Data directory (e.g., ~/.local/share/memocards)
    data_dir: PathBuf,
    cards: MemoryStore,
}

impl JsonFileStore {
    /// Open the store in `data_dir`, creating the directory if needed
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;

        let cards_path = Self::cards_path_in(&data_dir);
        let cards = if cards_path.exists() {
            let content = fs::read_to_string(&cards_path)?;
            let cards: Vec<Card> = serde_json::from_str(&content)?;
            log::debug!("Loaded {} cards from {:?}", cards.len(), cards_path);
            MemoryStore::from_cards(cards)
        } else {
            MemoryStore::new()
        };

        Ok(Self { data_dir, cards })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the cards.json path
    pub fn cards_path(&self) -> PathBuf {
        Self::cards_path_in(&self.data_dir)
    }

    fn cards_path_in(data_dir: &Path) -> PathBuf {
        data_dir.join("cards.json")
    }

    fn ensure_available(&self) -> Result<()> {
        if self.data_dir.is_dir() {
            Ok(())
        } else {
            Err(PersistenceError::Unavailable(self.data_dir.clone()))
        }
    }
}

impl CardStore for JsonFileStore {
    fn insert(&mut self, card: Card) -> Result<()> {
        self.ensure_available()?;
        self.cards.insert(card)
    }

    fn update(&mut self, card: &Card) -> Result<()> {
        self.cards.update(card)
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        self.cards.delete(id)
    }

    fn get(&self, id: Uuid) -> Result<Option<Card>> {
        self.cards.get(id)
    }

    fn query_all(&self) -> Result<Vec<Card>> {
        self.cards.query_all()
    }

    fn save(&mut self) -> Result<()> {
        if !self.cards.has_unsaved_changes() {
            return Ok(());
        }
        self.ensure_available()?;

        let cards = self.cards.query_all()?;
        let content = serde_json::to_string_pretty(&cards)?;

        // Write then rename so a failed write never truncates cards.json
        let cards_path = self.cards_path();
        let tmp_path = cards_path.with_extension("json.tmp");
        let written =
            fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, &cards_path));
        if let Err(e) = written {
            if tmp_path.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp_path) {
                    log::warn!("Failed to remove {:?}: {}", tmp_path, cleanup);
                }
            }
            return Err(e.into());
        }

        self.cards.save()?;
        log::debug!("Saved {} cards to {:?}", cards.len(), cards_path);
        Ok(())
    }

    fn has_unsaved_changes(&self) -> bool {
        self.cards.has_unsaved_changes()
    }
}

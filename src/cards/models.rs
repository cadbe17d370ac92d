//! Data models for the card collection

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A flashcard with a prompt (front) and an answer (back).
///
/// Identity is the `id` alone: two values with the same id are the same
/// card even if their text or position differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub prompt: String,
    pub answer: String,
    /// Stack position; lower values are closer to the head
    #[serde(default)]
    pub order: i64,
    /// Whether the card takes part in the current round
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Card {
    pub fn new(prompt: String, answer: String, order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            prompt,
            answer,
            order,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Same card, regardless of content
    pub fn same_card(&self, other: &Card) -> bool {
        self.id == other.id
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.same_card(other)
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// How the user judged their answer to the head card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// Answered correctly; the card leaves the round
    Correct,
    /// Answered wrong; the card goes to the bottom of the stack
    Incorrect,
}

/// Horizontal drag distance a swipe must exceed to count
pub const SWIPE_THRESHOLD: f64 = 100.0;

impl Outcome {
    /// Map a finished horizontal drag to an outcome.
    ///
    /// Right swipes past the threshold are correct, left swipes are
    /// incorrect, and anything shorter snaps back (`None`).
    pub fn from_drag(dx: f64) -> Option<Self> {
        if dx > SWIPE_THRESHOLD {
            Some(Self::Correct)
        } else if dx < -SWIPE_THRESHOLD {
            Some(Self::Incorrect)
        } else {
            None
        }
    }
}

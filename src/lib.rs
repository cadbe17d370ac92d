//! MemoCards: timed flashcard review with a swipeable card stack.
//!
//! Cards live in a `CardStore`. A `StackManager` presents the active cards
//! in order and resolves swipes on the head card, a `RoundController`
//! runs the countdown, and an `Editor` adds and removes cards. Front ends
//! drive all of it through `review::Session`.

pub mod cards;
pub mod config;
pub mod review;

pub use cards::{Card, CardStore, JsonFileStore, MemoryStore, Outcome, PersistenceError};
pub use config::{Config, ConfigError};
pub use review::{EndReason, RoundState, Session};

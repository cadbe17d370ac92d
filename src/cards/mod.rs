//! Card collection for MemoCards
//!
//! This module provides:
//! - The `Card` record and swipe `Outcome`
//! - The `CardStore` persistence seam
//! - In-memory and JSON file implementations

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{CardStore, JsonFileStore, MemoryStore, PersistenceError};

//! Review rounds
//!
//! This module provides:
//! - The active card stack and swipe resolution (`stack`)
//! - The timed round lifecycle (`round`, `clock`)
//! - Card editing (`editor`)
//! - A `Session` facade for front ends

pub mod clock;
pub mod editor;
pub mod round;
pub mod session;
pub mod stack;

pub use clock::TickClock;
pub use editor::Editor;
pub use round::{EndReason, RoundController, RoundState};
pub use session::Session;
pub use stack::{Resolution, StackManager, StackSnapshot};

//! # Input Module
//!
//! The two virtual input sources competing with hardware for slot state:
//! - Keyboard: physical-key events mapped onto controls through a swappable
//!   [`keyboard::KeyboardMapping`]
//! - Pointer: gestures on on-screen stick/button/trigger affordances

pub mod keyboard;
pub mod pointer;

pub use keyboard::{KeyOutcome, KeyboardEngine, KeyboardMapping};
pub use pointer::{PointerEvent, SlotPointer};

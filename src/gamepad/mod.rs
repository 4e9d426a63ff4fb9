//! # Gamepad Module
//!
//! Canonical state for the two virtual gamepad slots.
//!
//! This module handles:
//! - The per-slot [`GamepadState`] record and its wire layout
//! - Partial updates ([`PadDelta`]) merged as shallow overwrites
//! - The two-slot [`PadStore`]
//! - Input-source precedence (hardware over keyboard and pointer)

pub mod precedence;
pub mod state;
pub mod store;

pub use precedence::Precedence;
pub use state::{
    ControlKind, ControlValue, GamepadState, PadButton, PadDelta, PadSlot, PadStick, PadTrigger,
    StateFrame,
};
pub use store::PadStore;

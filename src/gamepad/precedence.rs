//! # Input Precedence
//!
//! Decides, per slot, which input source is allowed to merge into the store.
//!
//! The rule: a hardware controller owns its slot outright. While a slot's
//! hardware-connected flag is set, keyboard and pointer events targeting that
//! slot are received but never merged. Keyboard input additionally requires
//! the global enable flag and only ever writes to the single keyboard target
//! slot. The checks run per event, never cached from engine start, so a
//! status change takes effect before the next event is processed.

use super::state::PadSlot;

/// Per-slot precedence state: hardware flags, keyboard enable and target.
#[derive(Debug, Clone)]
pub struct Precedence {
    hardware_connected: [bool; 2],
    keyboard_enabled: bool,
    keyboard_target: PadSlot,
}

impl Default for Precedence {
    fn default() -> Self {
        Self {
            hardware_connected: [false; 2],
            keyboard_enabled: false,
            keyboard_target: PadSlot::One,
        }
    }
}

impl Precedence {
    /// Creates the default precedence state: no hardware, keyboard disabled,
    /// keyboard targeting slot 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the externally-sourced hardware-connected flag for a slot.
    pub fn set_hardware_connected(&mut self, slot: PadSlot, connected: bool) {
        self.hardware_connected[slot.index()] = connected;
    }

    /// Whether a hardware controller currently owns the slot.
    #[must_use]
    pub fn hardware_connected(&self, slot: PadSlot) -> bool {
        self.hardware_connected[slot.index()]
    }

    /// Enables or disables keyboard-driven input globally.
    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        self.keyboard_enabled = enabled;
    }

    /// Whether keyboard-driven input is globally enabled.
    #[must_use]
    pub fn keyboard_enabled(&self) -> bool {
        self.keyboard_enabled
    }

    /// Selects which slot keyboard input writes to. There is exactly one
    /// target at a time.
    pub fn set_keyboard_target(&mut self, slot: PadSlot) {
        self.keyboard_target = slot;
    }

    /// The slot keyboard input currently writes to.
    #[must_use]
    pub fn keyboard_target(&self) -> PadSlot {
        self.keyboard_target
    }

    /// Whether pointer gestures on this slot's widgets may merge.
    #[must_use]
    pub fn pointer_allowed(&self, slot: PadSlot) -> bool {
        !self.hardware_connected(slot)
    }

    /// The slot a keyboard event may write to right now, if any.
    ///
    /// `None` when keyboard input is disabled or the target slot is owned by
    /// hardware.
    #[must_use]
    pub fn keyboard_slot(&self) -> Option<PadSlot> {
        if self.keyboard_enabled && !self.hardware_connected(self.keyboard_target) {
            Some(self.keyboard_target)
        } else {
            None
        }
    }
}

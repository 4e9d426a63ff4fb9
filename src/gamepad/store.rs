//! # Gamepad State Store
//!
//! Canonical mutable record of both slot states.
//!
//! The store is owned by the engine task, so every merge is naturally atomic
//! with respect to uplink ticks: a tick either sees none of a delta or all of
//! it, never a half-applied one. The store does not re-validate ranges;
//! callers clamp before merging.

use super::state::{GamepadState, PadDelta, PadSlot, StateFrame};

/// Owns the two [`GamepadState`] records.
///
/// # Examples
///
/// ```
/// use padlink::gamepad::{PadDelta, PadSlot, PadStore};
///
/// let mut store = PadStore::new();
///
/// let mut delta = PadDelta::new();
/// delta.a = Some(true);
/// store.merge(PadSlot::One, &delta);
///
/// assert!(store.get(PadSlot::One).a);
/// assert!(!store.get(PadSlot::Two).a);
/// ```
#[derive(Debug, Default)]
pub struct PadStore {
    slots: [GamepadState; 2],
}

impl PadStore {
    /// Creates a store with both slots neutral.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of one slot's current state.
    #[must_use]
    pub fn get(&self, slot: PadSlot) -> &GamepadState {
        &self.slots[slot.index()]
    }

    /// Applies a partial update to one slot as a shallow overwrite.
    pub fn merge(&mut self, slot: PadSlot, delta: &PadDelta) {
        self.slots[slot.index()].apply(delta);
    }

    /// Returns one slot to the all-neutral state in a single step.
    pub fn reset(&mut self, slot: PadSlot) {
        self.slots[slot.index()] = GamepadState::default();
    }

    /// Removes the optional touchpad field from one slot. Called when the
    /// active mapping stops defining a touchpad key.
    pub fn clear_touchpad(&mut self, slot: PadSlot) {
        self.slots[slot.index()].touchpad = None;
    }

    /// Snapshot of both slots, in the outbound frame layout.
    ///
    /// The uplink scheduler calls this on every tick, so it always observes
    /// the live state rather than anything captured at setup time.
    #[must_use]
    pub fn frame(&self) -> StateFrame {
        StateFrame {
            gamepad1: self.slots[0].clone(),
            gamepad2: self.slots[1].clone(),
        }
    }
}

//! # Pointer Input Engine
//!
//! Turns pointer gestures on the on-screen stick/button/trigger affordances
//! into state writes.
//!
//! ## Button Mechanism
//!
//! Every pressable control runs one reusable state machine:
//!
//! | State | pointer-down | pointer-up | pointer-leave | double-click |
//! |----------|----------------|-------------|---------------|--------------|
//! | Released | Held, active | - | - | Locked, active |
//! | Held | - | Released, inactive | Released, inactive | Locked, active |
//! | Locked | Released, inactive | - | - | Locked, active |
//!
//! Double-click locks the control active so it stays on without continuous
//! holding; the next single click unlocks it. Leaving the affordance while
//! locked does not unlock.
//!
//! ## Stick Mechanism
//!
//! Pointer-down begins a drag and positions the stick from the pointer's
//! offset to the affordance center, normalized by half the affordance's
//! extent. Offsets arrive in screen coordinates (y grows downward) and are
//! flipped to stick coordinates. The vector is clamped to the unit circle
//! (if its magnitude exceeds 1, both components are divided by the magnitude)
//! and a radial dead zone (default 0.1) collapses near-center positions to
//! exactly (0, 0). Pointer-up ends the drag without resetting the position;
//! double-click resets to (0, 0) regardless of drag state.
//!
//! ## Trigger Mechanism
//!
//! The continuous trigger pad is a linear 0–1 control positioned absolutely
//! by a one-dimensional drag; double-click resets it to zero.

use std::collections::HashMap;

use crate::gamepad::{ControlValue, PadButton, PadDelta, PadStick, PadTrigger};

/// Default radial dead zone for pointer-driven sticks.
pub const DEFAULT_STICK_DEADZONE: f64 = 0.1;

/// Clamps a raw stick vector to the unit circle and applies the radial dead
/// zone.
///
/// # Examples
///
/// ```
/// use padlink::input::pointer::clamp_stick_vector;
///
/// // Inside the dead zone collapses to exactly (0, 0)
/// assert_eq!(clamp_stick_vector(0.05, 0.05, 0.1), (0.0, 0.0));
///
/// // Outside the unit circle is scaled back onto it
/// let (x, y) = clamp_stick_vector(3.0, 4.0, 0.1);
/// assert!((x * x + y * y - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn clamp_stick_vector(x: f64, y: f64, deadzone: f64) -> (f64, f64) {
    let magnitude = (x * x + y * y).sqrt();
    if magnitude < deadzone {
        return (0.0, 0.0);
    }
    if magnitude > 1.0 {
        (x / magnitude, y / magnitude)
    } else {
        (x, y)
    }
}

/// Phase of a pressable control's gesture machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonPhase {
    #[default]
    Released,
    Held,
    Locked,
}

/// Press/hold/lock state machine shared by all pressable controls,
/// including the button nested in each stick affordance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonGesture {
    phase: ButtonPhase,
}

impl ButtonGesture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, mainly for presentation (a locked control renders
    /// differently from a held one).
    #[must_use]
    pub fn phase(&self) -> ButtonPhase {
        self.phase
    }

    /// Pointer-down: press, or unlock a locked control.
    ///
    /// Returns the new active value to write, or `None` when nothing
    /// changes.
    pub fn pointer_down(&mut self) -> Option<bool> {
        match self.phase {
            ButtonPhase::Released => {
                self.phase = ButtonPhase::Held;
                Some(true)
            }
            ButtonPhase::Locked => {
                self.phase = ButtonPhase::Released;
                Some(false)
            }
            ButtonPhase::Held => None,
        }
    }

    /// Pointer-up: release a held control. Locked controls stay active.
    pub fn pointer_up(&mut self) -> Option<bool> {
        match self.phase {
            ButtonPhase::Held => {
                self.phase = ButtonPhase::Released;
                Some(false)
            }
            ButtonPhase::Released | ButtonPhase::Locked => None,
        }
    }

    /// Pointer leaving the affordance mid-hold releases it; a locked
    /// control is unaffected.
    pub fn pointer_leave(&mut self) -> Option<bool> {
        match self.phase {
            ButtonPhase::Held => {
                self.phase = ButtonPhase::Released;
                Some(false)
            }
            ButtonPhase::Released | ButtonPhase::Locked => None,
        }
    }

    /// Double-click: lock the control active until a later single click.
    pub fn double_click(&mut self) -> Option<bool> {
        self.phase = ButtonPhase::Locked;
        Some(true)
    }

    /// Drops any held or locked state without emitting a write.
    pub fn reset(&mut self) {
        self.phase = ButtonPhase::Released;
    }
}

/// Drag state for one stick affordance.
#[derive(Debug, Clone, Copy, Default)]
pub struct StickGesture {
    dragging: bool,
}

impl StickGesture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Pointer-down begins a drag; the down position is the first sample.
    pub fn pointer_down(
        &mut self,
        dx: f64,
        dy: f64,
        half_extent: f64,
        deadzone: f64,
    ) -> Option<(f64, f64)> {
        self.dragging = true;
        Some(Self::position(dx, dy, half_extent, deadzone))
    }

    /// Pointer-move recomputes the position while dragging; moves outside a
    /// drag are ignored.
    pub fn pointer_move(
        &mut self,
        dx: f64,
        dy: f64,
        half_extent: f64,
        deadzone: f64,
    ) -> Option<(f64, f64)> {
        if !self.dragging {
            return None;
        }
        Some(Self::position(dx, dy, half_extent, deadzone))
    }

    /// Pointer-up (or leave) ends the drag; the stick keeps its position.
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Double-click recenters the stick regardless of drag state.
    pub fn double_click(&mut self) -> (f64, f64) {
        self.dragging = false;
        (0.0, 0.0)
    }

    /// Drops any drag state without emitting a write.
    pub fn reset(&mut self) {
        self.dragging = false;
    }

    /// Screen-space offset from the affordance center to a stick vector:
    /// normalize by half the extent, flip y, clamp to the unit circle,
    /// apply the dead zone. Gestures outside the affordance bounds clamp,
    /// never reject.
    fn position(dx: f64, dy: f64, half_extent: f64, deadzone: f64) -> (f64, f64) {
        let half_extent = half_extent.max(f64::EPSILON);
        let x = dx / half_extent;
        let y = -dy / half_extent;
        clamp_stick_vector(x, y, deadzone)
    }
}

/// Continuous trigger pad: absolute 0–1 positioning with double-click reset.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerSlider;

impl TriggerSlider {
    /// Absolute value from the 1-D drag position, clamped to [0, 1].
    #[must_use]
    pub fn drag_to(&self, value: f64) -> f64 {
        value.clamp(0.0, 1.0)
    }

    /// Double-interaction resets to zero.
    #[must_use]
    pub fn double_click(&self) -> f64 {
        0.0
    }
}

/// One pointer gesture aimed at a slot's widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Button {
        button: PadButton,
        action: ButtonAction,
    },
    Stick {
        stick: PadStick,
        action: StickAction,
    },
    Trigger {
        trigger: PadTrigger,
        action: TriggerAction,
    },
}

/// Pointer actions on a pressable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Down,
    Up,
    Leave,
    DoubleClick,
}

/// Pointer actions on a stick affordance. Offsets are screen-space deltas
/// from the affordance center; `half_extent` is half the affordance's
/// width/height in the same units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickAction {
    Down { dx: f64, dy: f64, half_extent: f64 },
    Move { dx: f64, dy: f64, half_extent: f64 },
    Up,
    Leave,
    DoubleClick,
}

/// Pointer actions on a continuous trigger pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerAction {
    Drag { value: f64 },
    DoubleClick,
}

/// Pointer gesture state for one slot's widgets.
///
/// Owns one [`ButtonGesture`] per pressable control (created on first
/// interaction) and one [`StickGesture`] per stick. All writes go through
/// [`PadDelta`]s carrying only the fields the gesture owns.
#[derive(Debug)]
pub struct SlotPointer {
    buttons: HashMap<PadButton, ButtonGesture>,
    sticks: [StickGesture; 2],
    trigger: TriggerSlider,
    deadzone: f64,
}

impl SlotPointer {
    /// Creates pointer state with the given stick dead-zone radius.
    #[must_use]
    pub fn new(deadzone: f64) -> Self {
        Self {
            buttons: HashMap::new(),
            sticks: [StickGesture::new(); 2],
            trigger: TriggerSlider,
            deadzone,
        }
    }

    fn stick_mut(&mut self, stick: PadStick) -> &mut StickGesture {
        match stick {
            PadStick::Left => &mut self.sticks[0],
            PadStick::Right => &mut self.sticks[1],
        }
    }

    /// Current phase of a pressable control, for presentation.
    #[must_use]
    pub fn button_phase(&self, button: PadButton) -> ButtonPhase {
        self.buttons
            .get(&button)
            .map_or(ButtonPhase::Released, ButtonGesture::phase)
    }

    /// Feeds one gesture through the owning state machine.
    ///
    /// Returns the resulting partial update; an empty delta means the
    /// gesture changed no value (for example pointer-up on a locked button).
    pub fn handle(&mut self, event: &PointerEvent) -> PadDelta {
        match *event {
            PointerEvent::Button { button, action } => {
                let gesture = self.buttons.entry(button).or_default();
                let active = match action {
                    ButtonAction::Down => gesture.pointer_down(),
                    ButtonAction::Up => gesture.pointer_up(),
                    ButtonAction::Leave => gesture.pointer_leave(),
                    ButtonAction::DoubleClick => gesture.double_click(),
                };
                match active {
                    Some(active) => PadDelta::button(
                        button,
                        ControlValue::active_for(button.kind(), active),
                    ),
                    None => PadDelta::new(),
                }
            }
            PointerEvent::Stick { stick, action } => {
                let deadzone = self.deadzone;
                let gesture = self.stick_mut(stick);
                let position = match action {
                    StickAction::Down {
                        dx,
                        dy,
                        half_extent,
                    } => gesture.pointer_down(dx, dy, half_extent, deadzone),
                    StickAction::Move {
                        dx,
                        dy,
                        half_extent,
                    } => gesture.pointer_move(dx, dy, half_extent, deadzone),
                    StickAction::Up | StickAction::Leave => {
                        gesture.pointer_up();
                        None
                    }
                    StickAction::DoubleClick => Some(gesture.double_click()),
                };
                match position {
                    Some((x, y)) => PadDelta::stick(stick, x, y),
                    None => PadDelta::new(),
                }
            }
            PointerEvent::Trigger { trigger, action } => {
                let value = match action {
                    TriggerAction::Drag { value } => self.trigger.drag_to(value),
                    TriggerAction::DoubleClick => self.trigger.double_click(),
                };
                PadDelta::trigger(trigger, value)
            }
        }
    }

    /// Returns every gesture machine to its initial state without emitting
    /// writes. Used when the slot is reset, so a locked button cannot
    /// resurrect its value against a neutral store.
    pub fn reset(&mut self) {
        self.buttons.clear();
        for stick in &mut self.sticks {
            stick.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer() -> SlotPointer {
        SlotPointer::new(DEFAULT_STICK_DEADZONE)
    }

    // ==================== ButtonGesture Tests ====================

    #[test]
    fn test_press_then_release_returns_to_inactive() {
        let mut gesture = ButtonGesture::new();

        assert_eq!(gesture.pointer_down(), Some(true));
        assert_eq!(gesture.phase(), ButtonPhase::Held);

        assert_eq!(gesture.pointer_up(), Some(false));
        assert_eq!(gesture.phase(), ButtonPhase::Released);
    }

    #[test]
    fn test_leave_while_held_releases() {
        let mut gesture = ButtonGesture::new();
        gesture.pointer_down();

        assert_eq!(gesture.pointer_leave(), Some(false));
        assert_eq!(gesture.phase(), ButtonPhase::Released);
    }

    #[test]
    fn test_double_click_locks() {
        let mut gesture = ButtonGesture::new();

        // Browser double-click arrives after two full click cycles
        gesture.pointer_down();
        gesture.pointer_up();
        gesture.pointer_down();
        gesture.pointer_up();
        assert_eq!(gesture.double_click(), Some(true));
        assert_eq!(gesture.phase(), ButtonPhase::Locked);
    }

    #[test]
    fn test_locked_survives_up_and_leave() {
        let mut gesture = ButtonGesture::new();
        gesture.double_click();

        assert_eq!(gesture.pointer_up(), None);
        assert_eq!(gesture.pointer_leave(), None);
        assert_eq!(gesture.phase(), ButtonPhase::Locked);
    }

    #[test]
    fn test_single_click_unlocks() {
        let mut gesture = ButtonGesture::new();
        gesture.double_click();

        // Down on a locked control unlocks and deactivates
        assert_eq!(gesture.pointer_down(), Some(false));
        assert_eq!(gesture.phase(), ButtonPhase::Released);
        // The matching up is a no-op
        assert_eq!(gesture.pointer_up(), None);
    }

    #[test]
    fn test_spurious_down_while_held_ignored() {
        let mut gesture = ButtonGesture::new();
        gesture.pointer_down();
        assert_eq!(gesture.pointer_down(), None);
    }

    #[test]
    fn test_up_without_down_ignored() {
        let mut gesture = ButtonGesture::new();
        assert_eq!(gesture.pointer_up(), None);
        assert_eq!(gesture.pointer_leave(), None);
    }

    // ==================== Stick Vector Tests ====================

    #[test]
    fn test_vector_inside_circle_passes_through() {
        let (x, y) = clamp_stick_vector(0.3, 0.4, 0.1);
        assert!((x - 0.3).abs() < 1e-12);
        assert!((y - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_vector_clamped_to_unit_circle_not_square() {
        // A corner drag: per-axis clamping would give (1, 1)
        let (x, y) = clamp_stick_vector(1.0, 1.0, 0.1);
        let magnitude = (x * x + y * y).sqrt();
        assert!((magnitude - 1.0).abs() < 1e-9);
        assert!((x - y).abs() < 1e-12);
        assert!(x < 1.0);
    }

    #[test]
    fn test_dead_zone_collapses_to_exact_zero() {
        assert_eq!(clamp_stick_vector(0.05, 0.05, 0.1), (0.0, 0.0));
        assert_eq!(clamp_stick_vector(-0.09, 0.0, 0.1), (0.0, 0.0));
        // At the boundary the value survives
        let (x, _) = clamp_stick_vector(0.1, 0.0, 0.1);
        assert_eq!(x, 0.1);
    }

    #[test]
    fn test_all_gesture_outputs_stay_on_unit_disk() {
        let offsets = [
            (0.0, 0.0),
            (0.5, -0.5),
            (2.0, 3.0),
            (-10.0, 0.0),
            (0.07, 0.07),
        ];
        for (dx, dy) in offsets {
            let mut pad = pointer();
            let delta = pad.handle(&PointerEvent::Stick {
                stick: PadStick::Left,
                action: StickAction::Down {
                    dx,
                    dy,
                    half_extent: 1.0,
                },
            });
            let x = delta.left_stick_x.unwrap();
            let y = delta.left_stick_y.unwrap();
            assert!(
                x * x + y * y <= 1.0 + 1e-9,
                "offset ({dx}, {dy}) escaped the unit disk"
            );
        }
    }

    // ==================== Stick Gesture Tests ====================

    #[test]
    fn test_stick_drag_normalizes_and_inverts_y() {
        let mut pad = pointer();

        // 48px affordance: pointer 12px right, 12px up of center
        let delta = pad.handle(&PointerEvent::Stick {
            stick: PadStick::Left,
            action: StickAction::Down {
                dx: 12.0,
                dy: -12.0,
                half_extent: 24.0,
            },
        });
        assert!((delta.left_stick_x.unwrap() - 0.5).abs() < 1e-9);
        assert!((delta.left_stick_y.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_stick_move_requires_drag() {
        let mut pad = pointer();

        let delta = pad.handle(&PointerEvent::Stick {
            stick: PadStick::Left,
            action: StickAction::Move {
                dx: 10.0,
                dy: 0.0,
                half_extent: 20.0,
            },
        });
        assert!(delta.is_empty());
    }

    #[test]
    fn test_stick_up_keeps_position() {
        let mut pad = pointer();

        pad.handle(&PointerEvent::Stick {
            stick: PadStick::Right,
            action: StickAction::Down {
                dx: 20.0,
                dy: 0.0,
                half_extent: 20.0,
            },
        });
        let delta = pad.handle(&PointerEvent::Stick {
            stick: PadStick::Right,
            action: StickAction::Up,
        });

        // No write on release: the stick stays deflected
        assert!(delta.is_empty());

        // And further moves are ignored until the next down
        let delta = pad.handle(&PointerEvent::Stick {
            stick: PadStick::Right,
            action: StickAction::Move {
                dx: 0.0,
                dy: 20.0,
                half_extent: 20.0,
            },
        });
        assert!(delta.is_empty());
    }

    #[test]
    fn test_stick_double_click_recenters() {
        let mut pad = pointer();

        pad.handle(&PointerEvent::Stick {
            stick: PadStick::Left,
            action: StickAction::Down {
                dx: 20.0,
                dy: 5.0,
                half_extent: 20.0,
            },
        });
        let delta = pad.handle(&PointerEvent::Stick {
            stick: PadStick::Left,
            action: StickAction::DoubleClick,
        });
        assert_eq!(delta.left_stick_x, Some(0.0));
        assert_eq!(delta.left_stick_y, Some(0.0));
    }

    #[test]
    fn test_stick_delta_only_touches_own_axes() {
        let mut pad = pointer();
        let delta = pad.handle(&PointerEvent::Stick {
            stick: PadStick::Left,
            action: StickAction::Down {
                dx: 20.0,
                dy: 0.0,
                half_extent: 20.0,
            },
        });
        assert!(delta.right_stick_x.is_none());
        assert!(delta.a.is_none());
        assert!(delta.left_trigger.is_none());
    }

    // ==================== Button-Through-Pointer Tests ====================

    #[test]
    fn test_double_click_locks_a_then_click_unlocks() {
        let mut pad = pointer();
        let a = |action| PointerEvent::Button {
            button: PadButton::A,
            action,
        };

        let delta = pad.handle(&a(ButtonAction::DoubleClick));
        assert_eq!(delta.a, Some(true));
        assert_eq!(pad.button_phase(PadButton::A), ButtonPhase::Locked);

        // Leaving the widget does not unlock
        let delta = pad.handle(&a(ButtonAction::Leave));
        assert!(delta.is_empty());

        // A plain click unlocks and deactivates
        let delta = pad.handle(&a(ButtonAction::Down));
        assert_eq!(delta.a, Some(false));
        let delta = pad.handle(&a(ButtonAction::Up));
        assert!(delta.is_empty());
    }

    #[test]
    fn test_trigger_press_writes_full_scale() {
        let mut pad = pointer();

        let delta = pad.handle(&PointerEvent::Button {
            button: PadButton::RightTrigger,
            action: ButtonAction::Down,
        });
        assert_eq!(delta.right_trigger, Some(1.0));

        let delta = pad.handle(&PointerEvent::Button {
            button: PadButton::RightTrigger,
            action: ButtonAction::Up,
        });
        assert_eq!(delta.right_trigger, Some(0.0));
    }

    #[test]
    fn test_stick_button_uses_same_machine() {
        let mut pad = pointer();

        let delta = pad.handle(&PointerEvent::Button {
            button: PadButton::LeftStickButton,
            action: ButtonAction::DoubleClick,
        });
        assert_eq!(delta.left_stick_button, Some(true));
        assert_eq!(
            pad.button_phase(PadButton::LeftStickButton),
            ButtonPhase::Locked
        );
    }

    #[test]
    fn test_independent_machines_per_control() {
        let mut pad = pointer();

        pad.handle(&PointerEvent::Button {
            button: PadButton::A,
            action: ButtonAction::DoubleClick,
        });
        let delta = pad.handle(&PointerEvent::Button {
            button: PadButton::B,
            action: ButtonAction::Down,
        });

        assert_eq!(delta.b, Some(true));
        assert_eq!(pad.button_phase(PadButton::A), ButtonPhase::Locked);
        assert_eq!(pad.button_phase(PadButton::B), ButtonPhase::Held);
    }

    // ==================== Trigger Slider Tests ====================

    #[test]
    fn test_trigger_drag_is_absolute_and_clamped() {
        let mut pad = pointer();

        let delta = pad.handle(&PointerEvent::Trigger {
            trigger: PadTrigger::Left,
            action: TriggerAction::Drag { value: 0.4 },
        });
        assert_eq!(delta.left_trigger, Some(0.4));

        // Absolute, not relative: a second drag replaces the value
        let delta = pad.handle(&PointerEvent::Trigger {
            trigger: PadTrigger::Left,
            action: TriggerAction::Drag { value: 0.2 },
        });
        assert_eq!(delta.left_trigger, Some(0.2));

        let delta = pad.handle(&PointerEvent::Trigger {
            trigger: PadTrigger::Left,
            action: TriggerAction::Drag { value: 1.7 },
        });
        assert_eq!(delta.left_trigger, Some(1.0));

        let delta = pad.handle(&PointerEvent::Trigger {
            trigger: PadTrigger::Left,
            action: TriggerAction::Drag { value: -0.3 },
        });
        assert_eq!(delta.left_trigger, Some(0.0));
    }

    #[test]
    fn test_trigger_double_click_resets() {
        let mut pad = pointer();

        pad.handle(&PointerEvent::Trigger {
            trigger: PadTrigger::Right,
            action: TriggerAction::Drag { value: 0.8 },
        });
        let delta = pad.handle(&PointerEvent::Trigger {
            trigger: PadTrigger::Right,
            action: TriggerAction::DoubleClick,
        });
        assert_eq!(delta.right_trigger, Some(0.0));
    }

    // ==================== Reset Tests ====================

    #[test]
    fn test_reset_clears_lock_and_drag_state() {
        let mut pad = pointer();

        pad.handle(&PointerEvent::Button {
            button: PadButton::A,
            action: ButtonAction::DoubleClick,
        });
        pad.handle(&PointerEvent::Stick {
            stick: PadStick::Left,
            action: StickAction::Down {
                dx: 20.0,
                dy: 0.0,
                half_extent: 20.0,
            },
        });

        pad.reset();
        assert_eq!(pad.button_phase(PadButton::A), ButtonPhase::Released);

        // After a reset the next click is a plain press, not an unlock
        let delta = pad.handle(&PointerEvent::Button {
            button: PadButton::A,
            action: ButtonAction::Down,
        });
        assert_eq!(delta.a, Some(true));

        // And stick moves need a fresh down
        let delta = pad.handle(&PointerEvent::Stick {
            stick: PadStick::Left,
            action: StickAction::Move {
                dx: 5.0,
                dy: 0.0,
                half_extent: 20.0,
            },
        });
        assert!(delta.is_empty());
    }
}

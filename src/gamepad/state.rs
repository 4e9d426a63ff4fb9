//! # Gamepad State Module
//!
//! Defines the canonical state record for one virtual gamepad slot and the
//! partial-update type used to mutate it.
//!
//! ## Wire Layout
//!
//! [`GamepadState`] serializes (snake_case) to the exact field layout the
//! robot side consumes:
//!
//! | Field | Type | Range |
//! |-------|------|-------|
//! | left_stick_x / left_stick_y | f64 | -1.0 to 1.0 |
//! | right_stick_x / right_stick_y | f64 | -1.0 to 1.0 |
//! | dpad_up / dpad_down / dpad_left / dpad_right | bool | |
//! | a / b / x / y | bool | |
//! | guide / start / back | bool | |
//! | left_bumper / right_bumper | bool | |
//! | left_stick_button / right_stick_button | bool | |
//! | left_trigger / right_trigger | f64 | 0.0 to 1.0 |
//! | touchpad | bool, optional | omitted unless mapped |
//!
//! ## Partial Updates
//!
//! Input engines never rewrite a whole slot. They produce a [`PadDelta`]
//! carrying only the fields they own, and the store applies it as a shallow
//! overwrite. Two deltas touching disjoint fields therefore commute.

use serde::{Deserialize, Serialize};

/// One of the two virtual gamepad slots tracked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadSlot {
    /// Gamepad 1.
    One,
    /// Gamepad 2.
    Two,
}

impl PadSlot {
    /// Both slots, in order. Handy for iteration.
    pub const ALL: [PadSlot; 2] = [PadSlot::One, PadSlot::Two];

    /// Zero-based index into per-slot arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            PadSlot::One => 0,
            PadSlot::Two => 1,
        }
    }

    /// The other slot.
    #[must_use]
    pub fn other(self) -> PadSlot {
        match self {
            PadSlot::One => PadSlot::Two,
            PadSlot::Two => PadSlot::One,
        }
    }
}

impl std::fmt::Display for PadSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PadSlot::One => write!(f, "gamepad1"),
            PadSlot::Two => write!(f, "gamepad2"),
        }
    }
}

/// Identifies a stick affordance on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadStick {
    /// Left stick (axes `left_stick_x` / `left_stick_y`).
    Left,
    /// Right stick (axes `right_stick_x` / `right_stick_y`).
    Right,
}

/// Identifies a continuous trigger affordance on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadTrigger {
    /// Left trigger (`left_trigger`).
    Left,
    /// Right trigger (`right_trigger`).
    Right,
}

/// Identifies a pressable control on a slot.
///
/// Triggers appear here as well: the on-screen trigger pad follows the same
/// press/hold/lock mechanism as plain buttons, writing 0.0/1.0 instead of
/// false/true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    A,
    B,
    X,
    Y,
    Guide,
    Start,
    Back,
    LeftBumper,
    RightBumper,
    LeftStickButton,
    RightStickButton,
    LeftTrigger,
    RightTrigger,
    Touchpad,
}

/// Whether a control carries a boolean or a 0.0–1.0 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Digital,
    Analog,
}

impl PadButton {
    /// The value representation this control uses on the wire.
    #[must_use]
    pub fn kind(self) -> ControlKind {
        match self {
            PadButton::LeftTrigger | PadButton::RightTrigger => ControlKind::Analog,
            _ => ControlKind::Digital,
        }
    }
}

/// A control value tagged with its representation.
///
/// Triggers are analog on the wire but are also driven by press/lock
/// gestures. Dispatching on the tag keeps "active" unambiguous: a digital
/// control is active when `true`, an analog one when driven to full scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Digital(bool),
    Analog(f64),
}

impl ControlValue {
    /// The active/inactive value for a control of the given kind.
    ///
    /// Press gestures drive analog controls to full scale (1.0) and back to
    /// 0.0; there is no intermediate value on this path.
    #[must_use]
    pub fn active_for(kind: ControlKind, active: bool) -> Self {
        match kind {
            ControlKind::Digital => ControlValue::Digital(active),
            ControlKind::Analog => ControlValue::Analog(if active { 1.0 } else { 0.0 }),
        }
    }

    /// Whether this value counts as active.
    #[must_use]
    pub fn is_active(self) -> bool {
        match self {
            ControlValue::Digital(v) => v,
            ControlValue::Analog(v) => v > 0.0,
        }
    }
}

/// Complete state of one virtual gamepad slot.
///
/// Created all-neutral at engine start and mutated in place for the engine's
/// lifetime. The neutral state is all sticks at (0, 0), all buttons released,
/// both triggers at 0.0.
///
/// # Examples
///
/// ```
/// use padlink::gamepad::GamepadState;
///
/// let state = GamepadState::default();
/// assert_eq!(state.left_stick_x, 0.0);
/// assert!(!state.a);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    // Stick axes (-1.0 to 1.0)
    pub left_stick_x: f64,
    pub left_stick_y: f64,
    pub right_stick_x: f64,
    pub right_stick_y: f64,

    // D-pad
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,

    // Face buttons
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,

    // System buttons
    pub guide: bool,
    pub start: bool,
    pub back: bool,

    // Bumpers
    pub left_bumper: bool,
    pub right_bumper: bool,

    // Stick clicks
    pub left_stick_button: bool,
    pub right_stick_button: bool,

    // Analog triggers (0.0 to 1.0)
    pub left_trigger: f64,
    pub right_trigger: f64,

    // Present only while the active mapping defines a touchpad key
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub touchpad: Option<bool>,
}

impl GamepadState {
    /// Creates a new all-neutral state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every field is at its neutral value.
    ///
    /// # Examples
    ///
    /// ```
    /// use padlink::gamepad::GamepadState;
    ///
    /// let mut state = GamepadState::new();
    /// assert!(state.is_neutral());
    ///
    /// state.b = true;
    /// assert!(!state.is_neutral());
    /// ```
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == GamepadState::default()
    }

    /// Applies a partial update as a shallow overwrite.
    ///
    /// Fields absent from the delta keep their current value.
    pub fn apply(&mut self, delta: &PadDelta) {
        macro_rules! take {
            ($field:ident) => {
                if let Some(v) = delta.$field {
                    self.$field = v;
                }
            };
        }

        take!(left_stick_x);
        take!(left_stick_y);
        take!(right_stick_x);
        take!(right_stick_y);
        take!(dpad_up);
        take!(dpad_down);
        take!(dpad_left);
        take!(dpad_right);
        take!(a);
        take!(b);
        take!(x);
        take!(y);
        take!(guide);
        take!(start);
        take!(back);
        take!(left_bumper);
        take!(right_bumper);
        take!(left_stick_button);
        take!(right_stick_button);
        take!(left_trigger);
        take!(right_trigger);
        if let Some(v) = delta.touchpad {
            self.touchpad = Some(v);
        }
    }
}

/// Partial update to a slot's [`GamepadState`].
///
/// Input engines populate only the fields they own; everything else stays
/// `None` and survives the merge untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadDelta {
    pub left_stick_x: Option<f64>,
    pub left_stick_y: Option<f64>,
    pub right_stick_x: Option<f64>,
    pub right_stick_y: Option<f64>,

    pub dpad_up: Option<bool>,
    pub dpad_down: Option<bool>,
    pub dpad_left: Option<bool>,
    pub dpad_right: Option<bool>,

    pub a: Option<bool>,
    pub b: Option<bool>,
    pub x: Option<bool>,
    pub y: Option<bool>,

    pub guide: Option<bool>,
    pub start: Option<bool>,
    pub back: Option<bool>,

    pub left_bumper: Option<bool>,
    pub right_bumper: Option<bool>,

    pub left_stick_button: Option<bool>,
    pub right_stick_button: Option<bool>,

    pub left_trigger: Option<f64>,
    pub right_trigger: Option<f64>,

    pub touchpad: Option<bool>,
}

impl PadDelta {
    /// Creates an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the delta carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == PadDelta::default()
    }

    /// Delta setting both axes of a stick.
    #[must_use]
    pub fn stick(stick: PadStick, x: f64, y: f64) -> Self {
        let mut delta = PadDelta::new();
        match stick {
            PadStick::Left => {
                delta.left_stick_x = Some(x);
                delta.left_stick_y = Some(y);
            }
            PadStick::Right => {
                delta.right_stick_x = Some(x);
                delta.right_stick_y = Some(y);
            }
        }
        delta
    }

    /// Delta setting a continuous trigger value.
    #[must_use]
    pub fn trigger(trigger: PadTrigger, value: f64) -> Self {
        let mut delta = PadDelta::new();
        match trigger {
            PadTrigger::Left => delta.left_trigger = Some(value),
            PadTrigger::Right => delta.right_trigger = Some(value),
        }
        delta
    }

    /// Delta setting one pressable control from a tagged value.
    ///
    /// The value's tag must match the control's [`ControlKind`]; a digital
    /// value on an analog control (or vice versa) is a caller bug and maps
    /// through [`ControlValue::is_active`] rather than being written raw.
    #[must_use]
    pub fn button(button: PadButton, value: ControlValue) -> Self {
        let mut delta = PadDelta::new();
        let digital = value.is_active();
        let analog = match value {
            ControlValue::Analog(v) => v,
            ControlValue::Digital(v) => {
                if v {
                    1.0
                } else {
                    0.0
                }
            }
        };

        match button {
            PadButton::DpadUp => delta.dpad_up = Some(digital),
            PadButton::DpadDown => delta.dpad_down = Some(digital),
            PadButton::DpadLeft => delta.dpad_left = Some(digital),
            PadButton::DpadRight => delta.dpad_right = Some(digital),
            PadButton::A => delta.a = Some(digital),
            PadButton::B => delta.b = Some(digital),
            PadButton::X => delta.x = Some(digital),
            PadButton::Y => delta.y = Some(digital),
            PadButton::Guide => delta.guide = Some(digital),
            PadButton::Start => delta.start = Some(digital),
            PadButton::Back => delta.back = Some(digital),
            PadButton::LeftBumper => delta.left_bumper = Some(digital),
            PadButton::RightBumper => delta.right_bumper = Some(digital),
            PadButton::LeftStickButton => delta.left_stick_button = Some(digital),
            PadButton::RightStickButton => delta.right_stick_button = Some(digital),
            PadButton::LeftTrigger => delta.left_trigger = Some(analog),
            PadButton::RightTrigger => delta.right_trigger = Some(analog),
            PadButton::Touchpad => delta.touchpad = Some(digital),
        }
        delta
    }
}

/// The pair of slot states forwarded to the outbound channel on every tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateFrame {
    pub gamepad1: GamepadState,
    pub gamepad2: GamepadState,
}

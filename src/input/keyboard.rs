//! # Keyboard Input Engine
//!
//! Maps physical-key events onto virtual gamepad controls.
//!
//! ## Key Identifiers
//!
//! Keys are opaque strings in the host platform's physical-key naming scheme
//! (`"KeyW"`, `"ArrowUp"`, `"ShiftLeft"`) and are compared by exact string
//! equality. Unmapped controls (empty or absent key) never activate from
//! keyboard input; unknown keys are ignored.
//!
//! ## Default Mapping
//!
//! | Control | Key | Control | Key |
//! |---------|-----|---------|-----|
//! | left stick up/down/left/right | W / S / A / D | dpad up/down/left/right | I / K / J / L |
//! | right stick up/down/left/right | Arrow keys | a / b / x / y | Space / X / Z / C |
//! | start / back / guide | Enter / Escape / G | left / right bumper | Q / E |
//! | left / right trigger | ShiftLeft / ShiftRight | left / right stick button | F / H |
//!
//! ## Update Semantics
//!
//! Key events are edge-triggered: a key-down for an already-pressed key does
//! nothing, and each event recomputes only the controls mapped to that key,
//! so pointer-written state on unrelated controls survives. The exception is
//! stick axes: any of a stick's four directional keys recomputes both of that
//! stick's axes as the signed sum of the opposing key states, which yields
//! discrete positions at the eight compass points plus center. Triggers
//! driven by keyboard are binary: pressed = 1.0, released = 0.0.
//!
//! The engine reports whether an event's key appears anywhere in the current
//! mapping so the host shell can suppress the platform default action (page
//! scroll on Space, for example) while keyboard control is enabled.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::gamepad::{PadDelta, PadStick};

/// Mapping from logical control names to optional key identifier strings.
///
/// Stick axes are represented as four directional keys per stick. The
/// mapping is replaced wholesale by configuration action, never patched
/// field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardMapping {
    // Stick directions
    pub left_stick_up: Option<String>,
    pub left_stick_down: Option<String>,
    pub left_stick_left: Option<String>,
    pub left_stick_right: Option<String>,
    pub right_stick_up: Option<String>,
    pub right_stick_down: Option<String>,
    pub right_stick_left: Option<String>,
    pub right_stick_right: Option<String>,

    // D-pad
    pub dpad_up: Option<String>,
    pub dpad_down: Option<String>,
    pub dpad_left: Option<String>,
    pub dpad_right: Option<String>,

    // Face buttons
    pub a: Option<String>,
    pub b: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,

    // System buttons
    pub guide: Option<String>,
    pub start: Option<String>,
    pub back: Option<String>,

    // Bumpers and triggers
    pub left_bumper: Option<String>,
    pub right_bumper: Option<String>,
    pub left_trigger: Option<String>,
    pub right_trigger: Option<String>,

    // Stick buttons
    pub left_stick_button: Option<String>,
    pub right_stick_button: Option<String>,

    // Optional extra; the touchpad control exists only while this is mapped
    pub touchpad: Option<String>,
}

impl Default for KeyboardMapping {
    /// The documented default layout: WASD left stick, arrow keys right
    /// stick, IJKL d-pad. No touchpad key.
    fn default() -> Self {
        fn key(code: &str) -> Option<String> {
            Some(code.to_string())
        }

        Self {
            left_stick_up: key("KeyW"),
            left_stick_down: key("KeyS"),
            left_stick_left: key("KeyA"),
            left_stick_right: key("KeyD"),

            right_stick_up: key("ArrowUp"),
            right_stick_down: key("ArrowDown"),
            right_stick_left: key("ArrowLeft"),
            right_stick_right: key("ArrowRight"),

            dpad_up: key("KeyI"),
            dpad_down: key("KeyK"),
            dpad_left: key("KeyJ"),
            dpad_right: key("KeyL"),

            a: key("Space"),
            b: key("KeyX"),
            x: key("KeyZ"),
            y: key("KeyC"),

            guide: key("KeyG"),
            start: key("Enter"),
            back: key("Escape"),

            left_bumper: key("KeyQ"),
            right_bumper: key("KeyE"),
            left_trigger: key("ShiftLeft"),
            right_trigger: key("ShiftRight"),

            left_stick_button: key("KeyF"),
            right_stick_button: key("KeyH"),

            touchpad: None,
        }
    }
}

/// Normalizes a mapping entry: empty strings count as unmapped.
fn entry(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|k| !k.is_empty())
}

impl KeyboardMapping {
    /// All entries with their logical control names, in wire order.
    fn entries(&self) -> [(&'static str, Option<&str>); 26] {
        [
            ("left_stick_up", entry(&self.left_stick_up)),
            ("left_stick_down", entry(&self.left_stick_down)),
            ("left_stick_left", entry(&self.left_stick_left)),
            ("left_stick_right", entry(&self.left_stick_right)),
            ("right_stick_up", entry(&self.right_stick_up)),
            ("right_stick_down", entry(&self.right_stick_down)),
            ("right_stick_left", entry(&self.right_stick_left)),
            ("right_stick_right", entry(&self.right_stick_right)),
            ("dpad_up", entry(&self.dpad_up)),
            ("dpad_down", entry(&self.dpad_down)),
            ("dpad_left", entry(&self.dpad_left)),
            ("dpad_right", entry(&self.dpad_right)),
            ("a", entry(&self.a)),
            ("b", entry(&self.b)),
            ("x", entry(&self.x)),
            ("y", entry(&self.y)),
            ("guide", entry(&self.guide)),
            ("start", entry(&self.start)),
            ("back", entry(&self.back)),
            ("left_bumper", entry(&self.left_bumper)),
            ("right_bumper", entry(&self.right_bumper)),
            ("left_trigger", entry(&self.left_trigger)),
            ("right_trigger", entry(&self.right_trigger)),
            ("left_stick_button", entry(&self.left_stick_button)),
            ("right_stick_button", entry(&self.right_stick_button)),
            ("touchpad", entry(&self.touchpad)),
        ]
    }

    /// Whether the key identifier appears anywhere in the mapping's value
    /// set. The host shell should suppress the platform default action for
    /// such keys while keyboard control is enabled.
    #[must_use]
    pub fn maps_key(&self, code: &str) -> bool {
        self.entries().iter().any(|(_, key)| *key == Some(code))
    }

    /// Key identifiers bound to more than one control, with the controls
    /// they are bound to.
    ///
    /// A conflicted mapping is still usable (every bound control reacts to
    /// the shared key); callers surface the conflicts to the operator.
    #[must_use]
    pub fn conflicts(&self) -> Vec<(String, Vec<&'static str>)> {
        let mut by_key: HashMap<&str, Vec<&'static str>> = HashMap::new();
        for (name, key) in self.entries() {
            if let Some(key) = key {
                by_key.entry(key).or_default().push(name);
            }
        }

        let mut conflicts: Vec<(String, Vec<&'static str>)> = by_key
            .into_iter()
            .filter(|(_, controls)| controls.len() > 1)
            .map(|(key, controls)| (key.to_string(), controls))
            .collect();
        conflicts.sort();
        conflicts
    }

    /// Whether the active mapping defines a touchpad key.
    #[must_use]
    pub fn has_touchpad(&self) -> bool {
        entry(&self.touchpad).is_some()
    }
}

/// Result of feeding one key event to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutcome {
    /// The key appears in the current mapping; the host should suppress its
    /// platform default action.
    pub consumed: bool,
    /// Controls affected by this event. Empty when the key maps to nothing
    /// or the event was not an edge.
    pub delta: PadDelta,
}

impl KeyOutcome {
    fn ignored(consumed: bool) -> Self {
        Self {
            consumed,
            delta: PadDelta::new(),
        }
    }
}

/// Tracks pressed keys and turns key edges into [`PadDelta`]s.
///
/// The engine owns no slot and carries no enable flag; precedence and target
/// selection are decided upstream per event. When keyboard input is disabled
/// the pressed set is cleared by the caller so a later enable starts clean.
///
/// # Examples
///
/// ```
/// use padlink::input::keyboard::{KeyboardEngine, KeyboardMapping};
///
/// let mut engine = KeyboardEngine::new(KeyboardMapping::default());
///
/// let outcome = engine.key_down("KeyW");
/// assert!(outcome.consumed);
/// assert_eq!(outcome.delta.left_stick_y, Some(1.0));
/// ```
#[derive(Debug)]
pub struct KeyboardEngine {
    mapping: KeyboardMapping,
    pressed: HashSet<String>,
}

impl KeyboardEngine {
    /// Creates an engine with the given mapping and no pressed keys.
    #[must_use]
    pub fn new(mapping: KeyboardMapping) -> Self {
        Self {
            mapping,
            pressed: HashSet::new(),
        }
    }

    /// The active mapping.
    #[must_use]
    pub fn mapping(&self) -> &KeyboardMapping {
        &self.mapping
    }

    /// Replaces the mapping wholesale.
    ///
    /// Physically held keys stay in the pressed set; they affect controls
    /// under the new mapping from their next event onward.
    pub fn set_mapping(&mut self, mapping: KeyboardMapping) {
        self.mapping = mapping;
    }

    /// Forgets all pressed keys. Called when keyboard input is disabled.
    pub fn clear_pressed(&mut self) {
        self.pressed.clear();
    }

    /// Whether any key is currently tracked as pressed.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// Processes a key-down event.
    ///
    /// Edge-triggered: repeats for an already-pressed key produce an empty
    /// delta.
    pub fn key_down(&mut self, code: &str) -> KeyOutcome {
        let consumed = self.mapping.maps_key(code);

        if self.pressed.contains(code) {
            return KeyOutcome::ignored(consumed);
        }
        self.pressed.insert(code.to_string());

        KeyOutcome {
            consumed,
            delta: self.delta_for_key(code),
        }
    }

    /// Processes a key-up event.
    pub fn key_up(&mut self, code: &str) -> KeyOutcome {
        let consumed = self.mapping.maps_key(code);
        self.pressed.remove(code);

        KeyOutcome {
            consumed,
            delta: self.delta_for_key(code),
        }
    }

    fn is_pressed(&self, key: Option<&str>) -> bool {
        key.is_some_and(|k| self.pressed.contains(k))
    }

    /// Signed sums of the opposing directional key states for one stick,
    /// each clamped to [-1, 1].
    fn stick_axes(&self, stick: PadStick) -> (f64, f64) {
        let m = &self.mapping;
        let (up, down, left, right) = match stick {
            PadStick::Left => (
                entry(&m.left_stick_up),
                entry(&m.left_stick_down),
                entry(&m.left_stick_left),
                entry(&m.left_stick_right),
            ),
            PadStick::Right => (
                entry(&m.right_stick_up),
                entry(&m.right_stick_down),
                entry(&m.right_stick_left),
                entry(&m.right_stick_right),
            ),
        };

        let mut x: f64 = 0.0;
        let mut y: f64 = 0.0;
        if self.is_pressed(left) {
            x -= 1.0;
        }
        if self.is_pressed(right) {
            x += 1.0;
        }
        if self.is_pressed(up) {
            y += 1.0;
        }
        if self.is_pressed(down) {
            y -= 1.0;
        }

        (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0))
    }

    fn key_drives_stick(&self, stick: PadStick, code: &str) -> bool {
        let m = &self.mapping;
        let keys = match stick {
            PadStick::Left => [
                entry(&m.left_stick_up),
                entry(&m.left_stick_down),
                entry(&m.left_stick_left),
                entry(&m.left_stick_right),
            ],
            PadStick::Right => [
                entry(&m.right_stick_up),
                entry(&m.right_stick_down),
                entry(&m.right_stick_left),
                entry(&m.right_stick_right),
            ],
        };
        keys.iter().any(|k| *k == Some(code))
    }

    /// Recomputes only the controls whose mapping entry equals this key.
    fn delta_for_key(&self, code: &str) -> PadDelta {
        let mut delta = PadDelta::new();
        let m = &self.mapping;

        // Any directional key recomputes both axes of its stick
        if self.key_drives_stick(PadStick::Left, code) {
            let (x, y) = self.stick_axes(PadStick::Left);
            delta.left_stick_x = Some(x);
            delta.left_stick_y = Some(y);
        }
        if self.key_drives_stick(PadStick::Right, code) {
            let (x, y) = self.stick_axes(PadStick::Right);
            delta.right_stick_x = Some(x);
            delta.right_stick_y = Some(y);
        }

        macro_rules! digital {
            ($field:ident) => {
                if entry(&m.$field) == Some(code) {
                    delta.$field = Some(self.is_pressed(entry(&m.$field)));
                }
            };
        }

        digital!(dpad_up);
        digital!(dpad_down);
        digital!(dpad_left);
        digital!(dpad_right);
        digital!(a);
        digital!(b);
        digital!(x);
        digital!(y);
        digital!(guide);
        digital!(start);
        digital!(back);
        digital!(left_bumper);
        digital!(right_bumper);
        digital!(left_stick_button);
        digital!(right_stick_button);

        // Keyboard triggers are binary
        if entry(&m.left_trigger) == Some(code) {
            delta.left_trigger = Some(if self.is_pressed(entry(&m.left_trigger)) {
                1.0
            } else {
                0.0
            });
        }
        if entry(&m.right_trigger) == Some(code) {
            delta.right_trigger = Some(if self.is_pressed(entry(&m.right_trigger)) {
                1.0
            } else {
                0.0
            });
        }

        if entry(&m.touchpad) == Some(code) {
            delta.touchpad = Some(self.is_pressed(entry(&m.touchpad)));
        }

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Mapping Tests ====================

    #[test]
    fn test_default_mapping_layout() {
        let mapping = KeyboardMapping::default();
        assert_eq!(mapping.left_stick_up.as_deref(), Some("KeyW"));
        assert_eq!(mapping.left_stick_right.as_deref(), Some("KeyD"));
        assert_eq!(mapping.right_stick_up.as_deref(), Some("ArrowUp"));
        assert_eq!(mapping.dpad_left.as_deref(), Some("KeyJ"));
        assert_eq!(mapping.a.as_deref(), Some("Space"));
        assert_eq!(mapping.start.as_deref(), Some("Enter"));
        assert_eq!(mapping.left_trigger.as_deref(), Some("ShiftLeft"));
        assert_eq!(mapping.touchpad, None);
    }

    #[test]
    fn test_default_mapping_has_no_conflicts() {
        assert!(KeyboardMapping::default().conflicts().is_empty());
    }

    #[test]
    fn test_maps_key() {
        let mapping = KeyboardMapping::default();
        assert!(mapping.maps_key("KeyW"));
        assert!(mapping.maps_key("ShiftRight"));
        assert!(!mapping.maps_key("KeyP"));
        // Comparison is exact, not case-insensitive
        assert!(!mapping.maps_key("keyw"));
    }

    #[test]
    fn test_empty_string_counts_as_unmapped() {
        let mut mapping = KeyboardMapping::default();
        mapping.a = Some(String::new());
        assert!(!mapping.maps_key(""));

        let mut engine = KeyboardEngine::new(mapping);
        let outcome = engine.key_down("");
        assert!(!outcome.consumed);
        assert!(outcome.delta.is_empty());
    }

    #[test]
    fn test_conflicts_reported_per_key() {
        let mut mapping = KeyboardMapping::default();
        mapping.b = Some("Space".to_string()); // collides with a

        let conflicts = mapping.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].0, "Space");
        assert!(conflicts[0].1.contains(&"a"));
        assert!(conflicts[0].1.contains(&"b"));
    }

    #[test]
    fn test_mapping_deserializes_with_partial_toml() {
        // A partial table overrides only the named entries
        let mapping: KeyboardMapping = toml::from_str("a = \"KeyM\"").unwrap();
        assert_eq!(mapping.a.as_deref(), Some("KeyM"));
        assert_eq!(mapping.b.as_deref(), Some("KeyX"));
    }

    // ==================== Stick Tests ====================

    #[test]
    fn test_wasd_compass_points() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        // Press W then D: up-right diagonal
        let outcome = engine.key_down("KeyW");
        assert_eq!(outcome.delta.left_stick_x, Some(0.0));
        assert_eq!(outcome.delta.left_stick_y, Some(1.0));

        let outcome = engine.key_down("KeyD");
        assert_eq!(outcome.delta.left_stick_x, Some(1.0));
        assert_eq!(outcome.delta.left_stick_y, Some(1.0));

        // Release W: x keeps its value, y recomputes to 0
        let outcome = engine.key_up("KeyW");
        assert_eq!(outcome.delta.left_stick_x, Some(1.0));
        assert_eq!(outcome.delta.left_stick_y, Some(0.0));
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        engine.key_down("KeyA");
        let outcome = engine.key_down("KeyD");
        assert_eq!(outcome.delta.left_stick_x, Some(0.0));

        let outcome = engine.key_up("KeyA");
        assert_eq!(outcome.delta.left_stick_x, Some(1.0));
    }

    #[test]
    fn test_sticks_are_independent() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        let outcome = engine.key_down("ArrowDown");
        assert_eq!(outcome.delta.right_stick_y, Some(-1.0));
        assert_eq!(outcome.delta.right_stick_x, Some(0.0));
        // The left stick is not touched by right-stick keys
        assert_eq!(outcome.delta.left_stick_x, None);
        assert_eq!(outcome.delta.left_stick_y, None);
    }

    #[test]
    fn test_stick_delta_does_not_touch_buttons() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());
        let outcome = engine.key_down("KeyW");
        assert!(outcome.delta.a.is_none());
        assert!(outcome.delta.left_trigger.is_none());
        assert!(outcome.delta.dpad_up.is_none());
    }

    // ==================== Button Tests ====================

    #[test]
    fn test_button_press_and_release() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        let outcome = engine.key_down("Space");
        assert!(outcome.consumed);
        assert_eq!(outcome.delta.a, Some(true));

        let outcome = engine.key_up("Space");
        assert_eq!(outcome.delta.a, Some(false));
    }

    #[test]
    fn test_key_down_is_edge_triggered() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        let first = engine.key_down("Space");
        assert_eq!(first.delta.a, Some(true));

        // OS auto-repeat delivers further key-downs; they must not rewrite
        let repeat = engine.key_down("Space");
        assert!(repeat.consumed);
        assert!(repeat.delta.is_empty());
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        let outcome = engine.key_down("KeyP");
        assert!(!outcome.consumed);
        assert!(outcome.delta.is_empty());

        let outcome = engine.key_up("KeyP");
        assert!(!outcome.consumed);
        assert!(outcome.delta.is_empty());
    }

    #[test]
    fn test_triggers_are_binary() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        let outcome = engine.key_down("ShiftLeft");
        assert_eq!(outcome.delta.left_trigger, Some(1.0));
        assert_eq!(outcome.delta.right_trigger, None);

        let outcome = engine.key_up("ShiftLeft");
        assert_eq!(outcome.delta.left_trigger, Some(0.0));
    }

    #[test]
    fn test_touchpad_only_when_mapped() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());
        let outcome = engine.key_down("KeyT");
        assert!(outcome.delta.touchpad.is_none());

        let mut mapping = KeyboardMapping::default();
        mapping.touchpad = Some("KeyT".to_string());
        let mut engine = KeyboardEngine::new(mapping);

        let outcome = engine.key_down("KeyT");
        assert!(outcome.consumed);
        assert_eq!(outcome.delta.touchpad, Some(true));
    }

    #[test]
    fn test_conflicted_key_drives_all_bound_controls() {
        let mut mapping = KeyboardMapping::default();
        mapping.b = Some("Space".to_string());
        let mut engine = KeyboardEngine::new(mapping);

        let outcome = engine.key_down("Space");
        assert_eq!(outcome.delta.a, Some(true));
        assert_eq!(outcome.delta.b, Some(true));
    }

    // ==================== Mapping Replacement Tests ====================

    #[test]
    fn test_set_mapping_replaces_wholesale() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        let mut mapping = KeyboardMapping::default();
        mapping.a = Some("KeyM".to_string());
        engine.set_mapping(mapping);

        let outcome = engine.key_down("Space");
        assert!(outcome.delta.a.is_none());

        let outcome = engine.key_down("KeyM");
        assert_eq!(outcome.delta.a, Some(true));
    }

    #[test]
    fn test_clear_pressed() {
        let mut engine = KeyboardEngine::new(KeyboardMapping::default());

        engine.key_down("KeyW");
        assert!(engine.any_pressed());

        engine.clear_pressed();
        assert!(!engine.any_pressed());

        // After the clear, the next key-down is a fresh edge
        let outcome = engine.key_down("KeyW");
        assert_eq!(outcome.delta.left_stick_y, Some(1.0));
    }
}

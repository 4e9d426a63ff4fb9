//! # Engine Module
//!
//! One task owns everything: the state store, the precedence flags, both
//! input engines and the uplink. Commands arrive on a bounded channel and
//! are processed strictly in order, interleaved with uplink ticks through
//! `tokio::select!`. That makes one logical thread of control, so a merge is
//! always fully applied before the next tick or event observes the store.
//!
//! Because precedence flags travel on the same queue as input events, a
//! hardware-status change or keyboard disable takes effect before the next
//! event is processed, never "eventually": suppression is re-evaluated per
//! event, not cached.
//!
//! Embedders hold a cloneable [`PadHandle`]. Dropping every handle (or
//! calling [`PadHandle::shutdown`]) ends the task, which also cancels the
//! tick timer.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{PadlinkError, Result};
use crate::gamepad::{PadButton, PadSlot, PadStore, Precedence, StateFrame};
use crate::input::keyboard::{KeyboardEngine, KeyboardMapping};
use crate::input::pointer::{PointerEvent, SlotPointer};
use crate::uplink::{StateSink, Uplink};

/// Command channel depth. Input events are small and processed quickly;
/// this only needs to absorb bursts.
const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// Everything the engine reacts to, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum PadCommand {
    /// A physical key went down. The identifier is the platform's
    /// physical-key name, compared verbatim.
    KeyDown(String),
    /// A physical key came up.
    KeyUp(String),
    /// A pointer gesture on one slot's widgets.
    Pointer { slot: PadSlot, event: PointerEvent },
    /// Replace the keyboard mapping wholesale.
    SetMapping(KeyboardMapping),
    /// Enable or disable keyboard-driven input.
    SetKeyboardEnabled(bool),
    /// Select the slot keyboard input writes to.
    SetKeyboardTarget(PadSlot),
    /// Externally-sourced hardware connection status for a slot.
    SetHardwareConnected { slot: PadSlot, connected: bool },
    /// Operator reset: return a slot to the neutral state.
    Reset(PadSlot),
    /// Stop the engine task.
    Shutdown,
}

/// The input-aggregation and uplink engine.
///
/// Constructed once at application start; all consumers go through a
/// [`PadHandle`]. Direct use (`handle_command` / `tick`) is how the tests
/// drive it deterministically.
pub struct PadEngine<S: StateSink> {
    store: PadStore,
    precedence: Precedence,
    keyboard: KeyboardEngine,
    pointers: [SlotPointer; 2],
    uplink: Uplink<S>,
}

impl<S: StateSink> PadEngine<S> {
    /// Creates an engine from configuration, with both slots neutral.
    pub fn new(config: &Config, sink: S) -> Self {
        let mapping = config.keyboard.mapping.clone();
        warn_on_conflicts(&mapping);

        let mut precedence = Precedence::new();
        precedence.set_keyboard_enabled(config.keyboard.enabled);

        let deadzone = config.pointer.stick_deadzone;
        let period = std::time::Duration::from_millis(config.uplink.tick_interval_ms);

        Self {
            store: PadStore::new(),
            precedence,
            keyboard: KeyboardEngine::new(mapping),
            pointers: [SlotPointer::new(deadzone), SlotPointer::new(deadzone)],
            uplink: Uplink::new(sink, period),
        }
    }

    /// Read access to the store, for embedders rendering current state.
    #[must_use]
    pub fn store(&self) -> &PadStore {
        &self.store
    }

    /// Current precedence flags.
    #[must_use]
    pub fn precedence(&self) -> &Precedence {
        &self.precedence
    }

    /// One uplink tick: snapshot the live store and dispatch it.
    pub fn tick(&mut self) {
        let frame: StateFrame = self.store.frame();
        self.uplink.dispatch(frame);
    }

    /// Processes one command. Returns `false` when the engine should stop.
    pub fn handle_command(&mut self, command: PadCommand) -> bool {
        match command {
            PadCommand::KeyDown(code) => self.on_key(&code, true),
            PadCommand::KeyUp(code) => self.on_key(&code, false),
            PadCommand::Pointer { slot, event } => self.on_pointer(slot, &event),
            PadCommand::SetMapping(mapping) => self.on_set_mapping(mapping),
            PadCommand::SetKeyboardEnabled(enabled) => {
                self.precedence.set_keyboard_enabled(enabled);
                if !enabled {
                    // A later enable starts from a clean slate
                    self.keyboard.clear_pressed();
                }
                debug!("Keyboard input {}", if enabled { "enabled" } else { "disabled" });
            }
            PadCommand::SetKeyboardTarget(slot) => {
                // Held keys stay tracked: they drive the new target from
                // their next event on, and the old slot keeps its deflection
                self.precedence.set_keyboard_target(slot);
                debug!("Keyboard target is now {}", slot);
            }
            PadCommand::SetHardwareConnected { slot, connected } => {
                self.on_hardware_status(slot, connected);
            }
            PadCommand::Reset(slot) => self.on_reset(slot),
            PadCommand::Shutdown => return false,
        }
        true
    }

    /// The engine loop: commands and ticks on one logical thread.
    async fn run(mut self, mut rx: mpsc::Receiver<PadCommand>) {
        let mut ticker = self.uplink.ticker();
        info!(
            "Pad engine running, uplink every {:?}",
            self.uplink.period()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                command = rx.recv() => {
                    match command {
                        Some(command) => {
                            if !self.handle_command(command) {
                                break;
                            }
                        }
                        // Every handle dropped
                        None => break,
                    }
                }
            }
        }

        info!("Pad engine stopped");
    }

    fn on_key(&mut self, code: &str, down: bool) {
        // Precedence is re-evaluated here, on every event
        let Some(slot) = self.precedence.keyboard_slot() else {
            debug!("Keyboard event {:?} suppressed", code);
            return;
        };

        let outcome = if down {
            self.keyboard.key_down(code)
        } else {
            self.keyboard.key_up(code)
        };

        if !outcome.delta.is_empty() {
            self.store.merge(slot, &outcome.delta);
        }
    }

    fn on_pointer(&mut self, slot: PadSlot, event: &PointerEvent) {
        if !self.precedence.pointer_allowed(slot) {
            debug!("Pointer event on {} suppressed by hardware", slot);
            return;
        }

        // The touchpad control exists only while the mapping defines it
        if let PointerEvent::Button {
            button: PadButton::Touchpad,
            ..
        } = event
        {
            if !self.keyboard.mapping().has_touchpad() {
                return;
            }
        }

        let delta = self.pointers[slot.index()].handle(event);
        if !delta.is_empty() {
            self.store.merge(slot, &delta);
        }
    }

    fn on_set_mapping(&mut self, mapping: KeyboardMapping) {
        warn_on_conflicts(&mapping);

        if !mapping.has_touchpad() {
            for slot in PadSlot::ALL {
                self.store.clear_touchpad(slot);
            }
        }
        self.keyboard.set_mapping(mapping);
        info!("Keyboard mapping replaced");
    }

    fn on_hardware_status(&mut self, slot: PadSlot, connected: bool) {
        let was = self.precedence.hardware_connected(slot);
        self.precedence.set_hardware_connected(slot, connected);

        if connected && !was {
            info!("Hardware controller connected on {}", slot);
            // In-flight gestures must not complete after the takeover
            self.pointers[slot.index()].reset();
            if self.precedence.keyboard_target() == slot {
                self.keyboard.clear_pressed();
            }
        } else if !connected && was {
            info!("Hardware controller disconnected from {}", slot);
        }
    }

    fn on_reset(&mut self, slot: PadSlot) {
        // The reset affordance is part of the slot's widgets, so hardware
        // ownership suppresses it like any other pointer action
        if !self.precedence.pointer_allowed(slot) {
            debug!("Reset of {} suppressed by hardware", slot);
            return;
        }
        self.store.reset(slot);
        self.pointers[slot.index()].reset();
        info!("{} reset to neutral", slot);
    }
}

impl<S: StateSink + 'static> PadEngine<S> {
    /// Spawns the engine task and returns the handle embedders use.
    ///
    /// The tick timer lives inside the task and is cancelled with it.
    pub fn spawn(config: &Config, sink: S) -> (PadHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let engine = PadEngine::new(config, sink);
        let join = tokio::spawn(engine.run(rx));
        (PadHandle { tx }, join)
    }
}

fn warn_on_conflicts(mapping: &KeyboardMapping) {
    for (key, controls) in mapping.conflicts() {
        warn!("Key {:?} is bound to multiple controls: {}", key, controls.join(", "));
    }
}

/// Cloneable front for a running [`PadEngine`].
///
/// Every method enqueues a command; processing order is arrival order.
/// Methods fail with [`PadlinkError::EngineClosed`] once the engine task has
/// stopped.
#[derive(Debug, Clone)]
pub struct PadHandle {
    tx: mpsc::Sender<PadCommand>,
}

impl PadHandle {
    async fn send(&self, command: PadCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| PadlinkError::EngineClosed)
    }

    /// Forwards a key-down event.
    pub async fn key_down(&self, code: impl Into<String>) -> Result<()> {
        self.send(PadCommand::KeyDown(code.into())).await
    }

    /// Forwards a key-up event.
    pub async fn key_up(&self, code: impl Into<String>) -> Result<()> {
        self.send(PadCommand::KeyUp(code.into())).await
    }

    /// Forwards a pointer gesture aimed at one slot's widgets.
    pub async fn pointer(&self, slot: PadSlot, event: PointerEvent) -> Result<()> {
        self.send(PadCommand::Pointer { slot, event }).await
    }

    /// Replaces the keyboard mapping wholesale.
    pub async fn set_mapping(&self, mapping: KeyboardMapping) -> Result<()> {
        self.send(PadCommand::SetMapping(mapping)).await
    }

    /// Enables or disables keyboard-driven input.
    pub async fn set_keyboard_enabled(&self, enabled: bool) -> Result<()> {
        self.send(PadCommand::SetKeyboardEnabled(enabled)).await
    }

    /// Selects which slot keyboard input writes to.
    pub async fn set_keyboard_target(&self, slot: PadSlot) -> Result<()> {
        self.send(PadCommand::SetKeyboardTarget(slot)).await
    }

    /// Reports hardware connection status for a slot.
    pub async fn set_hardware_connected(&self, slot: PadSlot, connected: bool) -> Result<()> {
        self.send(PadCommand::SetHardwareConnected { slot, connected })
            .await
    }

    /// Returns a slot to the neutral state.
    pub async fn reset(&self, slot: PadSlot) -> Result<()> {
        self.send(PadCommand::Reset(slot)).await
    }

    /// Stops the engine task.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(PadCommand::Shutdown).await
    }
}

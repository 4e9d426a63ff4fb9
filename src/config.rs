//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::input::keyboard::KeyboardMapping;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub uplink: UplinkConfig,

    #[serde(default)]
    pub pointer: PointerConfig,

    #[serde(default)]
    pub keyboard: KeyboardConfig,
}

/// Uplink scheduler configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UplinkConfig {
    /// Tick period in milliseconds. The remote watchdog declares a
    /// disconnect after 500 ms without a frame, so this must stay well
    /// below that.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Capacity of the bounded outbound frame channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// Pointer input configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PointerConfig {
    /// Radial dead zone for pointer-driven sticks (0.0 to 0.5).
    #[serde(default = "default_stick_deadzone")]
    pub stick_deadzone: f64,
}

/// Keyboard input configuration
#[derive(Debug, Deserialize, Clone)]
pub struct KeyboardConfig {
    /// Whether keyboard-driven input starts enabled.
    #[serde(default = "default_keyboard_enabled")]
    pub enabled: bool,

    /// The initial mapping. Entries not present in the file keep the
    /// documented defaults; an empty string unmaps a control.
    #[serde(default)]
    pub mapping: KeyboardMapping,
}

// Default value functions
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_channel_capacity() -> usize {
    32
}

fn default_stick_deadzone() -> f64 {
    0.1
}

fn default_keyboard_enabled() -> bool {
    false
}

impl Default for UplinkConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            stick_deadzone: default_stick_deadzone(),
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_keyboard_enabled(),
            mapping: KeyboardMapping::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uplink: UplinkConfig::default(),
            pointer: PointerConfig::default(),
            keyboard: KeyboardConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padlink::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist. A file that exists but fails to parse or
    /// validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        // The remote watchdog fires at 500 ms without a frame
        if self.uplink.tick_interval_ms == 0 || self.uplink.tick_interval_ms > 500 {
            return Err(crate::error::PadlinkError::Config(toml::de::Error::custom(
                "tick_interval_ms must be between 1 and 500",
            )));
        }

        if self.uplink.channel_capacity == 0 {
            return Err(crate::error::PadlinkError::Config(toml::de::Error::custom(
                "channel_capacity must be greater than 0",
            )));
        }

        if self.pointer.stick_deadzone < 0.0 || self.pointer.stick_deadzone > 0.5 {
            return Err(crate::error::PadlinkError::Config(toml::de::Error::custom(
                "stick_deadzone must be between 0.0 and 0.5",
            )));
        }

        // Duplicate key bindings are legal (every bound control reacts);
        // the engine warns about them at startup.

        Ok(())
    }
}

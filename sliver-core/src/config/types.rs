//! Configuration type definitions
//!
//! Render configuration is set by the host application and passed
//! explicitly to every paint call. It can be stored in flash as
//! postcard-serialized binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Default text cursor blink half-period (ms)
pub const DEFAULT_CURSOR_BLINK_MS: u16 = 500;

/// Maximum serialized config size (binary)
pub const MAX_CONFIG_SIZE: usize = 16;

/// How finely drawing work is sliced
///
/// The level is only ever consulted by the generic paint loop and the frame
/// scheduler; element implementations never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PreemptionLevel {
    /// No preemption: a scheduler call draws as much as it can
    Level0,
    /// Return to the caller after every element
    #[default]
    Level1,
    /// Return after every single draw-state transition
    Level2,
}

impl PreemptionLevel {
    /// The paint loop must stop after exactly one step
    pub fn single_step(self) -> bool {
        self == PreemptionLevel::Level2
    }

    /// The scheduler must return after each finished element
    pub fn yields_between_elements(self) -> bool {
        self != PreemptionLevel::Level0
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Deserialization failed
    Deserialize,
    /// Serialization failed (buffer too small)
    Serialize,
    /// Stored config has an unsupported layout
    VersionMismatch { found: u8 },
}

/// Render configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderConfig {
    /// Layout version
    pub version: u8,
    /// Preemption policy for paint calls
    pub preemption: PreemptionLevel,
    /// Text cursor blink half-period (ms)
    pub cursor_blink_ms: u16,
}

impl RenderConfig {
    pub const fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preemption: PreemptionLevel::Level1,
            cursor_blink_ms: DEFAULT_CURSOR_BLINK_MS,
        }
    }

    /// Same configuration with a different preemption level
    pub const fn with_preemption(self, preemption: PreemptionLevel) -> Self {
        Self { preemption, ..self }
    }

    /// Decode a postcard-serialized configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: RenderConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            warn!(
                "Config version mismatch: found {}, expected {}",
                config.version,
                CONFIG_VERSION
            );
            return Err(ConfigError::VersionMismatch {
                found: config.version,
            });
        }

        Ok(config)
    }

    /// Encode into `buf`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_slice<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

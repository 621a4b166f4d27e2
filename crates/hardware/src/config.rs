//! Configuration system for the pipeline driver.
//!
//! This module defines the configuration structures used to parameterize the
//! cycle driver. It provides:
//! 1. **Defaults:** Baseline constants (reset vector, tracing, interrupt acceptance).
//! 2. **Structures:** Hierarchical config for general and pipeline settings.
//! 3. **Loading:** JSON deserialization from strings or files, plus validation.
//!
//! Use `Config::default()` for a bare-metal core that starts at the RAM base.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::{ConfigError, INSTRUCTION_SIZE};

/// Default configuration constants for the pipeline driver.
///
/// These values apply when a field is not overridden in the JSON input.
mod defaults {
    /// Reset vector: base address of main RAM (2 GiB).
    pub const RESET_PC: u64 = 0x8000_0000;

    /// Interrupts are sampled every cycle unless disabled.
    pub const ACCEPT_INTERRUPTS: bool = true;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use rvpipe_core::config::Config;
///
/// let json = r#"{ "general": { "trace_cycles": true } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_cycles);
/// assert_eq!(config.general.reset_pc, 0x8000_0000);
/// assert!(config.pipeline.accept_interrupts);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General driver settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline control settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// Missing fields take their defaults. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and any error from
    /// [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MisalignedResetPc`] if the reset vector is not
    /// instruction-aligned.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let pc = self.general.reset_pc;
        if pc % INSTRUCTION_SIZE != 0 {
            return Err(ConfigError::MisalignedResetPc { pc });
        }
        Ok(())
    }
}

/// General driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Emit a `trace`-level event for every cycle.
    #[serde(default)]
    pub trace_cycles: bool,

    /// PC loaded on reset (defaults to RAM base)
    #[serde(default = "GeneralConfig::default_reset_pc")]
    pub reset_pc: u64,
}

impl GeneralConfig {
    /// Returns the default reset vector.
    const fn default_reset_pc() -> u64 {
        defaults::RESET_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_cycles: false,
            reset_pc: defaults::RESET_PC,
        }
    }
}

/// Pipeline control settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Sample the trap controller each cycle. When false, interrupts are never taken.
    #[serde(default = "PipelineConfig::default_accept_interrupts")]
    pub accept_interrupts: bool,
}

impl PipelineConfig {
    const fn default_accept_interrupts() -> bool {
        defaults::ACCEPT_INTERRUPTS
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            accept_interrupts: defaults::ACCEPT_INTERRUPTS,
        }
    }
}

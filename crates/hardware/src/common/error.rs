//! Error definitions.
//!
//! The hazard, forwarding and arbitration logic is total: every input yields a
//! defined output, so none of it returns errors. The only fallible surface is
//! loading and validating a [`Config`](crate::config::Config).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::constants::INSTRUCTION_SIZE;

/// Errors raised while loading or validating a pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for [`Config`](crate::config::Config).
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The reset vector does not fall on an instruction boundary.
    #[error("reset PC {pc:#x} is not aligned to {} bytes", INSTRUCTION_SIZE)]
    MisalignedResetPc {
        /// The offending reset vector.
        pc: u64,
    },
}

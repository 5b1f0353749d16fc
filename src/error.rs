//! Unified error handling for silentfan.
//!
//! One error type used across all modules, with a stable mapping from
//! startup-failure causes to process exit codes.

use std::io;
use std::path::PathBuf;

/// Result type alias using SilentfanError
pub type Result<T> = std::result::Result<T, SilentfanError>;

#[derive(thiserror::Error, Debug)]
pub enum SilentfanError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{tool} not installed. Please {hint}.")]
    MissingTool {
        tool: &'static str,
        hint: &'static str,
    },

    #[error("must run as root for smbios-thermal-ctl to work")]
    NotRoot,

    #[error("sensor read failed: {0}")]
    SensorRead(String),

    #[error("fan stop command failed: {0}")]
    StopCommand(String),
}

impl SilentfanError {
    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Exit status for startup failures. One cause, one code, so service
    /// managers can tell a bad config from a missing tool.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigRead { .. } | Self::ConfigParse(_) | Self::Config(_) => 2,
            Self::MissingTool { tool: "smbios-thermal-ctl", .. } => 3,
            Self::MissingTool { .. } => 4,
            Self::NotRoot => 5,
            _ => 1,
        }
    }
}

//! Startup environment validation.
//!
//! Every check runs exactly once, before the poll loop; a failure maps to its
//! own exit code via [`SilentfanError::exit_code`]. Nothing here is consulted
//! again while the loop runs.

use std::process::Command;

use tracing::info;

use crate::actuator::STOP_TOOL;
use crate::error::{Result, SilentfanError};

pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn is_root() -> bool {
    // SAFETY: geteuid is always safe - it just returns the process's effective user ID.
    unsafe { libc::geteuid() == 0 }
}

pub fn validate_environment() -> Result<()> {
    if !command_exists(STOP_TOOL) {
        return Err(SilentfanError::MissingTool {
            tool: "smbios-thermal-ctl",
            hint: "install the libsmbios package",
        });
    }
    if !command_exists("sensors") {
        return Err(SilentfanError::MissingTool {
            tool: "sensors",
            hint: "install the lm_sensors package",
        });
    }
    if !is_root() {
        return Err(SilentfanError::NotRoot);
    }
    info!("environment ok: tools present, running as root");
    Ok(())
}

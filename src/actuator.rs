//! Firmware fan-stop actuation.

use std::process::Command;

#[cfg(test)]
use mockall::automock;

use tracing::info;

use crate::error::{Result, SilentfanError};

pub const STOP_TOOL: &str = "smbios-thermal-ctl";

/// Requests a firmware-level fan stop. Idempotent and fire-and-forget: the
/// driver logs a failure and moves on, it never retries within a cycle.
#[cfg_attr(test, automock)]
pub trait FanStopper {
    fn request_stop(&self) -> Result<()>;
}

/// Runs `smbios-thermal-ctl --set-thermal-mode=quiet`, which makes the XPS
/// BIOS stop the fan immediately when the machine is cool enough.
pub struct SmbiosThermalCtl;

impl FanStopper for SmbiosThermalCtl {
    fn request_stop(&self) -> Result<()> {
        info!("requesting fan stop");
        let output = Command::new(STOP_TOOL)
            .arg("--set-thermal-mode=quiet")
            .output()
            .map_err(|e| SilentfanError::StopCommand(format!("failed to run {STOP_TOOL}: {e}")))?;
        if !output.status.success() {
            return Err(SilentfanError::StopCommand(format!(
                "{STOP_TOOL} exited with {}",
                output.status
            )));
        }
        Ok(())
    }
}

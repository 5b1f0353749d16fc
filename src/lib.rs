//! silentfan: fan-stop daemon for Dell XPS laptops whose BIOS leaves the fan
//! running after the CPU has cooled.
//!
//! The BIOS forgets to stop the fan once it has spun up at low speed, but
//! `smbios-thermal-ctl --set-thermal-mode=quiet` makes it stop immediately.
//! Running that command whenever the machine looks cool causes oscillation
//! near range boundaries, so the decision core in [`controller`] debounces
//! the classification from [`ranges`] over a confirmation window before
//! acting. Everything else is thin I/O: [`sensors`] samples lm-sensors
//! output, [`actuator`] shells out to smbios-thermal-ctl, [`service`] drives
//! the poll cycle, and [`system`] validates the environment at startup.

pub mod actuator;
pub mod config;
pub mod controller;
pub mod error;
pub mod ranges;
pub mod sensors;
pub mod service;
pub mod system;

pub use config::{Config, StopRange};
pub use controller::{Action, Controller};
pub use error::{Result, SilentfanError};
pub use sensors::SensorSnapshot;

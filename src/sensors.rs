//! Sensor snapshot acquisition via lm-sensors.
//!
//! The parser follows the block layout of `sensors(1)` text output: `Core N`
//! lines are CPU temperatures, a `pch_skylake` chip header opens a `pch`
//! block whose `tempN` lines belong to it, any line ending in `RPM` is a fan
//! tachometer reading, and a blank line closes the current block.

use std::collections::BTreeMap;
use std::process::Command;

#[cfg(test)]
use mockall::automock;

use crate::error::{Result, SilentfanError};

/// Temperatures grouped by sensor source, plus fan tachometer readings.
/// Produced fresh each poll cycle, never retained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Sensor-group label (e.g. "cpu", "pch") to readings in degrees Celsius.
    pub temps: BTreeMap<String, Vec<f64>>,
    /// Fan speeds in RPM.
    pub fans: Vec<f64>,
}

impl SensorSnapshot {
    /// Highest temperature across all groups; None when the snapshot carries
    /// no temperature readings at all (the "empty snapshot" case).
    pub fn max_temp(&self) -> Option<f64> {
        self.temps
            .values()
            .flatten()
            .copied()
            .fold(None, |acc, t| Some(acc.map_or(t, |m: f64| m.max(t))))
    }

    /// Highest fan reading; 0 when no tachometer was reported (fan off).
    pub fn max_fan_speed(&self) -> f64 {
        self.fans.iter().copied().fold(0.0, f64::max)
    }
}

/// Source of sensor snapshots. Production reads `sensors` output; tests
/// substitute a mock.
#[cfg_attr(test, automock)]
pub trait SensorSource {
    fn read(&self) -> Result<SensorSnapshot>;
}

/// Shells out to `sensors` from the lm_sensors package.
pub struct LmSensors;

impl SensorSource for LmSensors {
    fn read(&self) -> Result<SensorSnapshot> {
        let output = Command::new("sensors")
            .output()
            .map_err(|e| SilentfanError::SensorRead(format!("failed to run sensors: {e}")))?;
        if !output.status.success() {
            return Err(SilentfanError::SensorRead(format!(
                "sensors exited with {}",
                output.status
            )));
        }
        Ok(parse_sensors_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

pub fn parse_sensors_output(text: &str) -> SensorSnapshot {
    let mut snapshot = SensorSnapshot::default();
    let mut chip_group: Option<&str> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            chip_group = None;
        } else if line.starts_with("Core") {
            if let Some(t) = parse_reading(line, 'C') {
                snapshot.temps.entry("cpu".into()).or_default().push(t);
            }
        } else if line.starts_with("pch_skylake") {
            chip_group = Some("pch");
        } else if line.starts_with("temp") {
            if let Some(group) = chip_group {
                if let Some(t) = parse_reading(line, 'C') {
                    snapshot.temps.entry(group.into()).or_default().push(t);
                }
            }
        } else if line.ends_with("RPM") {
            if let Some(rpm) = parse_reading(line, 'R') {
                snapshot.fans.push(rpm);
            }
        }
    }

    snapshot
}

/// Extract the value between the label colon and the unit character, e.g.
/// `Core 0:  +46.0°C  (high = +100.0°C)` with unit 'C' yields 46.0.
fn parse_reading(line: &str, unit: char) -> Option<f64> {
    let rest = line.split_once(':')?.1;
    let value = rest.split(unit).next()?;
    value
        .trim()
        .trim_end_matches('°')
        .trim_start_matches('+')
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
dell_smm-virtual-0
Adapter: Virtual device
Processor Fan: 2688 RPM

coretemp-isa-0000
Adapter: ISA adapter
Package id 0:  +47.0°C  (high = +100.0°C, crit = +100.0°C)
Core 0:        +46.0°C  (high = +100.0°C, crit = +100.0°C)
Core 1:        +47.0°C  (high = +100.0°C, crit = +100.0°C)
Core 2:        +44.0°C  (high = +100.0°C, crit = +100.0°C)
Core 3:        +45.0°C  (high = +100.0°C, crit = +100.0°C)

pch_skylake-virtual-0
Adapter: Virtual device
temp1:         +51.5°C
";

    #[test]
    fn parses_core_lines_into_cpu_group() {
        let snap = parse_sensors_output(SAMPLE);
        assert_eq!(snap.temps["cpu"], vec![46.0, 47.0, 44.0, 45.0]);
    }

    #[test]
    fn parses_pch_block_after_chip_header() {
        let snap = parse_sensors_output(SAMPLE);
        assert_eq!(snap.temps["pch"], vec![51.5]);
    }

    #[test]
    fn parses_fan_rpm_lines() {
        let snap = parse_sensors_output(SAMPLE);
        assert_eq!(snap.fans, vec![2688.0]);
    }

    #[test]
    fn blank_line_closes_chip_block() {
        // temp lines outside any known chip block are ignored
        let text = "pch_skylake-virtual-0\ntemp1: +50.0°C\n\ntemp2: +60.0°C\n";
        let snap = parse_sensors_output(text);
        assert_eq!(snap.temps["pch"], vec![50.0]);
        assert_eq!(snap.max_temp(), Some(50.0));
    }

    #[test]
    fn max_temp_spans_all_groups() {
        let snap = parse_sensors_output(SAMPLE);
        // pch reads hotter than every core
        assert_eq!(snap.max_temp(), Some(51.5));
    }

    #[test]
    fn empty_snapshot_has_no_max_temp() {
        let snap = SensorSnapshot::default();
        assert_eq!(snap.max_temp(), None);
        assert_eq!(snap.max_fan_speed(), 0.0);
    }

    #[test]
    fn missing_fan_readings_mean_fan_off() {
        let snap = parse_sensors_output("Core 0: +46.0°C\n");
        assert_eq!(snap.max_fan_speed(), 0.0);
        assert_eq!(snap.max_temp(), Some(46.0));
    }

    #[test]
    fn parse_reading_handles_units_and_signs() {
        assert_eq!(parse_reading("Core 0:  +46.0°C  (high = +100.0°C)", 'C'), Some(46.0));
        assert_eq!(parse_reading("temp1: -5.0°C", 'C'), Some(-5.0));
        assert_eq!(parse_reading("Processor Fan: 2688 RPM", 'R'), Some(2688.0));
        assert_eq!(parse_reading("no colon here", 'C'), None);
        assert_eq!(parse_reading("temp1: garbage C", 'C'), None);
    }
}

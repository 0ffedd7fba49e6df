//! # Settings Module
//!
//! Search settings that outlive a session: the frequency grid controls, the
//! evaluation method and the false alarm policy. They are stored as pretty
//! printed JSON so the file can be edited by hand.

use crate::false_alarm::FalseAlarmMethod;
use crate::grid::FrequencyGridConfig;
use crate::lomb_scargle::Method;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// File the GUI reads and writes settings to unless told otherwise.
pub const DEFAULT_SETTINGS_PATH: &str = "periodfinder_settings.json";

/// How the false alarm level drawn on the periodogram is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FalseAlarmPolicy {
    /// Level at which a peak has the given false alarm probability.
    Computed {
        probability: f64,
        method: FalseAlarmMethod,
    },
    /// A constant power level.
    Fixed { level: f64 },
}

impl Default for FalseAlarmPolicy {
    fn default() -> Self {
        FalseAlarmPolicy::Computed {
            probability: 0.01,
            method: FalseAlarmMethod::Baluev,
        }
    }
}

/// Everything a user can tune about a periodogram search.
/// This is the object saved to and loaded from the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: FrequencyGridConfig,
    pub method: Method,
    pub false_alarm: FalseAlarmPolicy,
}

/// Saves the settings to a JSON file.
pub fn save(settings: &Settings, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json_string =
        serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(json_string.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Settings saved to {}", path.display());
    Ok(())
}

/// Loads settings from a JSON file. Missing fields take their defaults.
pub fn load(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut data = String::new();
    file.read_to_string(&mut data)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a valid settings file", path.display()))?;
    log::info!("Settings loaded from {}", path.display());
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_survive_a_save_load_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            grid: FrequencyGridConfig {
                min_period: 0.3,
                max_period: 12.0,
                samples_per_peak: 50.0,
                nyquist_factor: 2.0,
            },
            method: Method::Standard,
            false_alarm: FalseAlarmPolicy::Fixed { level: 0.2 },
        };

        save(&settings, &path).unwrap();
        assert_eq!(load(&path).unwrap(), settings);
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "method": "fast" }"#).unwrap();

        let settings = load(&path).unwrap();
        assert_eq!(settings.method, Method::Fast);
        assert_eq!(settings.grid, FrequencyGridConfig::default());
        assert_eq!(settings.false_alarm, FalseAlarmPolicy::default());
    }

    #[test]
    fn malformed_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("not a valid settings file"));
        assert!(load(dir.path().join("missing.json")).is_err());
    }
}

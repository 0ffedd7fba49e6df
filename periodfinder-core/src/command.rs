//! # Command Dispatch Module
//!
//! Every user action reaches the [`DatasetStore`] as a typed [`Command`].
//! Dispatch returns either an [`Outcome`] describing what changed or a
//! [`CommandError`]; both collapse into a one-line [`Status`] for display.
//! No failure is fatal and nothing is retried.

use crate::grid::{ConfigurationError, FrequencyGridConfig};
use crate::lomb_scargle::Method;
use crate::phase::{FoldError, FoldedCurve};
use crate::series::LoadError;
use crate::settings::{FalseAlarmPolicy, Settings};
use crate::store::{ComputeError, DatasetStore};
use std::path::PathBuf;
use thiserror::Error;

/// A single user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadFile(PathBuf),

    // Grid controls
    SetNyquistFactor(f64),
    SetMinPeriod(f64),
    SetMaxPeriod(f64),
    SetSamplesPerPeak(f64),

    SetMethod(Method),
    SetFalseAlarm(FalseAlarmPolicy),
    ApplySettings(Settings),

    PlotData,
    ComputePeriodogram,
    FoldCurve,
    PrintData,
}

/// What a successfully dispatched command changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded { rows: usize },
    SettingsChanged,
    DataReady,
    PeriodogramReady {
        best_period: f64,
        best_power: f64,
        false_alarm_level: f64,
    },
    Folded(FoldedCurve),
    Printed { rows: usize },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("open the data file first!")]
    NoData,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Compute(#[from] ComputeError),
    #[error(transparent)]
    Fold(#[from] FoldError),
    #[error(transparent)]
    Config(#[from] ConfigurationError),
    #[error("could not print the data: {0}")]
    Print(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Error,
}

/// One-line, human-readable report of the last command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }

    pub fn from_result(result: &Result<Outcome, CommandError>) -> Self {
        match result {
            Ok(Outcome::Loaded { rows }) => Status::info(format!("Loaded {rows} samples")),
            Ok(Outcome::PeriodogramReady {
                best_period,
                best_power,
                false_alarm_level,
            }) => {
                let verdict = if best_power > false_alarm_level {
                    "above"
                } else {
                    "below"
                };
                Status::info(format!(
                    "Best period P = {best_period:.4} (power {best_power:.3}, {verdict} the false alarm level)"
                ))
            }
            Ok(Outcome::Folded(curve)) => {
                Status::info(format!("Folded on P = {:.4}", curve.period))
            }
            Ok(Outcome::Printed { rows }) => {
                Status::info(format!("Printed {rows} rows to standard output"))
            }
            Ok(_) => Status::info(""),
            Err(e) => Status::error(format!("Error: {e}")),
        }
    }
}

impl DatasetStore {
    /// Applies one command to the store.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, CommandError> {
        log::info!("Dispatching {command:?}");
        let result = self.apply(command);
        if let Err(e) = &result {
            log::warn!("Command failed: {e}");
        }
        result
    }

    fn apply(&mut self, command: Command) -> Result<Outcome, CommandError> {
        match command {
            Command::LoadFile(path) => {
                let rows = self.load(&path)?.len();
                Ok(Outcome::Loaded { rows })
            }
            Command::SetNyquistFactor(value) => self.update_grid(|g| g.nyquist_factor = value),
            Command::SetMinPeriod(value) => self.update_grid(|g| g.min_period = value),
            Command::SetMaxPeriod(value) => self.update_grid(|g| g.max_period = value),
            Command::SetSamplesPerPeak(value) => self.update_grid(|g| g.samples_per_peak = value),
            Command::SetMethod(method) => {
                let settings = Settings {
                    method,
                    ..*self.settings()
                };
                self.apply_settings(settings);
                Ok(Outcome::SettingsChanged)
            }
            Command::SetFalseAlarm(false_alarm) => {
                let settings = Settings {
                    false_alarm,
                    ..*self.settings()
                };
                self.apply_settings(settings);
                Ok(Outcome::SettingsChanged)
            }
            Command::ApplySettings(settings) => {
                self.apply_settings(settings);
                settings.grid.validate()?;
                Ok(Outcome::SettingsChanged)
            }
            Command::PlotData => {
                if self.series().is_empty() {
                    return Err(CommandError::NoData);
                }
                Ok(Outcome::DataReady)
            }
            Command::ComputePeriodogram => {
                let result = self.compute_periodogram()?;
                Ok(Outcome::PeriodogramReady {
                    best_period: result.best_period(),
                    best_power: result.best_power,
                    false_alarm_level: result.false_alarm_level,
                })
            }
            Command::FoldCurve => Ok(Outcome::Folded(self.fold()?)),
            Command::PrintData => {
                if self.series().is_empty() {
                    return Err(CommandError::NoData);
                }
                self.series().write_table(std::io::stdout().lock())?;
                log::info!("Printed {} rows to standard output", self.series().len());
                Ok(Outcome::Printed {
                    rows: self.series().len(),
                })
            }
        }
    }

    /// Stores the edited grid even when it is invalid, so the controls keep
    /// what the user picked, but reports the problem right away.
    fn update_grid(
        &mut self,
        edit: impl FnOnce(&mut FrequencyGridConfig),
    ) -> Result<Outcome, CommandError> {
        let mut grid = *self.grid_config();
        edit(&mut grid);
        self.set_grid_config(grid);
        grid.validate()?;
        Ok(Outcome::SettingsChanged)
    }
}

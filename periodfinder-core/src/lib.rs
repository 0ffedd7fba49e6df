// periodfinder-core/src/lib.rs

//! The core logic for the Lomb-Scargle period finder.
//! This crate is responsible for loading time series, building frequency
//! grids, evaluating periodograms and folding data on the best period.
//! It is completely headless and contains no GUI code.

pub mod command;
pub mod false_alarm;
pub mod fft;
pub mod grid;
pub mod lomb_scargle;
pub mod phase;
pub mod series;
pub mod settings;
pub mod store;

pub use command::{Command, CommandError, Outcome, Status, StatusLevel};
pub use false_alarm::FalseAlarmMethod;
pub use grid::{ConfigurationError, FrequencyGrid, FrequencyGridConfig, GridParameters};
pub use lomb_scargle::{LombScargle, Method, Observations, PeriodogramEvaluator, Spectrum};
pub use phase::{FoldError, FoldedCurve, PhaseFoldedPoint};
pub use series::{LoadError, Sample, Series};
pub use settings::{FalseAlarmPolicy, Settings};
pub use store::{ComputeError, DatasetStore, PeriodogramResult};

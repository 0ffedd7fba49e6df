//! # Dataset Store Module
//!
//! Owns the currently loaded series, the search settings and the most
//! recent periodogram. Any change to the series or settings invalidates the
//! periodogram, so a stored result always describes the current inputs.

use crate::false_alarm::FalseAlarmMethod;
use crate::grid::{ConfigurationError, FrequencyGridConfig};
use crate::lomb_scargle::{LombScargle, Observations, PeriodogramEvaluator};
use crate::phase::{self, FoldError, FoldedCurve};
use crate::series::{self, LoadError, Series};
use crate::settings::{FalseAlarmPolicy, Settings};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while computing a periodogram.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error("open the data file first!")]
    NoData,
    #[error("invalid frequency grid: {0}")]
    InvalidConfig(#[from] ConfigurationError),
    #[error("at least {required} samples are needed, the data file has {count}")]
    TooFewSamples { count: usize, required: usize },
    #[error("sample {index} has error {error}; errors must be positive")]
    InvalidUncertainty { index: usize, error: f64 },
    #[error("all samples share one time, the frequency grid is undefined")]
    ZeroBaseline,
    #[error("frequency grid of {len} points exceeds {max}; raise the minimum period or lower samples per peak")]
    GridTooLarge { len: usize, max: usize },
    #[error("observation arrays differ in length: {times} times, {values} values, {errors} errors")]
    LengthMismatch {
        times: usize,
        values: usize,
        errors: usize,
    },
    #[error("the periodogram has no finite power to search")]
    EmptySpectrum,
}

/// Outcome of one periodogram search.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodogramResult {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
    pub best_frequency: f64,
    pub best_power: f64,
    /// Power a peak must exceed to count as significant.
    pub false_alarm_level: f64,
    /// False alarm probability of the highest peak.
    pub peak_false_alarm_probability: f64,
}

impl PeriodogramResult {
    pub fn best_period(&self) -> f64 {
        1.0 / self.best_frequency
    }

    pub fn periods(&self) -> Vec<f64> {
        self.frequencies.iter().map(|f| 1.0 / f).collect()
    }

    pub fn is_significant(&self) -> bool {
        self.best_power > self.false_alarm_level
    }
}

/// Runs a periodogram search over `series` with any evaluator.
///
/// Times are shifted to start at zero before evaluation.
pub fn compute_periodogram<E: PeriodogramEvaluator>(
    evaluator: &E,
    series: &Series,
    config: &FrequencyGridConfig,
    policy: &FalseAlarmPolicy,
) -> Result<PeriodogramResult, ComputeError> {
    if series.is_empty() {
        return Err(ComputeError::NoData);
    }
    let params = config.parameters()?;

    let (t, y, dy) = (series.shifted_times(), series.values(), series.errors());
    let obs = Observations::new(&t, &y, &dy)?;
    let spectrum = evaluator.autopower(&obs, &params)?;

    let (best_frequency, best_power) = spectrum
        .peak()
        .and_then(|(best, power)| Some((*spectrum.frequencies.get(best)?, power)))
        .ok_or(ComputeError::EmptySpectrum)?;
    let fmax = spectrum
        .frequencies
        .last()
        .copied()
        .unwrap_or(params.maximum_frequency);

    let (false_alarm_level, method) = match *policy {
        FalseAlarmPolicy::Computed {
            probability,
            method,
        } => (
            evaluator.false_alarm_level(&obs, fmax, probability, method),
            method,
        ),
        FalseAlarmPolicy::Fixed { level } => (level, FalseAlarmMethod::default()),
    };
    let peak_false_alarm_probability =
        evaluator.false_alarm_probability(&obs, fmax, best_power, method);

    log::info!(
        "Periodogram: {} frequencies, best P = {:.6} (power {:.4}, FAP {:.3e}, level {:.4})",
        spectrum.frequencies.len(),
        1.0 / best_frequency,
        best_power,
        peak_false_alarm_probability,
        false_alarm_level
    );

    Ok(PeriodogramResult {
        frequencies: spectrum.frequencies,
        power: spectrum.power,
        best_frequency,
        best_power,
        false_alarm_level,
        peak_false_alarm_probability,
    })
}

/// The single owner of the loaded data and the latest periodogram.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    series: Series,
    source: Option<PathBuf>,
    settings: Settings,
    result: Option<PeriodogramResult>,
}

impl DatasetStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Replaces the current series with the contents of `path`.
    ///
    /// On failure the previous series is kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&Series, LoadError> {
        let path = path.as_ref();
        let series = series::load(path)?;
        self.source = Some(path.to_path_buf());
        self.replace_series(series);
        Ok(&self.series)
    }

    pub fn replace_series(&mut self, series: Series) {
        self.series = series;
        self.invalidate("series replaced");
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Path of the file the current series came from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid_config(&self) -> &FrequencyGridConfig {
        &self.settings.grid
    }

    pub fn set_grid_config(&mut self, grid: FrequencyGridConfig) {
        if self.settings.grid != grid {
            self.settings.grid = grid;
            self.invalidate("grid changed");
        }
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        if self.settings != settings {
            self.settings = settings;
            self.invalidate("settings changed");
        }
    }

    pub fn result(&self) -> Option<&PeriodogramResult> {
        self.result.as_ref()
    }

    /// Computes and stores the periodogram of the current series.
    pub fn compute_periodogram(&mut self) -> Result<&PeriodogramResult, ComputeError> {
        let evaluator = LombScargle::new(self.settings.method);
        let result = compute_periodogram(
            &evaluator,
            &self.series,
            &self.settings.grid,
            &self.settings.false_alarm,
        )?;
        Ok(self.result.insert(result))
    }

    pub fn best_period(&self) -> Option<f64> {
        self.result.as_ref().map(PeriodogramResult::best_period)
    }

    /// Folds the current series on the best period found so far.
    pub fn fold(&self) -> Result<FoldedCurve, FoldError> {
        if self.series.is_empty() {
            return Err(FoldError::NoData);
        }
        let period = self.best_period().ok_or(FoldError::PeriodUnavailable)?;
        phase::fold(&self.series, period)
    }

    fn invalidate(&mut self, reason: &str) {
        if self.result.take().is_some() {
            log::debug!("Periodogram invalidated: {reason}");
        }
    }
}

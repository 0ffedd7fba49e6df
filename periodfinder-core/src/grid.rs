//! # Frequency Grid Module
//!
//! Translates the period controls a user sees into the frequency-domain
//! parameters the periodogram evaluator scans, and materialises the regular
//! frequency grid itself.
//!
//! ## Grid Rule
//! - Resolution: `df = 1 / (baseline * samples_per_peak)`
//! - Bounds: `1 / max_period ..= 1 / min_period`
//! - Length: `1 + round((f_max - f_min) / df)`

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the number of frequencies evaluated in one periodogram.
pub const MAX_GRID_LEN: usize = 2_000_000;

/// Rejected grid controls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("minimum period ({min_period}) must be smaller than maximum period ({max_period})")]
    EmptyPeriodRange { min_period: f64, max_period: f64 },
}

/// User-facing controls for the frequency grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyGridConfig {
    pub min_period: f64,
    pub max_period: f64,
    pub samples_per_peak: f64,
    pub nyquist_factor: f64,
}

impl Default for FrequencyGridConfig {
    fn default() -> Self {
        Self {
            min_period: 1.0,
            max_period: 200.0,
            samples_per_peak: 100.0,
            nyquist_factor: 5.0,
        }
    }
}

/// Frequency-domain parameters consumed by the periodogram evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParameters {
    pub minimum_frequency: f64,
    pub maximum_frequency: f64,
    pub samples_per_peak: f64,
    pub nyquist_factor: f64,
}

impl FrequencyGridConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        positive("minimum period", self.min_period)?;
        positive("maximum period", self.max_period)?;
        positive("samples per peak", self.samples_per_peak)?;
        positive("nyquist factor", self.nyquist_factor)?;
        if self.min_period >= self.max_period {
            return Err(ConfigurationError::EmptyPeriodRange {
                min_period: self.min_period,
                max_period: self.max_period,
            });
        }
        Ok(())
    }

    /// Converts period bounds into frequency bounds.
    pub fn parameters(&self) -> Result<GridParameters, ConfigurationError> {
        self.validate()?;
        Ok(GridParameters {
            minimum_frequency: 1.0 / self.max_period,
            maximum_frequency: 1.0 / self.min_period,
            samples_per_peak: self.samples_per_peak,
            nyquist_factor: self.nyquist_factor,
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NotPositive { name, value })
    }
}

/// A regular frequency grid `f0 + k * df` for `k in 0..len`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyGrid {
    pub f0: f64,
    pub df: f64,
    pub len: usize,
}

impl GridParameters {
    /// Number of frequencies the grid would hold for a data baseline.
    ///
    /// Returns `None` when the baseline cannot define a resolution. Counts
    /// beyond [`MAX_GRID_LEN`] saturate at `usize::MAX` instead of wrapping.
    pub fn grid_len(&self, baseline: f64) -> Option<usize> {
        if !(baseline.is_finite() && baseline > 0.0) {
            return None;
        }
        let df = 1.0 / (baseline * self.samples_per_peak);
        let len = ((self.maximum_frequency - self.minimum_frequency) / df).round().max(0.0) + 1.0;
        if len.is_nan() || len > MAX_GRID_LEN as f64 {
            return Some(usize::MAX);
        }
        Some(len as usize)
    }

    /// Builds the grid scanned for a series spanning `baseline` time units.
    ///
    /// Returns `None` for a degenerate baseline or a grid longer than
    /// [`MAX_GRID_LEN`].
    pub fn grid(&self, baseline: f64) -> Option<FrequencyGrid> {
        let len = self.grid_len(baseline).filter(|&len| len <= MAX_GRID_LEN)?;
        Some(FrequencyGrid {
            f0: self.minimum_frequency,
            df: 1.0 / (baseline * self.samples_per_peak),
            len,
        })
    }
}

impl FrequencyGrid {
    pub fn frequency(&self, k: usize) -> f64 {
        self.f0 + self.df * k as f64
    }

    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.len).map(|k| self.frequency(k)).collect()
    }

    pub fn max_frequency(&self) -> f64 {
        self.frequency(self.len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_map_to_reciprocal_frequencies() {
        let config = FrequencyGridConfig {
            min_period: 0.5,
            max_period: 40.0,
            samples_per_peak: 20.0,
            nyquist_factor: 3.0,
        };
        let params = config.parameters().unwrap();
        assert_eq!(params.minimum_frequency, 1.0 / 40.0);
        assert_eq!(params.maximum_frequency, 2.0);
        assert_eq!(params.samples_per_peak, 20.0);
        assert_eq!(params.nyquist_factor, 3.0);
    }

    #[test]
    fn default_matches_initial_controls() {
        let params = FrequencyGridConfig::default().parameters().unwrap();
        assert!((params.minimum_frequency - 0.005).abs() < 1e-15);
        assert_eq!(params.maximum_frequency, 1.0);
    }

    #[test]
    fn rejects_inverted_or_equal_periods() {
        for (min_period, max_period) in [(10.0, 10.0), (20.0, 10.0)] {
            let config = FrequencyGridConfig {
                min_period,
                max_period,
                ..FrequencyGridConfig::default()
            };
            assert!(matches!(
                config.parameters(),
                Err(ConfigurationError::EmptyPeriodRange { .. })
            ));
        }
    }

    #[test]
    fn rejects_non_positive_controls() {
        let bad = [
            FrequencyGridConfig { min_period: 0.0, ..Default::default() },
            FrequencyGridConfig { max_period: -5.0, ..Default::default() },
            FrequencyGridConfig { samples_per_peak: 0.0, ..Default::default() },
            FrequencyGridConfig { nyquist_factor: f64::NAN, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(
                config.validate(),
                Err(ConfigurationError::NotPositive { .. })
            ));
        }
    }

    #[test]
    fn grid_follows_baseline_and_oversampling() {
        let params = GridParameters {
            minimum_frequency: 0.1,
            maximum_frequency: 1.1,
            samples_per_peak: 10.0,
            nyquist_factor: 5.0,
        };
        let grid = params.grid(10.0).unwrap();
        assert_eq!(grid.df, 0.01);
        assert_eq!(grid.len, 101);
        assert!((grid.max_frequency() - 1.1).abs() < 1e-12);
        assert_eq!(grid.frequencies().len(), grid.len);
        assert_eq!(params.grid(0.0), None);
    }

    #[test]
    fn huge_baselines_saturate_instead_of_overflowing() {
        let params = FrequencyGridConfig::default().parameters().unwrap();
        // Two billion billion days at 100 samples per peak needs ~2e20 steps.
        assert_eq!(params.grid_len(2e18), Some(usize::MAX));
        assert_eq!(params.grid(2e18), None);

        let just_over = (MAX_GRID_LEN as f64 + 10.0) / (0.995 * 100.0);
        assert!(params.grid_len(just_over).unwrap() > MAX_GRID_LEN);
        assert_eq!(params.grid(just_over), None);
    }
}

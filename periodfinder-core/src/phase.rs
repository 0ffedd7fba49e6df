//! # Phase Folding Module
//!
//! Maps absolute observation times onto a repeating cycle of a trial period.

use crate::series::Series;
use thiserror::Error;

/// Errors raised when folding a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FoldError {
    #[error("open the data file first!")]
    NoData,
    #[error("calculate periodogram first!")]
    PeriodUnavailable,
}

/// One observation placed on the folded cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseFoldedPoint {
    pub phase: f64,
    pub value: f64,
    pub error: f64,
}

/// Returns the fractional phase of `t` for epoch `t0` and period `period`.
///
/// The result always lies in `[0, 1)`, including for `t < t0`: the cycle
/// count is floored rather than truncated toward zero.
pub fn phase(t: f64, t0: f64, period: f64) -> Result<f64, FoldError> {
    if !(period.is_finite() && period > 0.0) {
        return Err(FoldError::PeriodUnavailable);
    }

    let cycles = ((t - t0) / period).floor();
    let fi = (t - (t0 + cycles * period)) / period;

    // Rounding can land exactly on the upper edge or a hair below zero.
    Ok(if fi >= 1.0 {
        fi - 1.0
    } else if fi < 0.0 {
        0.0
    } else {
        fi
    })
}

/// A series folded on a single period.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldedCurve {
    pub period: f64,
    pub epoch: f64,
    pub points: Vec<PhaseFoldedPoint>,
}

impl FoldedCurve {
    /// Repeats the folded points over `cycles` consecutive cycles so that
    /// structure near phase 0/1 is visually continuous.
    pub fn cycles(&self, cycles: usize) -> impl Iterator<Item = PhaseFoldedPoint> + '_ {
        (0..cycles).flat_map(move |k| {
            self.points.iter().map(move |p| PhaseFoldedPoint {
                phase: p.phase + k as f64,
                ..*p
            })
        })
    }
}

/// Folds `series` on `period`.
///
/// Times are shifted by the earliest observation and the epoch is the first
/// sample's shifted time, so the first row in the file sits at phase zero.
pub fn fold(series: &Series, period: f64) -> Result<FoldedCurve, FoldError> {
    if series.is_empty() {
        return Err(FoldError::NoData);
    }

    let shifted = series.shifted_times();
    let epoch = shifted[0];
    let points = shifted
        .iter()
        .zip(series.samples())
        .map(|(&t, sample)| {
            Ok(PhaseFoldedPoint {
                phase: phase(t, epoch, period)?,
                value: sample.value,
                error: sample.error,
            })
        })
        .collect::<Result<Vec<_>, FoldError>>()?;

    log::debug!("Folded {} samples on P = {period}", points.len());
    Ok(FoldedCurve {
        period,
        epoch,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Sample;

    fn series(rows: &[(f64, f64, f64)]) -> Series {
        rows.iter()
            .map(|&(time, value, error)| Sample { time, value, error })
            .collect()
    }

    #[test]
    fn phase_stays_in_unit_interval() {
        let periods = [0.3, 1.0, 2.5, 17.0, 365.25];
        let epochs = [-100.0, 0.0, 3.7, 2450000.5];
        for &p in &periods {
            for &t0 in &epochs {
                for i in -500..500 {
                    let t = t0 + i as f64 * 0.137;
                    let fi = phase(t, t0, p).unwrap();
                    assert!((0.0..1.0).contains(&fi), "phase({t}, {t0}, {p}) = {fi}");
                }
            }
        }
    }

    #[test]
    fn epoch_is_phase_zero() {
        for &(t0, p) in &[(0.0, 1.0), (-3.5, 0.7), (2450000.5, 12.3)] {
            assert_eq!(phase(t0, t0, p).unwrap(), 0.0);
        }
    }

    #[test]
    fn phase_is_periodic() {
        let (t0, p) = (1.25, 3.0);
        for i in -20..20 {
            let t = i as f64 * 0.61;
            let a = phase(t, t0, p).unwrap();
            let b = phase(t + p, t0, p).unwrap();
            let diff = (a - b).abs();
            assert!(diff < 1e-9 || (1.0 - diff) < 1e-9, "t = {t}: {a} vs {b}");
        }
    }

    #[test]
    fn times_before_epoch_are_floored() {
        // Truncation toward zero would give -0.25 here.
        let fi = phase(-0.5, 0.0, 2.0).unwrap();
        assert!((fi - 0.75).abs() < 1e-12);
    }

    #[test]
    fn rejects_unusable_periods() {
        for p in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(phase(1.0, 0.0, p), Err(FoldError::PeriodUnavailable));
        }
    }

    #[test]
    fn folds_three_rows_on_period_two() {
        let data = series(&[(0.0, 1.0, 0.1), (1.0, 2.0, 0.1), (2.0, 1.0, 0.1)]);
        let curve = fold(&data, 2.0).unwrap();
        let phases: Vec<f64> = curve.points.iter().map(|p| p.phase).collect();
        assert_eq!(phases, vec![0.0, 0.5, 0.0]);
        assert_eq!(curve.epoch, 0.0);
    }

    #[test]
    fn epoch_is_first_row_not_earliest_time() {
        let data = series(&[(3.0, 1.0, 0.1), (1.0, 2.0, 0.1), (4.0, 1.0, 0.1)]);
        let curve = fold(&data, 2.0).unwrap();
        assert_eq!(curve.epoch, 2.0);
        let phases: Vec<f64> = curve.points.iter().map(|p| p.phase).collect();
        assert_eq!(phases, vec![0.0, 0.0, 0.5]);
    }

    #[test]
    fn two_cycles_duplicate_points() {
        let data = series(&[(0.0, 1.0, 0.1), (1.0, 2.0, 0.2)]);
        let curve = fold(&data, 4.0).unwrap();
        let doubled: Vec<_> = curve.cycles(2).collect();
        assert_eq!(doubled.len(), 4);
        assert_eq!(doubled[2].phase, 1.0);
        assert_eq!(doubled[3].phase, 1.25);
        assert_eq!(doubled[3].error, 0.2);
    }

    #[test]
    fn empty_series_has_no_data() {
        assert_eq!(fold(&Series::default(), 1.0), Err(FoldError::NoData));
    }
}

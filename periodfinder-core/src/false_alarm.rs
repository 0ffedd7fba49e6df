//! # False Alarm Module
//!
//! Analytic false alarm probabilities for peaks of a floating-mean,
//! standard-normalised Lomb-Scargle periodogram.
//!
//! The single-frequency tail is `(1 - z)^((N - 3) / 2)`. The multi-frequency
//! corrections account for the number of effectively independent
//! frequencies searched up to `fmax`:
//! - Naive: `N_eff = fmax * baseline` independent trials
//! - Davies: upper bound `P_single + tau`
//! - Baluev (2008): `1 - (1 - P_single) * exp(-tau)`

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Parameters fitted by the null model (the mean).
const NULL_PARAMS: f64 = 1.0;
/// Parameters fitted by the alternative model (mean + sine + cosine).
const MODEL_PARAMS: f64 = 3.0;

const BISECTION_STEPS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalseAlarmMethod {
    #[default]
    Baluev,
    Davies,
    Naive,
    /// Single-frequency probability, no correction for the grid search.
    Single,
}

impl FalseAlarmMethod {
    pub const ALL: [FalseAlarmMethod; 4] = [
        FalseAlarmMethod::Baluev,
        FalseAlarmMethod::Davies,
        FalseAlarmMethod::Naive,
        FalseAlarmMethod::Single,
    ];
}

impl std::fmt::Display for FalseAlarmMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FalseAlarmMethod::Baluev => "Baluev",
            FalseAlarmMethod::Davies => "Davies",
            FalseAlarmMethod::Naive => "Naive",
            FalseAlarmMethod::Single => "Single frequency",
        };
        f.write_str(name)
    }
}

/// Single-frequency false alarm probability of normalised power `z`.
pub fn single(z: f64, n: usize) -> f64 {
    let z = z.clamp(0.0, 1.0);
    let nk = n as f64 - MODEL_PARAMS;
    (1.0 - z).powf(0.5 * nk)
}

/// False alarm probability of a peak with normalised power `z`.
///
/// # Arguments
/// * `z` - Peak power in `[0, 1]`
/// * `fmax` - Highest frequency searched
/// * `t` - Observation times
/// * `w` - Normalised observation weights
/// * `method` - Multi-frequency correction
pub fn probability(z: f64, fmax: f64, t: &[f64], w: &[f64], method: FalseAlarmMethod) -> f64 {
    let n = t.len();
    let p_single = single(z, n);
    let fap = match method {
        FalseAlarmMethod::Single => p_single,
        FalseAlarmMethod::Naive => {
            let n_eff = fmax * baseline(t);
            if n_eff <= 0.0 || p_single >= 1.0 {
                p_single
            } else {
                -(n_eff * (-p_single).ln_1p()).exp_m1()
            }
        }
        FalseAlarmMethod::Davies => p_single + tau_davies(z, fmax, t, w),
        FalseAlarmMethod::Baluev => {
            1.0 - (1.0 - p_single) * (-tau_davies(z, fmax, t, w)).exp()
        }
    };
    if fap.is_nan() { 1.0 } else { fap.clamp(0.0, 1.0) }
}

/// Power level at which the false alarm probability equals `p`.
///
/// The probability falls from one at `z = 0` to zero at `z = 1`, so the
/// level is found by bisection on the unit interval.
pub fn level(p: f64, fmax: f64, t: &[f64], w: &[f64], method: FalseAlarmMethod) -> f64 {
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if probability(mid, fmax, t, w, method) > p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Expected number of upcrossings of level `z` over `(0, fmax]` (Davies 1977).
fn tau_davies(z: f64, fmax: f64, t: &[f64], w: &[f64]) -> f64 {
    let z = z.clamp(0.0, 1.0);
    let n = t.len() as f64;
    let nh = n - NULL_PARAMS;
    let nk = n - MODEL_PARAMS;
    let effective_baseline = (4.0 * PI * weighted_variance(t, w)).sqrt();
    let width = fmax * effective_baseline;
    gamma_ratio(nh) * width * (1.0 - z).powf(0.5 * (nk - 1.0)) * (0.5 * nh * z).sqrt()
}

/// `sqrt(2 / n) * Γ(n / 2) / Γ((n - 1) / 2)`
fn gamma_ratio(n: f64) -> f64 {
    (2.0 / n).sqrt() * (ln_gamma(0.5 * n) - ln_gamma(0.5 * (n - 1.0))).exp()
}

fn weighted_variance(t: &[f64], w: &[f64]) -> f64 {
    let mean: f64 = t.iter().zip(w).map(|(t, w)| t * w).sum();
    t.iter().zip(w).map(|(t, w)| w * (t - mean).powi(2)).sum()
}

fn baseline(t: &[f64]) -> f64 {
    let min = t.iter().copied().fold(f64::INFINITY, f64::min);
    let max = t.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min.is_finite() { max - min } else { 0.0 }
}

/// Natural log of the gamma function (Lanczos, g = 7).
pub fn ln_gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula.
        return (PI / (PI * x).sin().abs()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let t = x + G + 0.5;
    let series = COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize) -> (Vec<f64>, Vec<f64>) {
        let t: Vec<f64> = (0..n).map(|i| i as f64 * 1.3 + (i as f64).sqrt()).collect();
        let w = vec![1.0 / n as f64; n];
        (t, w)
    }

    #[test]
    fn ln_gamma_matches_known_values() {
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!(ln_gamma(2.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
        assert!((ln_gamma(100.0) - 359.134_205_369_575_4).abs() < 1e-8);
    }

    #[test]
    fn single_tail_bounds() {
        assert_eq!(single(0.0, 50), 1.0);
        assert_eq!(single(1.0, 50), 0.0);
        assert!((single(0.5, 7) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn probability_decreases_with_power() {
        let (t, w) = uniform(60);
        for method in [
            FalseAlarmMethod::Baluev,
            FalseAlarmMethod::Davies,
            FalseAlarmMethod::Naive,
            FalseAlarmMethod::Single,
        ] {
            let mut previous = 1.0;
            for i in 1..40 {
                let z = 0.1 + i as f64 * 0.02;
                let p = probability(z, 2.0, &t, &w, method);
                assert!((0.0..=1.0).contains(&p));
                assert!(p <= previous + 1e-12, "{method:?} at z = {z}");
                previous = p;
            }
        }
    }

    #[test]
    fn corrections_are_more_conservative_than_single() {
        let (t, w) = uniform(80);
        let z = 0.3;
        let single = probability(z, 1.0, &t, &w, FalseAlarmMethod::Single);
        let baluev = probability(z, 1.0, &t, &w, FalseAlarmMethod::Baluev);
        let davies = probability(z, 1.0, &t, &w, FalseAlarmMethod::Davies);
        assert!(baluev >= single);
        assert!(davies >= baluev);
    }

    #[test]
    fn level_inverts_probability() {
        let (t, w) = uniform(100);
        for method in [FalseAlarmMethod::Baluev, FalseAlarmMethod::Naive] {
            for p in [0.001, 0.01, 0.1] {
                let z = level(p, 1.0, &t, &w, method);
                assert!(z > 0.0 && z < 1.0);
                let back = probability(z, 1.0, &t, &w, method);
                assert!((back - p).abs() < 1e-6, "{method:?}: p = {p}, got {back}");
            }
        }
    }
}

//! # Lomb-Scargle Module
//!
//! Generalised (floating-mean, error-weighted) Lomb-Scargle periodogram for
//! unevenly sampled data, with "standard" normalisation so that power lies
//! in `[0, 1]`.
//!
//! ## Methods
//! - `Standard`: direct evaluation of the trigonometric sums, O(N * Nf)
//! - `Fast`: Press & Rybicki sums through [`crate::fft::trig_sum`], O(N + Nf log Nf)
//! - `Auto`: `Fast` for grids longer than [`FAST_GRID_THRESHOLD`]

use crate::false_alarm::{self, FalseAlarmMethod};
use crate::fft::trig_sum;
use crate::grid::{FrequencyGrid, GridParameters, MAX_GRID_LEN};
use crate::store::ComputeError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Grid length above which `Method::Auto` switches to the FFT method.
pub const FAST_GRID_THRESHOLD: usize = 200;

/// Minimum number of samples for a floating-mean fit.
pub const MIN_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[default]
    Auto,
    Standard,
    Fast,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Auto, Method::Standard, Method::Fast];
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::Auto => "Auto",
            Method::Standard => "Standard",
            Method::Fast => "Fast (FFT)",
        };
        f.write_str(name)
    }
}

/// Borrowed, validated observation arrays.
#[derive(Debug, Clone, Copy)]
pub struct Observations<'a> {
    t: &'a [f64],
    y: &'a [f64],
    dy: &'a [f64],
}

impl<'a> Observations<'a> {
    pub fn new(t: &'a [f64], y: &'a [f64], dy: &'a [f64]) -> Result<Self, ComputeError> {
        if t.len() != y.len() || t.len() != dy.len() {
            return Err(ComputeError::LengthMismatch {
                times: t.len(),
                values: y.len(),
                errors: dy.len(),
            });
        }
        if t.is_empty() {
            return Err(ComputeError::NoData);
        }
        if t.len() < MIN_SAMPLES {
            return Err(ComputeError::TooFewSamples {
                count: t.len(),
                required: MIN_SAMPLES,
            });
        }
        if let Some((index, &error)) = dy
            .iter()
            .enumerate()
            .find(|(_, e)| !(e.is_finite() && **e > 0.0))
        {
            return Err(ComputeError::InvalidUncertainty { index, error });
        }
        Ok(Self { t, y, dy })
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        self.t
    }

    pub fn baseline(&self) -> f64 {
        let min = self.t.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.t.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        max - min
    }

    /// Inverse-variance weights normalised to sum to one.
    pub fn weights(&self) -> Vec<f64> {
        let raw: Vec<f64> = self.dy.iter().map(|e| 1.0 / (e * e)).collect();
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|w| w / total).collect()
    }

    /// Values minus their weighted mean.
    fn centered_values(&self, w: &[f64]) -> Vec<f64> {
        let mean: f64 = w.iter().zip(self.y).map(|(w, y)| w * y).sum();
        self.y.iter().map(|y| y - mean).collect()
    }
}

/// Power spectrum over a frequency grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
}

impl Spectrum {
    /// Index and value of the highest finite power, first one on ties.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.power
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .fold(None, |best, (i, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
    }
}

/// Seam between the dataset store and whatever computes the periodogram.
pub trait PeriodogramEvaluator {
    /// Evaluates power over the grid implied by `params` and the data baseline.
    fn autopower(
        &self,
        obs: &Observations<'_>,
        params: &GridParameters,
    ) -> Result<Spectrum, ComputeError>;

    /// Probability that noise alone produces a peak at least as high as `power`.
    fn false_alarm_probability(
        &self,
        obs: &Observations<'_>,
        max_frequency: f64,
        power: f64,
        method: FalseAlarmMethod,
    ) -> f64;

    /// Power level whose false alarm probability equals `probability`.
    fn false_alarm_level(
        &self,
        obs: &Observations<'_>,
        max_frequency: f64,
        probability: f64,
        method: FalseAlarmMethod,
    ) -> f64;
}

/// The built-in Lomb-Scargle evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LombScargle {
    pub method: Method,
}

impl LombScargle {
    pub fn new(method: Method) -> Self {
        Self { method }
    }

    /// Evaluates power on an explicit grid.
    pub fn power(&self, obs: &Observations<'_>, grid: &FrequencyGrid) -> Vec<f64> {
        let w = obs.weights();
        let y = obs.centered_values(&w);
        let yy: f64 = w.iter().zip(&y).map(|(w, y)| w * y * y).sum();
        let scale: f64 = w.iter().zip(obs.y).map(|(w, y)| w * y * y).sum();
        if yy <= f64::EPSILON * scale {
            log::warn!("Constant data: periodogram power is identically zero");
            return vec![0.0; grid.len];
        }

        let use_fast = match self.method {
            Method::Fast => true,
            Method::Standard => false,
            Method::Auto => grid.len > FAST_GRID_THRESHOLD,
        };
        log::debug!(
            "Lomb-Scargle over {} frequencies, {} samples ({})",
            grid.len,
            obs.len(),
            if use_fast { "fast" } else { "standard" }
        );

        let mut power = if use_fast {
            fast_power(obs.t, &y, &w, grid)
        } else {
            (0..grid.len)
                .map(|k| standard_power(obs.t, &y, &w, grid.frequency(k)))
                .collect()
        };
        for p in power.iter_mut() {
            *p /= yy;
        }
        power
    }
}

impl PeriodogramEvaluator for LombScargle {
    fn autopower(
        &self,
        obs: &Observations<'_>,
        params: &GridParameters,
    ) -> Result<Spectrum, ComputeError> {
        let baseline = obs.baseline();
        let len = params.grid_len(baseline).ok_or(ComputeError::ZeroBaseline)?;
        if len > MAX_GRID_LEN {
            return Err(ComputeError::GridTooLarge {
                len,
                max: MAX_GRID_LEN,
            });
        }
        let grid = params.grid(baseline).ok_or(ComputeError::ZeroBaseline)?;

        Ok(Spectrum {
            frequencies: grid.frequencies(),
            power: self.power(obs, &grid),
        })
    }

    fn false_alarm_probability(
        &self,
        obs: &Observations<'_>,
        max_frequency: f64,
        power: f64,
        method: FalseAlarmMethod,
    ) -> f64 {
        false_alarm::probability(power, max_frequency, obs.times(), &obs.weights(), method)
    }

    fn false_alarm_level(
        &self,
        obs: &Observations<'_>,
        max_frequency: f64,
        probability: f64,
        method: FalseAlarmMethod,
    ) -> f64 {
        false_alarm::level(probability, max_frequency, obs.times(), &obs.weights(), method)
    }
}

/// Unnormalised power at one frequency, evaluated directly.
///
/// `y` must already be centred on its weighted mean and `w` must sum to one.
fn standard_power(t: &[f64], y: &[f64], w: &[f64], frequency: f64) -> f64 {
    let omega = 2.0 * PI * frequency;

    let (mut s, mut c, mut s2, mut c2) = (0.0, 0.0, 0.0, 0.0);
    for (&ti, &wi) in t.iter().zip(w) {
        let (sin, cos) = (omega * ti).sin_cos();
        s += wi * sin;
        c += wi * cos;
        s2 += wi * 2.0 * sin * cos;
        c2 += wi * (1.0 - 2.0 * sin * sin);
    }
    s2 -= 2.0 * s * c;
    c2 -= c * c - s * s;
    let omega_tau = 0.5 * s2.atan2(c2);

    let (mut yc, mut ys, mut cc, mut ss, mut ct, mut st, mut ymean) =
        (0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for ((&ti, &yi), &wi) in t.iter().zip(y).zip(w) {
        let (sin, cos) = (omega * ti - omega_tau).sin_cos();
        yc += wi * yi * cos;
        ys += wi * yi * sin;
        cc += wi * cos * cos;
        ss += wi * sin * sin;
        ct += wi * cos;
        st += wi * sin;
        ymean += wi * yi;
    }
    yc -= ymean * ct;
    ys -= ymean * st;
    cc -= ct * ct;
    ss -= st * st;

    ratio(yc * yc, cc) + ratio(ys * ys, ss)
}

/// Unnormalised power over a whole regular grid using FFT trig sums.
fn fast_power(t: &[f64], y: &[f64], w: &[f64], grid: &FrequencyGrid) -> Vec<f64> {
    let wy: Vec<f64> = w.iter().zip(y).map(|(w, y)| w * y).collect();
    let (sh, ch) = trig_sum(t, &wy, grid.f0, grid.df, grid.len, 1.0);
    let (s2, c2) = trig_sum(t, w, grid.f0, grid.df, grid.len, 2.0);
    let (s, c) = trig_sum(t, w, grid.f0, grid.df, grid.len, 1.0);

    (0..grid.len)
        .map(|k| {
            let tan_2wt = (s2[k] - 2.0 * s[k] * c[k]) / (c2[k] - (c[k] * c[k] - s[k] * s[k]));
            let hyp = (1.0 + tan_2wt * tan_2wt).sqrt();
            let (s2w, c2w) = if tan_2wt.is_finite() {
                (tan_2wt / hyp, 1.0 / hyp)
            } else {
                (tan_2wt.signum(), 0.0)
            };
            let cw = (0.5 * (1.0 + c2w)).sqrt();
            let sw = s2w.signum() * (0.5 * (1.0 - c2w)).sqrt();

            let yc = ch[k] * cw + sh[k] * sw;
            let ys = sh[k] * cw - ch[k] * sw;
            let cc = 0.5 * (1.0 + c2[k] * c2w + s2[k] * s2w) - (c[k] * cw + s[k] * sw).powi(2);
            let ss = 0.5 * (1.0 - c2[k] * c2w - s2[k] * s2w) - (s[k] * cw - c[k] * sw).powi(2);

            ratio(yc * yc, cc) + ratio(ys * ys, ss)
        })
        .collect()
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 1e-15 { num / den } else { 0.0 }
}

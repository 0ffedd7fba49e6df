//! # Time Series Module
//!
//! Holds the observations the rest of the crate works on and parses them
//! from plain text files.
//!
//! ## File Format
//! - One observation per line: `time value error`
//! - Columns separated by any amount of whitespace
//! - No header; blank lines are ignored

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
    /// One-sigma uncertainty of `value`.
    pub error: f64,
}

/// Errors raised while reading a data file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("line {line}: {reason}")]
    ParseError { line: usize, reason: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An ordered sequence of samples loaded from one input file.
///
/// Samples are kept in file order. Nothing here assumes they are sorted by
/// time, and duplicate times are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.error).collect()
    }

    /// Earliest observation time, `None` for an empty series.
    pub fn min_time(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.time).reduce(f64::min)
    }

    /// Times relative to the earliest observation (`T - T0`).
    ///
    /// Plots and periodogram evaluation both work on shifted times so the
    /// trigonometric sums stay well conditioned for large epochs.
    pub fn shifted_times(&self) -> Vec<f64> {
        let t0 = self.min_time().unwrap_or(0.0);
        self.samples.iter().map(|s| s.time - t0).collect()
    }

    /// Span between the earliest and latest observation.
    pub fn baseline(&self) -> f64 {
        let min = self.samples.iter().map(|s| s.time).fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().map(|s| s.time).fold(f64::NEG_INFINITY, f64::max);
        if min.is_finite() && max.is_finite() { max - min } else { 0.0 }
    }

    /// `(min, max)` of the measured values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.samples.iter().map(|s| s.value);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Writes the samples as a numbered table with a header line.
    pub fn write_table(&self, mut out: impl io::Write) -> io::Result<()> {
        writeln!(out, "{:>6} {:>16} {:>12} {:>10}", "row", "time", "value", "error")?;
        for (i, s) in self.samples.iter().enumerate() {
            writeln!(out, "{i:>6} {:>16.6} {:>12.6} {:>10.6}", s.time, s.value, s.error)?;
        }
        out.flush()
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Reads a whitespace-delimited three-column file into a [`Series`].
pub fn load(path: impl AsRef<Path>) -> Result<Series, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let series = parse(&text)?;
    log::info!("Loaded {} samples from {}", series.len(), path.display());
    Ok(series)
}

/// Parses the textual contents of a data file.
pub fn parse(text: &str) -> Result<Series, LoadError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_row(index + 1, line))
        .collect()
}

fn parse_row(line: usize, row: &str) -> Result<Sample, LoadError> {
    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(LoadError::ParseError {
            line,
            reason: format!("expected 3 columns (time value error), found {}", fields.len()),
        });
    }

    let number = |name: &str, field: &str| -> Result<f64, LoadError> {
        match field.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(LoadError::ParseError {
                line,
                reason: format!("{name} is not finite: {field:?}"),
            }),
            Err(_) => Err(LoadError::ParseError {
                line,
                reason: format!("{name} is not a number: {field:?}"),
            }),
        }
    };

    Ok(Sample {
        time: number("time", fields[0])?,
        value: number("value", fields[1])?,
        error: number("error", fields[2])?,
    })
}

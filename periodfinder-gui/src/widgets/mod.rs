//! # Widgets Module
//!
//! Canvas widgets that render the loaded series, the periodogram and the
//! folded curve.

pub mod axes;
pub mod data_table;
pub mod periodogram_plot;
pub mod series_plot;

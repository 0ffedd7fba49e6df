//! # Series Plot Widget
//!
//! Scatter plot with vertical error bars, used for both the raw light curve
//! and the curve folded on the best period.

use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::widget::container;
use iced::{mouse, Color, Element, Rectangle, Renderer, Theme};
use periodfinder_core::{FoldedCurve, Series};

use super::axes::{Axis, PlotArea};

const MARKER_RADIUS: f32 = 2.5;
const POINT_COLOR: Color = Color {
    r: 0.20,
    g: 0.60,
    b: 0.86,
    a: 1.0,
};
const ERROR_BAR_COLOR: Color = Color {
    a: 0.45,
    ..POINT_COLOR
};

/// Cycles drawn for a folded curve.
const FOLDED_CYCLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlotPoint {
    x: f64,
    y: f64,
    error: f64,
}

pub struct SeriesPlot {
    points: Vec<PlotPoint>,
    x_axis: Axis,
    y_axis: Axis,
    x_label: String,
    y_label: String,
}

impl SeriesPlot {
    /// Observations against time since the first one. The value axis is
    /// padded by 10% of the data range.
    pub fn raw(series: &Series) -> Self {
        let points: Vec<PlotPoint> = series
            .shifted_times()
            .into_iter()
            .zip(series.samples())
            .map(|(x, s)| PlotPoint {
                x,
                y: s.value,
                error: s.error,
            })
            .collect();
        let (lo, hi) = x_range(&points);
        Self {
            x_axis: Axis::padded(lo, hi, 0.02),
            y_axis: value_axis(&points, 0.1),
            points,
            x_label: "T - T0".to_string(),
            y_label: "Value".to_string(),
        }
    }

    /// Two consecutive cycles of a folded curve, value axis padded by 20%.
    pub fn folded(curve: &FoldedCurve) -> Self {
        let points: Vec<PlotPoint> = curve
            .cycles(FOLDED_CYCLES)
            .map(|p| PlotPoint {
                x: p.phase,
                y: p.value,
                error: p.error,
            })
            .collect();
        Self {
            x_axis: Axis::linear(0.0, FOLDED_CYCLES as f64),
            y_axis: value_axis(&points, 0.2),
            points,
            x_label: format!("Orbital phase for the best period P = {:.4}", curve.period),
            y_label: "Value".to_string(),
        }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fill),
        )
        .into()
    }
}

fn x_range(points: &[PlotPoint]) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.x), hi.max(p.x))
    })
}

fn value_axis(points: &[PlotPoint], padding: f64) -> Axis {
    if points.is_empty() {
        return Axis::linear(0.0, 1.0);
    }
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    Axis::padded(lo, hi, padding)
}

impl<Message> canvas::Program<Message> for SeriesPlot {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        if !bounds.width.is_finite() || !bounds.height.is_finite() {
            return vec![frame.into_geometry()];
        }

        if self.points.is_empty() {
            frame.fill_text(Text {
                content: "No data".to_string(),
                position: frame.center(),
                color: theme.palette().text,
                size: 14.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        }

        let area = PlotArea::new(bounds.size(), self.x_axis, self.y_axis);
        area.draw_frame(&mut frame, theme, &self.x_label, &self.y_label);

        for p in &self.points {
            let Some(center) = area.to_screen(p.x, p.y) else { continue };

            if p.error > 0.0 {
                let top = area.to_screen_clamped(p.x, p.y + p.error);
                let bottom = area.to_screen_clamped(p.x, p.y - p.error);
                if let (Some(top), Some(bottom)) = (top, bottom) {
                    frame.stroke(
                        &Path::line(top, bottom),
                        Stroke::default().with_width(1.0).with_color(ERROR_BAR_COLOR),
                    );
                }
            }

            frame.fill(&Path::circle(center, MARKER_RADIUS), POINT_COLOR);
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use periodfinder_core::Sample;

    fn series() -> Series {
        [(100.0, 1.0), (102.0, 3.0), (104.0, 2.0)]
            .into_iter()
            .map(|(time, value)| Sample { time, value, error: 0.1 })
            .collect()
    }

    #[test]
    fn raw_plot_starts_at_zero_and_pads_values() {
        let plot = SeriesPlot::raw(&series());
        let xs: Vec<f64> = plot.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0]);
        assert_eq!(plot.x_label, "T - T0");
        assert!((plot.y_axis.min - 0.8).abs() < 1e-12);
        assert!((plot.y_axis.max - 3.2).abs() < 1e-12);
    }

    #[test]
    fn folded_plot_shows_two_cycles() {
        let curve = periodfinder_core::phase::fold(&series(), 4.0).unwrap();
        let plot = SeriesPlot::folded(&curve);
        assert_eq!(plot.points.len(), 6);
        assert!(plot.points.iter().all(|p| (0.0..2.0).contains(&p.x)));
        assert_eq!((plot.x_axis.min, plot.x_axis.max), (0.0, 2.0));
        assert!(plot.x_label.ends_with("P = 4.0000"));
    }
}

//! # Periodogram Plot Widget
//!
//! Draws Lomb-Scargle power against trial period together with the false
//! alarm level and a dashed marker at the best period.
//!
//! ## Features
//! - Logarithmic period axis for the full search range
//! - Linear zoom around the best period
//! - Per-pixel peak decimation so multi-million point grids stay responsive

use iced::widget::canvas::{self, Frame, Geometry, LineDash, Path, Stroke, Text};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Theme};
use periodfinder_core::PeriodogramResult;

use super::axes::{Axis, PlotArea};

/// Half width of the zoomed panel relative to the best period.
pub const ZOOM_FRACTION: f64 = 0.5;

/// Periods carry whatever time unit the data file uses.
const PERIOD_LABEL: &str = "Period (in units of time used)";

const POWER_COLOR: Color = Color {
    r: 0.20,
    g: 0.60,
    b: 0.86,
    a: 1.0,
};
const LEVEL_COLOR: Color = Color {
    r: 0.86,
    g: 0.25,
    b: 0.25,
    a: 1.0,
};
const BEST_COLOR: Color = Color {
    r: 0.95,
    g: 0.75,
    b: 0.20,
    a: 1.0,
};

pub struct PeriodogramPlot {
    periods: Vec<f64>,
    power: Vec<f64>,
    best_period: f64,
    false_alarm_level: f64,
    x_label: &'static str,
    x_axis: Axis,
    y_axis: Axis,
}

impl PeriodogramPlot {
    /// The whole search range on a logarithmic period axis.
    pub fn full(result: &PeriodogramResult) -> Self {
        let periods = result.periods();
        let (lo, hi) = periods
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        Self::with_axis(result, periods, Axis::log(lo, hi))
    }

    /// Periods within [`ZOOM_FRACTION`] of the best one.
    pub fn zoomed(result: &PeriodogramResult) -> Self {
        let best = result.best_period();
        let axis = Axis::linear(best * (1.0 - ZOOM_FRACTION), best * (1.0 + ZOOM_FRACTION));
        Self::with_axis(result, result.periods(), axis)
    }

    fn with_axis(result: &PeriodogramResult, periods: Vec<f64>, x_axis: Axis) -> Self {
        let top = result.best_power.max(result.false_alarm_level).max(0.0);
        Self {
            periods,
            power: result.power.clone(),
            best_period: result.best_period(),
            false_alarm_level: result.false_alarm_level,
            x_label: PERIOD_LABEL,
            x_axis,
            y_axis: Axis::linear(0.0, (top * 1.1).clamp(0.05, 1.0)),
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

    /// Highest power per screen column, in left to right order.
    fn decimate(&self, area: &PlotArea) -> Vec<Point> {
        let columns = area.inner.width.ceil().max(1.0) as usize;
        let mut peaks: Vec<Option<f64>> = vec![None; columns];

        for (&period, &power) in self.periods.iter().zip(&self.power) {
            let Some(nx) = self.x_axis.normalize(period) else { continue };
            if !power.is_finite() {
                continue;
            }
            let column = ((nx * columns as f32) as usize).min(columns - 1);
            let peak = peaks[column].get_or_insert(power);
            *peak = peak.max(power);
        }

        peaks
            .iter()
            .enumerate()
            .filter_map(|(column, peak)| {
                let power = (*peak)?;
                let ny = self.y_axis.normalize_clamped(power)?;
                Some(Point::new(
                    area.left() + (column as f32 + 0.5),
                    area.bottom() - ny * area.inner.height,
                ))
            })
            .collect()
    }
}

impl<Message> canvas::Program<Message> for PeriodogramPlot {
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

        if !bounds.width.is_finite() || !bounds.height.is_finite() || self.power.is_empty() {
            return vec![frame.into_geometry()];
        }

        let area = PlotArea::new(bounds.size(), self.x_axis, self.y_axis);
        area.draw_frame(&mut frame, theme, self.x_label, "Lomb-Scargle Power");

        let line = self.decimate(&area);
        if line.len() > 1 {
            let path = Path::new(|builder| {
                builder.move_to(line[0]);
                for point in &line[1..] {
                    builder.line_to(*point);
                }
            });
            frame.stroke(&path, Stroke::default().with_width(1.5).with_color(POWER_COLOR));
        }

        if let Some(ny) = self.y_axis.normalize(self.false_alarm_level) {
            let y = area.bottom() - ny * area.inner.height;
            frame.stroke(
                &Path::line(Point::new(area.left(), y), Point::new(area.right(), y)),
                Stroke::default().with_width(1.5).with_color(LEVEL_COLOR),
            );
            frame.fill_text(Text {
                content: format!("FAP level {:.3}", self.false_alarm_level),
                position: Point::new(area.right() - 4.0, y - 2.0),
                color: LEVEL_COLOR,
                size: 11.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Right,
                vertical_alignment: iced::alignment::Vertical::Bottom,
                ..Text::default()
            });
        }

        if let Some(nx) = self.x_axis.normalize(self.best_period) {
            let x = area.left() + nx * area.inner.width;
            frame.stroke(
                &Path::line(Point::new(x, area.top()), Point::new(x, area.bottom())),
                Stroke {
                    line_dash: LineDash {
                        segments: &[6.0, 4.0],
                        offset: 0,
                    },
                    ..Stroke::default().with_width(1.5).with_color(BEST_COLOR)
                },
            );
            frame.fill_text(Text {
                content: format!("P = {:.4}", self.best_period),
                position: Point::new(x + 4.0, area.top() + 2.0),
                color: BEST_COLOR,
                size: 11.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Left,
                vertical_alignment: iced::alignment::Vertical::Top,
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}

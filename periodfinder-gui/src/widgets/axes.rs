//! # Plot Axes
//!
//! Shared coordinate mapping and frame drawing for the chart widgets.
//! Supports linear and base-10 logarithmic axes with "nice" tick values.

use iced::widget::canvas::{Frame, Path, Stroke, Text};
use iced::{alignment, Color, Point, Rectangle, Size, Theme};

const MARGIN_LEFT: f32 = 60.0;
const MARGIN_RIGHT: f32 = 12.0;
const MARGIN_TOP: f32 = 10.0;
const MARGIN_BOTTOM: f32 = 38.0;
const TICK_LENGTH: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    Linear,
    Log10,
}

/// A data range along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub scale: Scale,
}

impl Axis {
    pub fn linear(min: f64, max: f64) -> Self {
        Self { min, max, scale: Scale::Linear }.widened()
    }

    pub fn log(min: f64, max: f64) -> Self {
        let min = if min > 0.0 { min } else { f64::MIN_POSITIVE };
        let max = if max > min { max } else { min * 10.0 };
        Self { min, max, scale: Scale::Log10 }
    }

    /// Linear axis extended by `fraction` of the data range on both sides.
    pub fn padded(min: f64, max: f64, fraction: f64) -> Self {
        let pad = (max - min) * fraction;
        Self::linear(min - pad, max + pad)
    }

    /// Makes sure a degenerate range still spans something visible.
    fn widened(self) -> Self {
        if self.max > self.min {
            return self;
        }
        let half = if self.min == 0.0 { 0.5 } else { self.min.abs() * 0.1 };
        Self {
            min: self.min - half,
            max: self.min + half,
            ..self
        }
    }

    fn project(&self, v: f64) -> f64 {
        match self.scale {
            Scale::Linear => v,
            Scale::Log10 => v.log10(),
        }
    }

    /// Position of `v` along the axis in `[0, 1]`, `None` outside the range.
    pub fn normalize(&self, v: f64) -> Option<f32> {
        if !(v.is_finite() && v >= self.min && v <= self.max) {
            return None;
        }
        let (lo, hi) = (self.project(self.min), self.project(self.max));
        Some(((self.project(v) - lo) / (hi - lo)) as f32)
    }

    /// Like [`Axis::normalize`] but clamps out-of-range values to the edges.
    pub fn normalize_clamped(&self, v: f64) -> Option<f32> {
        if !v.is_finite() {
            return None;
        }
        self.normalize(v.clamp(self.min, self.max))
    }

    pub fn ticks(&self, target: usize) -> Vec<f64> {
        match self.scale {
            Scale::Linear => linear_ticks(self.min, self.max, target),
            Scale::Log10 => log_ticks(self.min, self.max),
        }
    }
}

fn linear_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let raw = (max - min) / target.max(1) as f64;
    if !(raw.is_finite() && raw > 0.0) {
        return vec![];
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

fn log_ticks(min: f64, max: f64) -> Vec<f64> {
    let first = min.log10().floor() as i32;
    let last = max.log10().ceil() as i32;
    let decades = (last - first).max(1);
    let mantissas: &[f64] = if decades <= 2 { &[1.0, 2.0, 5.0] } else { &[1.0] };
    (first..=last)
        .flat_map(|e| mantissas.iter().map(move |m| m * 10f64.powi(e)))
        .filter(|v| *v >= min && *v <= max)
        .collect()
}

pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e5).contains(&a) {
        format!("{v:.0e}")
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Maps data coordinates into the inner plotting rectangle of a canvas.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub inner: Rectangle,
    pub x: Axis,
    pub y: Axis,
}

impl PlotArea {
    pub fn new(size: Size, x: Axis, y: Axis) -> Self {
        let inner = Rectangle {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: (size.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (size.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        };
        Self { inner, x, y }
    }

    fn point(&self, nx: f32, ny: f32) -> Point {
        Point::new(
            self.inner.x + nx * self.inner.width,
            self.inner.y + (1.0 - ny) * self.inner.height,
        )
    }

    /// Screen position of a data point, `None` if it falls outside the axes.
    pub fn to_screen(&self, x: f64, y: f64) -> Option<Point> {
        Some(self.point(self.x.normalize(x)?, self.y.normalize(y)?))
    }

    /// Screen position with the y value clamped into the visible range.
    pub fn to_screen_clamped(&self, x: f64, y: f64) -> Option<Point> {
        Some(self.point(self.x.normalize(x)?, self.y.normalize_clamped(y)?))
    }

    pub fn left(&self) -> f32 {
        self.inner.x
    }

    pub fn right(&self) -> f32 {
        self.inner.x + self.inner.width
    }

    pub fn top(&self) -> f32 {
        self.inner.y
    }

    pub fn bottom(&self) -> f32 {
        self.inner.y + self.inner.height
    }

    /// Draws the box, tick marks, tick labels and axis captions.
    pub fn draw_frame(&self, frame: &mut Frame, theme: &Theme, x_label: &str, y_label: &str) {
        let text_color = theme.palette().text;
        let grid_color = Color { a: 0.15, ..text_color };

        frame.stroke(
            &Path::rectangle(self.inner.position(), self.inner.size()),
            Stroke::default().with_width(1.0).with_color(text_color),
        );

        for tick in self.x.ticks(6) {
            let Some(nx) = self.x.normalize(tick) else { continue };
            let x = self.inner.x + nx * self.inner.width;
            frame.stroke(
                &Path::line(Point::new(x, self.top()), Point::new(x, self.bottom())),
                Stroke::default().with_width(1.0).with_color(grid_color),
            );
            frame.stroke(
                &Path::line(
                    Point::new(x, self.bottom()),
                    Point::new(x, self.bottom() + TICK_LENGTH),
                ),
                Stroke::default().with_width(1.0).with_color(text_color),
            );
            frame.fill_text(Text {
                content: format_tick(tick),
                position: Point::new(x, self.bottom() + TICK_LENGTH + 2.0),
                color: text_color,
                size: 11.0.into(),
                horizontal_alignment: alignment::Horizontal::Center,
                vertical_alignment: alignment::Vertical::Top,
                ..Text::default()
            });
        }

        for tick in self.y.ticks(5) {
            let Some(ny) = self.y.normalize(tick) else { continue };
            let y = self.inner.y + (1.0 - ny) * self.inner.height;
            frame.stroke(
                &Path::line(Point::new(self.left(), y), Point::new(self.right(), y)),
                Stroke::default().with_width(1.0).with_color(grid_color),
            );
            frame.fill_text(Text {
                content: format_tick(tick),
                position: Point::new(self.left() - TICK_LENGTH - 2.0, y),
                color: text_color,
                size: 11.0.into(),
                horizontal_alignment: alignment::Horizontal::Right,
                vertical_alignment: alignment::Vertical::Center,
                ..Text::default()
            });
        }

        frame.fill_text(Text {
            content: x_label.to_string(),
            position: Point::new(self.inner.center_x(), self.bottom() + 20.0),
            color: text_color,
            size: 13.0.into(),
            horizontal_alignment: alignment::Horizontal::Center,
            vertical_alignment: alignment::Vertical::Top,
            ..Text::default()
        });
        frame.fill_text(Text {
            content: y_label.to_string(),
            position: Point::new(4.0, self.top()),
            color: text_color,
            size: 13.0.into(),
            horizontal_alignment: alignment::Horizontal::Left,
            vertical_alignment: alignment::Vertical::Top,
            ..Text::default()
        });
    }
}

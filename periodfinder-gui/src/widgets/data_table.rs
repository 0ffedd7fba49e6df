//! # Data Table Widget
//!
//! Lists the loaded samples as rows of time, value and error on a Canvas.
//! Rows that do not fit the panel are summarised in a footer line.

use iced::widget::canvas::{self, Frame, Geometry, Text};
use iced::widget::container;
use iced::{alignment, Element, Point, Rectangle, Renderer, Theme};
use periodfinder_core::{Sample, Series};

const HEADER_Y: f32 = 8.0;
const FIRST_ROW_Y: f32 = 30.0;
const LINE_HEIGHT: f32 = 17.0;
const PADDING: f32 = 10.0;

pub struct DataTable {
    rows: Vec<Sample>,
}

impl DataTable {
    pub fn new(series: &Series) -> Self {
        Self {
            rows: series.samples().to_vec(),
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

    /// Number of rows that fit in `height`, leaving room for the footer.
    fn visible_rows(&self, height: f32) -> usize {
        let available = ((height - FIRST_ROW_Y) / LINE_HEIGHT).floor().max(0.0) as usize;
        if available >= self.rows.len() {
            self.rows.len()
        } else {
            available.saturating_sub(1)
        }
    }
}

fn cell(content: String, x: f32, y: f32, theme: &Theme, align: alignment::Horizontal) -> Text {
    Text {
        content,
        position: Point::new(x, y),
        color: theme.palette().text,
        size: 13.0.into(),
        horizontal_alignment: align,
        vertical_alignment: alignment::Vertical::Top,
        ..Text::default()
    }
}

impl<Message> canvas::Program<Message> for DataTable {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        if self.rows.is_empty() {
            frame.fill_text(Text {
                content: "No data loaded".to_string(),
                position: frame.center(),
                color: theme.palette().text,
                size: 14.0.into(),
                horizontal_alignment: alignment::Horizontal::Center,
                vertical_alignment: alignment::Vertical::Center,
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        }

        // Right edges of the three numeric columns.
        let columns = [
            bounds.width * 0.45,
            bounds.width * 0.75,
            bounds.width - PADDING,
        ];
        let right = alignment::Horizontal::Right;

        frame.fill_text(cell("Time".into(), columns[0], HEADER_Y, theme, right));
        frame.fill_text(cell("Value".into(), columns[1], HEADER_Y, theme, right));
        frame.fill_text(cell("Error".into(), columns[2], HEADER_Y, theme, right));

        let shown = self.visible_rows(bounds.height);
        for (i, sample) in self.rows.iter().take(shown).enumerate() {
            let y = FIRST_ROW_Y + i as f32 * LINE_HEIGHT;
            frame.fill_text(cell(format!("{:.5}", sample.time), columns[0], y, theme, right));
            frame.fill_text(cell(format!("{:.4}", sample.value), columns[1], y, theme, right));
            frame.fill_text(cell(format!("{:.4}", sample.error), columns[2], y, theme, right));
        }

        if shown < self.rows.len() {
            let y = FIRST_ROW_Y + shown as f32 * LINE_HEIGHT;
            frame.fill_text(cell(
                format!("... {} more rows", self.rows.len() - shown),
                PADDING,
                y,
                theme,
                alignment::Horizontal::Left,
            ));
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: usize) -> DataTable {
        DataTable::new(
            &(0..rows)
                .map(|i| Sample {
                    time: i as f64,
                    value: 1.0,
                    error: 0.1,
                })
                .collect(),
        )
    }

    #[test]
    fn short_tables_show_every_row() {
        assert_eq!(table(3).visible_rows(200.0), 3);
    }

    #[test]
    fn long_tables_reserve_a_footer_line() {
        // (200 - 30) / 17 = 10 lines, one of them for the footer.
        assert_eq!(table(50).visible_rows(200.0), 9);
        assert_eq!(table(50).visible_rows(10.0), 0);
    }
}

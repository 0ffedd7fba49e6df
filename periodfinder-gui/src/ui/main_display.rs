//! # Main Display Module
//!
//! This module contains the window layout for the Period Finder: the plot
//! panels on the left and the control sidebar on the right.

use iced::widget::{button, column, container, pick_list, row, slider, text, text_input, Space};
use iced::{Alignment, Color, Element, Length};
use periodfinder_core::{FalseAlarmMethod, FalseAlarmPolicy, Method, Series};

use crate::widgets::{data_table, periodogram_plot, series_plot};
use crate::Message;

const INSTRUCTIONS: &str = "Open a file with three whitespace separated columns \
(time, value, error), plot the data, then compute the periodogram and fold \
the data on the best period.";

const ERROR_COLOR: Color = Color {
    r: 0.90,
    g: 0.30,
    b: 0.30,
    a: 1.0,
};

/// Configuration for a single button in the sidebar
#[derive(Debug, Clone)]
struct ButtonConfig {
    label: &'static str,
    message: Message,
    button_type: ButtonType,
}

#[derive(Debug, Clone)]
enum ButtonType {
    Standard,
    /// The main action of the window, drawn in the accent color.
    Primary,
}

const SIDEBAR_CONFIG: &[(&str, &[ButtonConfig])] = &[
    ("Data", &[
        ButtonConfig { label: "Plot data", message: Message::PlotData, button_type: ButtonType::Standard },
        ButtonConfig { label: "Print data", message: Message::PrintData, button_type: ButtonType::Standard },
    ]),
    ("Analysis", &[
        ButtonConfig { label: "Plot periodogram", message: Message::PlotPeriodogram, button_type: ButtonType::Primary },
        ButtonConfig { label: "Plot folded curve", message: Message::PlotFolded, button_type: ButtonType::Standard },
    ]),
    ("Settings", &[
        ButtonConfig { label: "Save settings", message: Message::SaveSettings, button_type: ButtonType::Standard },
        ButtonConfig { label: "Load settings", message: Message::LoadSettings, button_type: ButtonType::Standard },
    ]),
];

/// Creates the complete main application view
pub fn create_main_view(data: &crate::AppDisplayData, series: &Series) -> Element<'static, Message> {
    let raw_panel = plot_panel(
        "Data",
        data.raw_plot.as_ref().map(|s| series_plot::SeriesPlot::raw(s).view()),
        "Open a data file and press \"Plot data\"",
    );
    let folded_panel = plot_panel(
        "Folded light curve",
        data.folded_plot.as_ref().map(|c| series_plot::SeriesPlot::folded(c).view()),
        "Compute the periodogram, then press \"Plot folded curve\"",
    );
    let periodogram_panel = plot_panel(
        "Periodogram",
        data.periodogram_plot
            .as_ref()
            .map(|r| periodogram_plot::PeriodogramPlot::full(r).view()),
        "Press \"Plot periodogram\"",
    );
    let zoom_panel = plot_panel(
        "Periodogram near the best period",
        data.periodogram_plot
            .as_ref()
            .map(|r| periodogram_plot::PeriodogramPlot::zoomed(r).view()),
        "",
    );

    let plots = row![
        column![raw_panel, folded_panel].spacing(10).width(Length::Fill),
        column![periodogram_panel, zoom_panel].spacing(10).width(Length::Fill),
    ]
    .spacing(10)
    .height(Length::Fill);

    let main_content = row![
        plots,
        Space::with_width(10),
        create_sidebar(data, series),
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Wraps a plot in a titled panel, or shows `placeholder` when there is
/// nothing to draw yet.
fn plot_panel(
    title: &'static str,
    content: Option<Element<'static, Message>>,
    placeholder: &'static str,
) -> Element<'static, Message> {
    let body: Element<'static, Message> = match content {
        Some(plot) => container(plot).width(Length::Fill).height(Length::Fill).into(),
        None => container(text(placeholder).size(14))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    container(column![text(title).size(18), body].spacing(5).padding(10))
        .width(Length::Fill)
        .height(Length::FillPortion(1))
        .into()
}

fn create_sidebar(data: &crate::AppDisplayData, series: &Series) -> Element<'static, Message> {
    let mut sections = column![
        text("Lomb-Scargle Periodograms").size(22),
        text(INSTRUCTIONS).size(13),
        make_file_picker(&data.path_input),
        container(data_table::DataTable::new(series).view())
            .width(Length::Fill)
            .height(Length::Fixed(200.0)),
    ]
    .spacing(10);

    for (title, buttons) in SIDEBAR_CONFIG {
        sections = sections.push(make_button_section(title, buttons));
    }

    sections = sections.push(make_grid_controls(data));
    sections = sections.push(make_method_controls(data));

    let status_text = text(data.status.message.clone()).size(14);
    let status_text = if data.status.is_error() {
        status_text.color(ERROR_COLOR)
    } else {
        status_text
    };
    sections = sections.push(status_text);

    container(sections.padding(15))
        .width(Length::Fixed(320.0))
        .height(Length::Fill)
        .into()
}

fn make_file_picker(path: &str) -> Element<'static, Message> {
    row![
        text_input("path/to/data.txt", path)
            .on_input(Message::PathChanged)
            .on_submit(Message::OpenFile)
            .size(14)
            .padding(6),
        button(text("Open").size(14)).on_press(Message::OpenFile).padding([6, 10]),
    ]
    .spacing(5)
    .align_y(Alignment::Center)
    .into()
}

fn make_button(config: &ButtonConfig) -> Element<'static, Message> {
    let widget = button(text(config.label).size(14).width(Length::Fill))
        .padding([6, 10])
        .on_press(config.message.clone());

    match config.button_type {
        ButtonType::Standard => widget.style(button::secondary).into(),
        ButtonType::Primary => widget.style(button::primary).into(),
    }
}

fn make_button_section(title: &'static str, buttons: &[ButtonConfig]) -> Element<'static, Message> {
    let items = buttons
        .iter()
        .fold(row![].spacing(8), |r, config| r.push(make_button(config)));

    column![text(title).size(16), items].spacing(5).into()
}

/// Sliders for the frequency grid. Ranges follow the usual span of
/// ground-based photometric campaigns.
fn make_grid_controls(data: &crate::AppDisplayData) -> Element<'static, Message> {
    let grid = data.settings.grid;
    column![
        text("Frequency grid").size(16),
        text(format!("Nyquist factor: {:.0}", grid.nyquist_factor)).size(13),
        slider(1.0..=10.0, grid.nyquist_factor, Message::NyquistChanged).step(1.0),
        text(format!("Minimum period: {:.1}", grid.min_period)).size(13),
        slider(0.1..=360.0, grid.min_period, Message::MinPeriodChanged).step(0.1),
        text(format!("Maximum period: {:.0}", grid.max_period)).size(13),
        slider(10.0..=360.0, grid.max_period, Message::MaxPeriodChanged).step(1.0),
        text(format!("Samples per peak: {:.0}", grid.samples_per_peak)).size(13),
        slider(20.0..=500.0, grid.samples_per_peak, Message::SamplesPerPeakChanged).step(1.0),
    ]
    .spacing(4)
    .into()
}

fn make_method_controls(data: &crate::AppDisplayData) -> Element<'static, Message> {
    let method_row = row![
        text("Method").size(13).width(Length::Fixed(90.0)),
        pick_list(Method::ALL, Some(data.settings.method), Message::MethodSelected).text_size(13),
    ]
    .align_y(Alignment::Center);

    let false_alarm_row: Element<'static, Message> = match data.settings.false_alarm {
        FalseAlarmPolicy::Computed { probability, method } => row![
            text(format!("FAP {probability}")).size(13).width(Length::Fixed(90.0)),
            pick_list(FalseAlarmMethod::ALL, Some(method), Message::FalseAlarmMethodSelected)
                .text_size(13),
        ]
        .align_y(Alignment::Center)
        .into(),
        FalseAlarmPolicy::Fixed { level } => {
            text(format!("Fixed false alarm level: {level}")).size(13).into()
        }
    };

    column![method_row, false_alarm_row].spacing(6).into()
}

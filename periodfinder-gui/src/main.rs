//! # Period Finder - Lomb-Scargle Periodogram GUI
//!
//! Interactive front end for the period search in `periodfinder-core`.
//! A light curve is loaded from a whitespace separated text file, its
//! Lomb-Scargle periodogram is computed over a configurable frequency grid,
//! and the data are folded on the strongest period.
//!
//! ## Architecture
//! - **State**: a single `DatasetStore` owns the data, settings and result
//! - **Messages**: every UI event is turned into a core `Command`
//! - **Plots**: snapshots taken when the user asks for a plot, so moving a
//!   slider does not blank the panels

mod logger;
mod ui;
mod widgets;

use clap::Parser;
use iced::{Element, Task, Theme};
use periodfinder_core::{
    settings, Command, CommandError, DatasetStore, FalseAlarmMethod, FalseAlarmPolicy,
    FoldedCurve, Method, Outcome, PeriodogramResult, Series, Settings, Status,
};
use std::path::PathBuf;
use ui::main_display::create_main_view;

/// Command line options.
#[derive(Debug, Parser)]
#[command(name = "periodfinder", version, about = "Interactive Lomb-Scargle period search")]
struct Cli {
    /// Data file to load at startup (time, value and error per line)
    data_file: Option<PathBuf>,

    /// Settings file used by "Save settings" and "Load settings"
    #[arg(long, default_value = settings::DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,

    /// Log level: trace, debug, info, warn or error (defaults to LOG_LEVEL, then info)
    #[arg(long)]
    log_level: Option<String>,
}

pub fn main() -> iced::Result {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level.as_deref());

    log::info!("Starting Period Finder...");
    let result = iced::application(
        "Lomb-Scargle Periodograms",
        PeriodFinderApp::update,
        PeriodFinderApp::view,
    )
    .theme(PeriodFinderApp::theme)
    .window_size(iced::Size::new(1400.0, 900.0))
    .run_with(move || (PeriodFinderApp::new(cli), Task::none()));
    log::info!("Application finished with result: {result:?}");
    result
}

/// Application message types.
#[derive(Debug, Clone)]
pub enum Message {
    // File selection
    PathChanged(String),
    OpenFile,

    // Grid sliders
    NyquistChanged(f64),
    MinPeriodChanged(f64),
    MaxPeriodChanged(f64),
    SamplesPerPeakChanged(f64),

    MethodSelected(Method),
    FalseAlarmMethodSelected(FalseAlarmMethod),

    // Actions
    PlotData,
    PlotPeriodogram,
    PlotFolded,
    PrintData,

    SaveSettings,
    LoadSettings,
}

/// UI-specific data needed for rendering the interface.
#[derive(Debug, Clone, Default)]
pub struct AppDisplayData {
    pub path_input: String,
    pub status: Status,
    pub settings: Settings,

    // Snapshots shown in the plot panels
    pub raw_plot: Option<Series>,
    pub periodogram_plot: Option<PeriodogramResult>,
    pub folded_plot: Option<FoldedCurve>,
}

struct PeriodFinderApp {
    store: DatasetStore,
    settings_path: PathBuf,
    display_data: AppDisplayData,
}

impl PeriodFinderApp {
    fn new(cli: Cli) -> Self {
        let mut app = Self {
            store: DatasetStore::default(),
            settings_path: cli.settings,
            display_data: AppDisplayData::default(),
        };

        if app.settings_path.exists() {
            app.load_settings();
        } else {
            log::debug!("No settings file at {}", app.settings_path.display());
        }

        if let Some(path) = cli.data_file {
            app.display_data.path_input = path.display().to_string();
            app.run(Command::LoadFile(path));
        }

        app.sync_settings();
        app
    }

    fn update(&mut self, message: Message) {
        log::debug!("Received message: {message:?}");

        match message {
            Message::PathChanged(path) => self.display_data.path_input = path,
            Message::OpenFile => {
                let path = self.display_data.path_input.trim().to_string();
                if path.is_empty() {
                    self.display_data.status = Status::error("Error: enter the path of a data file");
                } else {
                    self.run(Command::LoadFile(PathBuf::from(path)));
                }
            }
            Message::NyquistChanged(v) => self.run(Command::SetNyquistFactor(v)),
            Message::MinPeriodChanged(v) => self.run(Command::SetMinPeriod(v)),
            Message::MaxPeriodChanged(v) => self.run(Command::SetMaxPeriod(v)),
            Message::SamplesPerPeakChanged(v) => self.run(Command::SetSamplesPerPeak(v)),
            Message::MethodSelected(method) => self.run(Command::SetMethod(method)),
            Message::FalseAlarmMethodSelected(method) => {
                let policy = match self.store.settings().false_alarm {
                    FalseAlarmPolicy::Computed { probability, .. } => {
                        FalseAlarmPolicy::Computed { probability, method }
                    }
                    fixed @ FalseAlarmPolicy::Fixed { .. } => fixed,
                };
                self.run(Command::SetFalseAlarm(policy));
            }
            Message::PlotData => self.run(Command::PlotData),
            Message::PlotPeriodogram => self.run(Command::ComputePeriodogram),
            Message::PlotFolded => self.run(Command::FoldCurve),
            Message::PrintData => self.run(Command::PrintData),
            Message::SaveSettings => self.save_settings(),
            Message::LoadSettings => self.load_settings(),
        }

        self.sync_settings();
    }

    /// Dispatches a command and refreshes the status line and plot snapshots.
    fn run(&mut self, command: Command) {
        let result = self.store.dispatch(command);
        self.display_data.status = Status::from_result(&result);
        self.apply_outcome(result);
    }

    fn apply_outcome(&mut self, result: Result<Outcome, CommandError>) {
        match result {
            Ok(Outcome::DataReady) => {
                self.display_data.raw_plot = Some(self.store.series().clone());
            }
            Ok(Outcome::PeriodogramReady { .. }) => {
                self.display_data.periodogram_plot = self.store.result().cloned();
            }
            Ok(Outcome::Folded(curve)) => self.display_data.folded_plot = Some(curve),
            Ok(_) | Err(_) => {}
        }
    }

    fn save_settings(&mut self) {
        self.display_data.status = match settings::save(self.store.settings(), &self.settings_path) {
            Ok(()) => Status::info(format!("Settings saved to {}", self.settings_path.display())),
            Err(e) => {
                log::error!("Error saving settings: {e:#}");
                Status::error(format!("Error: {e:#}"))
            }
        };
    }

    fn load_settings(&mut self) {
        match settings::load(&self.settings_path) {
            Ok(loaded) => {
                self.run(Command::ApplySettings(loaded));
                if !self.display_data.status.is_error() {
                    self.display_data.status = Status::info(format!(
                        "Settings loaded from {}",
                        self.settings_path.display()
                    ));
                }
            }
            Err(e) => {
                log::error!("Error loading settings: {e:#}");
                self.display_data.status = Status::error(format!("Error: {e:#}"));
            }
        }
    }

    fn sync_settings(&mut self) {
        self.display_data.settings = *self.store.settings();
    }

    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data, self.store.series())
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(dir: &tempfile::TempDir) -> PeriodFinderApp {
        PeriodFinderApp::new(Cli {
            data_file: None,
            settings: dir.path().join("settings.json"),
            log_level: None,
        })
    }

    #[test]
    fn actions_without_data_report_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.update(Message::PlotPeriodogram);
        assert!(app.display_data.status.is_error());
        assert_eq!(
            app.display_data.status.message,
            "Error: open the data file first!"
        );
        assert!(app.display_data.periodogram_plot.is_none());
    }

    #[test]
    fn sliders_update_mirrored_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.update(Message::MaxPeriodChanged(50.0));
        assert_eq!(app.display_data.settings.grid.max_period, 50.0);
        app.update(Message::MinPeriodChanged(60.0));
        assert!(app.display_data.status.is_error());
        assert_eq!(app.display_data.settings.grid.min_period, 60.0);
    }

    #[test]
    fn empty_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.update(Message::PathChanged("   ".into()));
        app.update(Message::OpenFile);
        assert!(app.display_data.status.is_error());
    }

    #[test]
    fn settings_round_trip_through_the_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.update(Message::SamplesPerPeakChanged(40.0));
        app.update(Message::SaveSettings);
        assert!(!app.display_data.status.is_error());

        app.update(Message::SamplesPerPeakChanged(80.0));
        app.update(Message::LoadSettings);
        assert_eq!(app.display_data.settings.grid.samples_per_peak, 40.0);
        assert!(app.display_data.status.message.starts_with("Settings loaded"));
    }

    #[test]
    fn print_data_names_standard_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.txt");
        std::fs::write(&path, "0 1 0.1\n1 2 0.1\n").unwrap();

        let mut app = app(&dir);
        app.update(Message::PathChanged(path.display().to_string()));
        app.update(Message::OpenFile);
        app.update(Message::PrintData);
        assert_eq!(
            app.display_data.status.message,
            "Printed 2 rows to standard output"
        );
    }

    #[test]
    fn plots_survive_setting_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.txt");
        let rows: String = (0..60)
            .map(|i| {
                let t = i as f64 * 0.37;
                format!("{t} {} 0.1\n", (t * 2.0).sin())
            })
            .collect();
        std::fs::write(&path, rows).unwrap();

        let mut app = app(&dir);
        app.update(Message::PathChanged(path.display().to_string()));
        app.update(Message::OpenFile);
        assert_eq!(app.display_data.status.message, "Loaded 60 samples");

        app.update(Message::PlotData);
        app.update(Message::PlotPeriodogram);
        assert!(app.display_data.periodogram_plot.is_some());
        app.update(Message::PlotFolded);
        assert!(app.display_data.folded_plot.is_some());

        app.update(Message::NyquistChanged(2.0));
        assert!(app.store.result().is_none());
        assert!(app.display_data.raw_plot.is_some());
        assert!(app.display_data.periodogram_plot.is_some());
    }
}

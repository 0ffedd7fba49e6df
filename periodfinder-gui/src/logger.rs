use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode,
};

/// Crates whose records only get through at `warn` or above.
const RENDERER_CRATES: &[&str] = &["wgpu", "naga", "cosmic_text", "iced"];

/// Initialises terminal logging.
///
/// The level comes from `level`, then the `LOG_LEVEL` environment variable,
/// and defaults to `info`. Renderer crates log their warnings and errors
/// only, and not even those when the level is stricter.
pub fn init_logger(level: Option<&str>) {
    let level = level
        .map(str::to_string)
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .map(|name| parse_level(&name))
        .unwrap_or(LevelFilter::Info);

    let mut app_config = ConfigBuilder::new();
    let mut renderer_config = ConfigBuilder::new();
    for name in RENDERER_CRATES {
        app_config.add_filter_ignore_str(name);
        renderer_config.add_filter_allow_str(name);
    }

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(level, app_config.build(), TerminalMode::Stderr, ColorChoice::Auto),
        TermLogger::new(
            renderer_level(level),
            renderer_config.build(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    ];

    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Logger was already initialised");
    }
}

fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

fn renderer_level(level: LevelFilter) -> LevelFilter {
    level.min(LevelFilter::Warn)
}

use periodfinder_core::{
    Command, CommandError, ComputeError, DatasetStore, FoldError, LoadError, Outcome, Status,
};
use std::f64::consts::PI;
use std::io::Write;
use std::path::Path;

const PERIOD: f64 = 5.3;

/// Writes an irregularly sampled sinusoid in the three-column format.
fn write_light_curve(path: &Path, n: usize) {
    let mut file = std::fs::File::create(path).unwrap();
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut uniform = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    for i in 0..n {
        let time = 2_458_000.0 + i as f64 * 1.1 + uniform();
        let noise = 0.05 * (uniform() - 0.5);
        let value = 10.0 + (2.0 * PI * time / PERIOD).sin() + noise;
        writeln!(file, "{time:.6} {value:.6} 0.05").unwrap();
    }
}

#[test]
fn missing_file_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DatasetStore::default();
    let result = store.dispatch(Command::LoadFile(dir.path().join("absent.txt")));
    assert!(matches!(
        result,
        Err(CommandError::Load(LoadError::NotFound { .. }))
    ));
    let status = Status::from_result(&result);
    assert!(status.is_error());
    assert!(status.message.starts_with("Error: data file not found"));
}

#[test]
fn load_compute_and_fold() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("star.txt");
    write_light_curve(&path, 150);

    let mut store = DatasetStore::default();
    assert_eq!(
        store.dispatch(Command::LoadFile(path.clone())).unwrap(),
        Outcome::Loaded { rows: 150 }
    );
    assert_eq!(store.source(), Some(path.as_path()));
    assert_eq!(store.dispatch(Command::PlotData).unwrap(), Outcome::DataReady);

    let before = store.dispatch(Command::FoldCurve);
    assert!(matches!(
        before,
        Err(CommandError::Fold(FoldError::PeriodUnavailable))
    ));
    assert_eq!(
        Status::from_result(&before).message,
        "Error: calculate periodogram first!"
    );

    let Outcome::PeriodogramReady {
        best_period,
        best_power,
        false_alarm_level,
    } = store.dispatch(Command::ComputePeriodogram).unwrap()
    else {
        panic!("expected a periodogram");
    };
    assert!((best_period - PERIOD).abs() < 0.02, "best period {best_period}");
    assert!(best_power > false_alarm_level);
    assert!(false_alarm_level > 0.0 && false_alarm_level < 1.0);

    let result = store.result().unwrap();
    assert_eq!(result.frequencies.len(), result.power.len());
    assert!(result.peak_false_alarm_probability < 1e-6);

    let Outcome::Folded(curve) = store.dispatch(Command::FoldCurve).unwrap() else {
        panic!("expected a folded curve");
    };
    assert_eq!(curve.points.len(), 150);
    assert_eq!(curve.epoch, 0.0);
    let first_time = store.series().samples()[0].time;
    let offset = (first_time / PERIOD).fract();
    for p in &curve.points {
        assert!((0.0..1.0).contains(&p.phase));
        let model = 10.0 + (2.0 * PI * (p.phase + offset)).sin();
        assert!((p.value - model).abs() < 0.3, "phase {} value {}", p.phase, p.value);
    }
    assert_eq!(curve.cycles(2).count(), 300);

    // Moving a slider makes the old periodogram stale.
    store.dispatch(Command::SetMinPeriod(2.0)).unwrap();
    assert!(store.result().is_none());
    assert!(matches!(
        store.dispatch(Command::FoldCurve),
        Err(CommandError::Fold(FoldError::PeriodUnavailable))
    ));
}

#[test]
fn empty_file_has_no_data_to_search() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    std::fs::write(&path, "\n\n").unwrap();

    let mut store = DatasetStore::default();
    assert_eq!(
        store.dispatch(Command::LoadFile(path)).unwrap(),
        Outcome::Loaded { rows: 0 }
    );
    assert!(matches!(
        store.dispatch(Command::ComputePeriodogram),
        Err(CommandError::Compute(ComputeError::NoData))
    ));
}

#[test]
fn inverted_period_range_fails_to_compute() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("star.txt");
    write_light_curve(&path, 40);

    let mut store = DatasetStore::default();
    store.dispatch(Command::LoadFile(path)).unwrap();
    assert!(store.dispatch(Command::SetMinPeriod(300.0)).is_err());

    let result = store.dispatch(Command::ComputePeriodogram);
    assert!(matches!(
        result,
        Err(CommandError::Compute(ComputeError::InvalidConfig(_)))
    ));
}

#[test]
fn malformed_rows_are_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "1 2 0.1\n2 x 0.1\n").unwrap();

    let mut store = DatasetStore::default();
    assert!(matches!(
        store.dispatch(Command::LoadFile(path)),
        Err(CommandError::Load(LoadError::ParseError { line: 2, .. }))
    ));
    assert!(store.series().is_empty());
}

#[test]
fn astronomically_long_baseline_is_rejected_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.txt");
    std::fs::write(&path, "0 1 0.1\n1e18 2 0.1\n2e18 1.5 0.1\n").unwrap();

    let mut store = DatasetStore::default();
    store.dispatch(Command::LoadFile(path)).unwrap();
    let result = store.dispatch(Command::ComputePeriodogram);
    assert!(matches!(
        result,
        Err(CommandError::Compute(ComputeError::GridTooLarge { .. }))
    ));
    assert!(Status::from_result(&result).is_error());
    assert!(store.result().is_none());
}

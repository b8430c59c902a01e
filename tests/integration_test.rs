use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tempviz::config::{ConfigTree, Environment, Paths};
use tempviz::data::{generate_and_save_data, generate_temperature_data, load_csv, GeneratorSettings};
use tempviz::suite::{jobs_for, render_chart, run_jobs, ChartArgs};
use tempviz::{ArtifactBody, ChartKind, ChartOptions, Flavor, GroupBy, TimeGranularity, VizError};

/// Overrides that keep every static render small.
fn small_static_overrides() -> HashMap<ChartKind, ConfigTree> {
    ChartKind::ALL
        .iter()
        .filter(|kind| kind.flavor() == Flavor::Static)
        .map(|&kind| {
            (
                kind,
                ConfigTree::from_json(json!({"figure": {"dpi": 20}, "output": {"save_dpi": null}})).unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_full_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let env = Environment::initialize(Paths::under(temp_dir.path())).unwrap();

    // Generate, persist and reload the data set
    let generated = generate_and_save_data(&env.paths.data_path, 42).unwrap();
    let series = load_csv(&env.paths.data_path).unwrap();
    assert_eq!(series.len(), 365 * 24);
    assert_eq!(series.readings[0].timestamp, generated.readings[0].timestamp);
    for (loaded, original) in series.iter().zip(generated.iter()).take(48) {
        assert!((loaded.temperature - original.temperature).abs() < 1e-6);
    }

    // Render every kind into the environment's directories
    let jobs = jobs_for(
        &ChartKind::ALL,
        &small_static_overrides(),
        &env,
        ChartArgs::default(),
        false,
    )
    .unwrap();
    let outcomes = run_jobs(Arc::new(series), jobs).await;
    assert_eq!(outcomes.len(), ChartKind::ALL.len());

    for outcome in outcomes {
        let artifact = outcome.result.unwrap();
        let path = artifact.path.clone().unwrap();
        let expected_dir = match outcome.kind.flavor() {
            Flavor::Static => &env.paths.static_output,
            Flavor::Interactive => &env.paths.interactive_output,
        };
        assert_eq!(path.parent(), Some(expected_dir.as_path()), "{}", outcome.kind);
        assert_eq!(
            path.extension().and_then(|e| e.to_str()),
            Some(outcome.kind.flavor().extension())
        );
        assert!(fs::metadata(&path).unwrap().len() > 0);
        assert!(!artifact.show);
    }
}

#[test]
fn test_static_artifacts_match_their_files() {
    let temp_dir = TempDir::new().unwrap();
    let series = generate_temperature_data(&GeneratorSettings {
        hours: 24 * 30,
        ..GeneratorSettings::default()
    })
    .unwrap();
    let options = ChartOptions::new().config(
        ConfigTree::from_json(json!({
            "figure": {"dpi": 20},
            "output": {"save_path": temp_dir.path().to_str().unwrap(), "filename": "trend", "save_dpi": null}
        }))
        .unwrap(),
    );

    let artifact = render_chart(ChartKind::StaticLine, &series, &ChartArgs::default(), &options).unwrap();
    let ArtifactBody::Raster { width, height, .. } = artifact.body else {
        panic!("static chart should be a raster");
    };
    let written = image::open(temp_dir.path().join("trend.png")).unwrap();
    assert_eq!((written.width(), written.height()), (width, height));
}

#[test]
fn test_categorical_arguments_fail_fast() {
    assert!(matches!(
        "weekly".parse::<GroupBy>(),
        Err(VizError::InvalidParameter { .. })
    ));
    assert!(matches!(
        "minute".parse::<TimeGranularity>(),
        Err(VizError::InvalidParameter { .. })
    ));

    let series = generate_temperature_data(&GeneratorSettings {
        hours: 48,
        ..GeneratorSettings::default()
    })
    .unwrap();
    let options = ChartOptions::new().set("heatmap", ConfigTree::from_json(json!({"cmap": "rainbow"})).unwrap());
    let err = render_chart(ChartKind::StaticCalendar, &series, &ChartArgs::default(), &options).unwrap_err();
    assert!(matches!(err, VizError::InvalidParameter { ref name, .. } if name == "cmap"));
}

#[test]
fn test_missing_csv_column_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.csv");
    fs::write(&path, "time,temperature\n2024-01-01 00:00:00,1.0\n").unwrap();
    match load_csv(&path) {
        Err(VizError::MissingColumn(column)) => assert_eq!(column, "timestamp"),
        other => panic!("unexpected result: {other:?}"),
    }
}

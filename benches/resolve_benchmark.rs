/// Benchmark module for configuration resolution and chart rendering.
/// Measures the layered deep merge and the cost of producing artifacts.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use tempviz::config::{defaults, deep_merge, resolve, ChartOptions, ConfigTree};
use tempviz::data::{generate_temperature_data, GeneratorSettings};
use tempviz::interactive::create_interactive_line;
use tempviz::plotting::create_line_plot;
use tempviz::ChartKind;

/// Build an override tree touching every section of the static line chart
///
/// # Returns
/// * `ConfigTree` - Partial tree with one leaf changed per section
fn line_overrides() -> ConfigTree {
    ConfigTree::from_json(json!({
        "figure": {"dpi": 100},
        "line": {"color": "#d62728", "marker": "o"},
        "axis": {"date_format": "%m-%d", "grid_style": {"alpha": 0.2}},
        "text": {"title": "Benchmark"},
        "legend": {"show": true, "label": "series"},
        "output": {"filename": "bench"}
    }))
    .unwrap()
}

/// Benchmark configuration resolution
/// Tests the registry lookup and both merge stages
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("configuration_resolution");
    let overrides = line_overrides();
    let keywords = ConfigTree::new().with("line", ConfigTree::from_json(json!({"linewidth": 2.0})).unwrap());

    group.bench_function("resolve_defaults_only", |b| {
        b.iter(|| resolve(black_box(defaults(ChartKind::StaticLine)), None, &ConfigTree::new()))
    });

    group.bench_function("resolve_with_overrides_and_keywords", |b| {
        b.iter(|| resolve(defaults(ChartKind::StaticLine), Some(black_box(&overrides)), &keywords))
    });

    group.bench_function("deep_merge_flat_tree", |b| {
        let overlay = ConfigTree::from_json(json!({"title": "x", "vmin": -5, "range_colors": ["#000", "#fff"]})).unwrap();
        b.iter(|| deep_merge(defaults(ChartKind::InteractiveCalendar), black_box(&overlay)))
    });

    group.bench_function("resolve_every_kind", |b| {
        let options = ChartOptions::new().config(overrides.clone());
        b.iter(|| {
            for kind in ChartKind::ALL {
                black_box(options.resolve(kind));
            }
        })
    });

    group.finish();
}

/// Benchmark chart production over a full year of readings
/// Tests one static and one interactive producer without writing files
///
/// # Arguments
/// * `c` - Criterion benchmark configuration
fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    group.sample_size(10);
    let series = generate_temperature_data(&GeneratorSettings::default()).unwrap();

    group.bench_function("static_line_low_dpi", |b| {
        let options = ChartOptions::new().set("figure", ConfigTree::from_json(json!({"dpi": 40})).unwrap());
        b.iter(|| create_line_plot(black_box(&series), &options).unwrap())
    });

    group.bench_function("interactive_line", |b| {
        let options = ChartOptions::new();
        b.iter(|| create_interactive_line(black_box(&series), &options).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_resolution, bench_rendering);
criterion_main!(benches);

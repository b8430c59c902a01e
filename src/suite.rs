//! Batch rendering.
//!
//! A [`ChartJob`] pairs a chart kind with its options and arguments. Jobs run
//! on the blocking pool, at most a few at a time, since every static render
//! holds a full-size pixel buffer. The registry is the only shared state and
//! it is read-only.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde_json::json;
use tokio::sync::Semaphore;
use tokio::task::spawn_blocking;

use crate::config::{ChartOptions, ConfigTree, Environment};
use crate::error::{VizError, VizResult};
use crate::interactive::{
    create_interactive_calendar, create_interactive_heatmap, create_interactive_line, create_interactive_surface,
};
use crate::plotting::{
    create_3d_surface, create_area_plot, create_box_plot, create_calendar_heatmap, create_heatmap, create_line_plot,
};
use crate::types::{ChartArtifact, ChartKind, Flavor, GroupBy, TemperatureSeries, TimeGranularity};
use crate::utils::resample_daily_mean;

/// Categorical arguments some producers take. Producers that do not need
/// an argument ignore it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartArgs {
    pub group_by: GroupBy,
    pub granularity: TimeGranularity,
    pub year: i32,
}

impl Default for ChartArgs {
    fn default() -> Self {
        Self {
            group_by: GroupBy::Month,
            granularity: TimeGranularity::Hour,
            year: 2024,
        }
    }
}

/// Which projection of the hourly series a job plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesInput {
    Hourly,
    DailyMean,
}

#[derive(Debug, Clone)]
pub struct ChartJob {
    pub kind: ChartKind,
    pub input: SeriesInput,
    pub args: ChartArgs,
    pub options: ChartOptions,
}

impl ChartJob {
    pub fn new(kind: ChartKind, options: ChartOptions) -> Self {
        Self {
            kind,
            input: SeriesInput::Hourly,
            args: ChartArgs::default(),
            options,
        }
    }

    pub fn daily(mut self) -> Self {
        self.input = SeriesInput::DailyMean;
        self
    }

    pub fn args(mut self, args: ChartArgs) -> Self {
        self.args = args;
        self
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub kind: ChartKind,
    pub result: VizResult<ChartArtifact>,
}

/// Render one chart of `kind`.
pub fn render_chart(
    kind: ChartKind,
    series: &TemperatureSeries,
    args: &ChartArgs,
    options: &ChartOptions,
) -> VizResult<ChartArtifact> {
    match kind {
        ChartKind::StaticArea => create_area_plot(series, options),
        ChartKind::StaticBox => create_box_plot(series, args.group_by, options),
        ChartKind::StaticCalendar => create_calendar_heatmap(series, args.year, options),
        ChartKind::StaticHeatmap => create_heatmap(series, args.granularity, options),
        ChartKind::StaticLine => create_line_plot(series, options),
        ChartKind::StaticSurface => create_3d_surface(series, args.year, options),
        ChartKind::InteractiveCalendar => create_interactive_calendar(series, args.year, options),
        ChartKind::InteractiveHeatmap => create_interactive_heatmap(series, args.granularity, options),
        ChartKind::InteractiveLine => create_interactive_line(series, options),
        ChartKind::InteractiveSurface => create_interactive_surface(series, args.year, options),
    }
}

/// Override tree that points a chart's output at the environment's directory.
pub fn output_location(kind: ChartKind, env: &Environment) -> VizResult<ConfigTree> {
    let value = match kind.flavor() {
        Flavor::Static => json!({"output": {"save_path": env.paths.static_output.display().to_string()}}),
        Flavor::Interactive => json!({"output_path": env.paths.interactive_output.display().to_string()}),
    };
    ConfigTree::from_json(value)
}

/// One job per kind, writing under the environment's output directories.
///
/// A tree in `overrides` is merged over the output location, so it may
/// redirect or disable saving.
pub fn jobs_for(
    kinds: &[ChartKind],
    overrides: &HashMap<ChartKind, ConfigTree>,
    env: &Environment,
    args: ChartArgs,
    show: bool,
) -> VizResult<Vec<ChartJob>> {
    kinds
        .iter()
        .map(|&kind| {
            let mut config = output_location(kind, env)?;
            if let Some(tree) = overrides.get(&kind) {
                config.merge_from(tree);
            }
            let options = ChartOptions::new()
                .config(config)
                .font(env.font_family.clone())
                .show(show);
            Ok(ChartJob::new(kind, options).args(args))
        })
        .collect()
}

fn tree(value: serde_json::Value) -> VizResult<ConfigTree> {
    ConfigTree::from_json(value)
}

/// The demonstration run: every kind with its own customisation.
///
/// `show` gates the static charts that ask to be displayed.
pub fn showcase_jobs(env: &Environment, show: bool) -> VizResult<Vec<ChartJob>> {
    let static_dir = env.paths.static_output.display().to_string();
    let interactive_dir = env.paths.interactive_output.display().to_string();
    let font = env.font_family.as_str();

    let jobs = vec![
        ChartJob::new(
            ChartKind::StaticArea,
            ChartOptions::new().config(tree(json!({
                "output": {"save_path": static_dir},
                "text": {"title": "Daily Mean Temperature, 2024"}
            }))?),
        )
        .daily(),
        ChartJob::new(
            ChartKind::StaticBox,
            ChartOptions::new()
                .config(tree(json!({
                    "text": {"title": "Monthly Temperature Distribution, 2024", "title_fontsize": 20},
                    "box": {"facecolor": "#2c7fb8", "flier_color": "#ff7f0e"},
                    "output": {"save_path": static_dir, "filename": "monthly_temperature_box"}
                }))?)
                .set("box", tree(json!({"widths": 0.8}))?)
                .show(show),
        ),
        ChartJob::new(
            ChartKind::StaticCalendar,
            ChartOptions::new()
                .config(tree(json!({
                    "heatmap": {"cmap": "RdYlBu_r", "vmin": -15, "vmax": 45},
                    "output": {"save_path": static_dir, "filename": "2024_temperature_calendar"}
                }))?)
                .show(show),
        ),
        ChartJob::new(
            ChartKind::StaticHeatmap,
            ChartOptions::new()
                .config(tree(json!({
                    "heatmap": {
                        "cmap_colors": ["#006837", "#1a9850", "#a6d96a", "#fdae61", "#d7191c"],
                        "vmin": -10,
                        "vmax": 35
                    },
                    "output": {"save_path": static_dir, "filename": "hourly_heatmap"}
                }))?)
                .set("text", tree(json!({"title": "Hourly Temperature Heatmap, 2024"}))?)
                .show(show),
        ),
        ChartJob::new(
            ChartKind::StaticLine,
            ChartOptions::new()
                .config(tree(json!({
                    "text": {
                        "title": "Temperature Trend, 2024",
                        "title_fontsize": 18,
                        "label_fontsize": 14,
                        "tick_fontsize": 12
                    },
                    "axis": {
                        "xlabel": "Date",
                        "ylabel": "Temperature (°C)",
                        "date_format": "%m-%d",
                        "rotation": 30
                    },
                    "line": {"color": "#d62728", "marker": "o", "markersize": 3},
                    "legend": {"show": true, "label": "Daily mean", "loc": "upper left"},
                    "output": {"save_path": static_dir, "filename": "custom_temperature_trend"}
                }))?)
                .set("figure", tree(json!({"dpi": 400}))?)
                .set("line", tree(json!({"linewidth": 2.0}))?)
                .show(show),
        )
        .daily(),
        ChartJob::new(
            ChartKind::StaticSurface,
            ChartOptions::new()
                .config(tree(json!({
                    "surface": {"cmap": "viridis", "elevation": 30, "azimuth": -135},
                    "output": {"save_path": static_dir, "filename": "3d_temp_surface_mat"}
                }))?)
                .show(show),
        ),
        ChartJob::new(
            ChartKind::InteractiveCalendar,
            ChartOptions::new().config(tree(json!({
                "output_path": interactive_dir,
                "range_colors": ["#f7fbff", "#c6dbef", "#6baed6", "#2171b5", "#08306b"]
            }))?),
        ),
        ChartJob::new(
            ChartKind::InteractiveHeatmap,
            ChartOptions::new().config(tree(json!({
                "output_path": interactive_dir,
                "visualmap_colors": [
                    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8",
                    "#fee090", "#fdae61", "#f46d43", "#d73027", "#a50026"
                ],
                "tooltip_formatter": "Temperature: {c} °C<br/>Day: {b}<br/>Hour: {a}"
            }))?),
        ),
        ChartJob::new(
            ChartKind::InteractiveLine,
            ChartOptions::new().config(tree(json!({
                "output_path": interactive_dir,
                "width": "1800px",
                "height": "900px",
                "datazoom_range_start": 20,
                "datazoom_range_end": 80
            }))?),
        ),
        ChartJob::new(
            ChartKind::InteractiveSurface,
            ChartOptions::new().config(tree(json!({
                "output_path": interactive_dir,
                "range_colors": ["#006837", "#1a9850", "#a6d96a", "#fdae61", "#d7191c"]
            }))?),
        ),
    ];

    Ok(jobs
        .into_iter()
        .map(|mut job| {
            job.options = job.options.font(font);
            job
        })
        .collect())
}

/// Number of renders allowed to run at once.
fn render_task_count() -> usize {
    (num_cpus::get() / 2).max(1)
}

/// Run `jobs` concurrently against `hourly` and return one outcome per job,
/// in job order. A failing job does not stop the others.
pub async fn run_jobs(hourly: Arc<TemperatureSeries>, jobs: Vec<ChartJob>) -> Vec<JobOutcome> {
    let daily = if jobs.iter().any(|job| job.input == SeriesInput::DailyMean) {
        Arc::new(resample_daily_mean(&hourly))
    } else {
        Arc::new(TemperatureSeries::default())
    };
    let semaphore = Arc::new(Semaphore::new(render_task_count()));

    let tasks = jobs.into_iter().map(|job| {
        let series = match job.input {
            SeriesInput::Hourly => Arc::clone(&hourly),
            SeriesInput::DailyMean => Arc::clone(&daily),
        };
        let semaphore = Arc::clone(&semaphore);

        async move {
            let kind = job.kind;
            let start_time = Instant::now();
            let result = match semaphore.acquire_owned().await {
                Ok(permit) => spawn_blocking(move || {
                    let _permit = permit;
                    render_chart(job.kind, &series, &job.args, &job.options)
                })
                .await
                .unwrap_or_else(|e| Err(VizError::Render(format!("render task failed: {}", e)))),
                Err(e) => Err(VizError::Render(format!("failed to acquire render slot: {}", e))),
            };

            let elapsed_ms = start_time.elapsed().as_millis() as u64;
            match &result {
                Ok(artifact) => tracing::info!(chart = %kind, elapsed_ms, path = ?artifact.path, "rendered"),
                Err(e) => tracing::error!(chart = %kind, elapsed_ms, error = %e, "render failed"),
            }
            JobOutcome { kind, result }
        }
    });

    join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigValue, Paths};
    use crate::data::{generate_temperature_data, GeneratorSettings};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn env(temp_dir: &TempDir) -> Environment {
        Environment::initialize(Paths::under(temp_dir.path())).unwrap()
    }

    #[test]
    fn test_showcase_covers_every_kind_once() {
        let temp_dir = TempDir::new().unwrap();
        let jobs = showcase_jobs(&env(&temp_dir), true).unwrap();
        let mut kinds: Vec<ChartKind> = jobs.iter().map(|job| job.kind).collect();
        kinds.sort();
        assert_eq!(kinds, ChartKind::ALL.to_vec());

        let daily: Vec<ChartKind> = jobs
            .iter()
            .filter(|job| job.input == SeriesInput::DailyMean)
            .map(|job| job.kind)
            .collect();
        assert_eq!(daily, vec![ChartKind::StaticArea, ChartKind::StaticLine]);
    }

    #[test]
    fn test_showcase_box_layers_keyword_over_config() {
        let temp_dir = TempDir::new().unwrap();
        let jobs = showcase_jobs(&env(&temp_dir), true).unwrap();
        let job = jobs.iter().find(|job| job.kind == ChartKind::StaticBox).unwrap();
        let resolved = job.options.resolve(ChartKind::StaticBox);

        assert_eq!(resolved.get_path("box.widths"), Some(&ConfigValue::Float(0.8)));
        assert_eq!(resolved.get_path("box.facecolor"), Some(&ConfigValue::from("#2c7fb8")));
        assert_eq!(resolved.get_path("text.title_fontsize"), Some(&ConfigValue::Int(20)));
        assert_eq!(resolved.get_path("output.filename"), Some(&ConfigValue::from("monthly_temperature_box")));
        assert!(job.options.wants_display());
    }

    #[test]
    fn test_showcase_can_suppress_display() {
        let temp_dir = TempDir::new().unwrap();
        let jobs = showcase_jobs(&env(&temp_dir), false).unwrap();
        assert!(jobs.iter().all(|job| !job.options.wants_display()));
    }

    #[test]
    fn test_jobs_for_lets_overrides_win_over_location() {
        let temp_dir = TempDir::new().unwrap();
        let env = env(&temp_dir);
        let mut overrides = HashMap::new();
        overrides.insert(
            ChartKind::StaticLine,
            tree(json!({"output": {"filename": "mine"}})).unwrap(),
        );
        overrides.insert(
            ChartKind::InteractiveLine,
            tree(json!({"output_path": null})).unwrap(),
        );

        let kinds = [ChartKind::StaticLine, ChartKind::InteractiveLine];
        let jobs = jobs_for(&kinds, &overrides, &env, ChartArgs::default(), false).unwrap();

        let line = jobs[0].options.resolve(ChartKind::StaticLine);
        assert_eq!(line.get_path("output.filename"), Some(&ConfigValue::from("mine")));
        assert_eq!(
            line.get_path("output.save_path"),
            Some(&ConfigValue::from(env.paths.static_output.display().to_string()))
        );
        let page = jobs[1].options.resolve(ChartKind::InteractiveLine);
        assert_eq!(page.get("output_path"), Some(&ConfigValue::Null));
    }

    #[test]
    fn test_empty_series_fails_without_stopping_the_batch() {
        let temp_dir = TempDir::new().unwrap();
        let env = env(&temp_dir);
        let kinds = [ChartKind::InteractiveLine, ChartKind::InteractiveHeatmap];
        let jobs = jobs_for(&kinds, &HashMap::new(), &env, ChartArgs::default(), false).unwrap();

        let outcomes = tokio_test::block_on(run_jobs(Arc::new(TemperatureSeries::default()), jobs));
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.result, Err(VizError::EmptySeries(_)))));
    }

    #[tokio::test]
    async fn test_run_jobs_reports_each_outcome_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let env = env(&temp_dir);
        let series = generate_temperature_data(&GeneratorSettings {
            hours: 24 * 10,
            ..GeneratorSettings::default()
        })
        .unwrap();

        let kinds = [
            ChartKind::InteractiveLine,
            ChartKind::InteractiveSurface,
            ChartKind::InteractiveCalendar,
        ];
        let mut jobs = jobs_for(&kinds, &HashMap::new(), &env, ChartArgs::default(), false).unwrap();
        jobs[1].args.year = 1999;
        jobs[2] = jobs[2].clone().daily();

        let outcomes = run_jobs(Arc::new(series), jobs).await;
        let order: Vec<ChartKind> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(order, kinds.to_vec());
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(VizError::EmptySeries(_))));

        let calendar = outcomes[2].result.as_ref().unwrap();
        assert_eq!(
            calendar.path.as_deref(),
            Some(env.paths.interactive_output.join("pye_calendar_heatmap.html").as_path())
        );
    }
}

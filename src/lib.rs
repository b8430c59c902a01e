//! # Temperature Visualization Library
//!
//! `tempviz` synthesizes a year of hourly temperature readings and renders
//! them through ten chart kinds: area, box, calendar heatmap, grid heatmap,
//! line and 3-D surface, each as a static PNG and (except area and box) as an
//! interactive ECharts HTML page.
//!
//! Every chart's parameters come from a layered configuration: the registry
//! default for its kind, an optional override tree, and keyword overrides,
//! deep-merged in that order. The registry is never written to.
//!
//! ## Features
//!
//! - Seeded synthetic data and CSV input/output
//! - Per-kind default configurations with deep-merge overrides
//! - Static rendering with `plotters`, interactive pages with ECharts
//! - Concurrent batch rendering of many charts
//! - A desktop viewer for rendered charts
//!
//! ## Example
//!
//! ```no_run
//! use tempviz::config::{ChartOptions, ConfigTree};
//! use tempviz::data::{generate_temperature_data, GeneratorSettings};
//! use tempviz::plotting::create_line_plot;
//! use serde_json::json;
//!
//! let series = generate_temperature_data(&GeneratorSettings::default())?;
//! let options = ChartOptions::new()
//!     .config(ConfigTree::from_json(json!({"output": {"save_path": "outputs/static"}}))?)
//!     .set("line", ConfigTree::from_json(json!({"color": "#d62728"}))?);
//! let artifact = create_line_plot(&series, &options)?;
//! println!("wrote {:?}", artifact.path);
//! # Ok::<(), tempviz::VizError>(())
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod interactive;
pub mod plotting;
pub mod suite;
pub mod telemetry;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use config::{ChartOptions, ConfigTree, ConfigValue, Environment, Paths};
pub use error::{VizError, VizResult};
pub use types::{ArtifactBody, ChartArtifact, ChartKind, Flavor, GroupBy, Reading, TemperatureSeries, TimeGranularity};

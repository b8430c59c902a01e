pub mod generator;
pub mod loader;

pub use generator::{generate_temperature_data, GeneratorSettings, DEFAULT_SEED};
pub use loader::{load_csv, load_csv_with_columns, read_csv, save_csv, write_csv};

use std::path::Path;

use crate::error::VizResult;
use crate::types::TemperatureSeries;

/// Generate the default synthetic series with `seed` and save it to `path`.
pub fn generate_and_save_data(path: impl AsRef<Path>, seed: u64) -> VizResult<TemperatureSeries> {
    let series = generate_temperature_data(&GeneratorSettings::with_seed(seed))?;
    save_csv(&series, path)?;
    Ok(series)
}

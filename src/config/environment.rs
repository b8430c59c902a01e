//! Process environment: where data and artifacts live, and the font used by
//! the static renderers.
//!
//! Nothing here runs on import. The entry point calls
//! [`Environment::initialize`] once; calling it again is harmless.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::VizResult;

/// Directory layout rooted at a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub base_dir: PathBuf,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub static_output: PathBuf,
    pub interactive_output: PathBuf,
}

impl Paths {
    pub fn under(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let output_dir = base_dir.join("outputs");
        Self {
            data_path: base_dir.join("data").join("temperature_data.csv"),
            static_output: output_dir.join("static"),
            interactive_output: output_dir.join("interactive"),
            output_dir,
            base_dir,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Environment {
    pub paths: Paths,
    pub font_family: String,
}

impl Environment {
    pub const DEFAULT_FONT: &'static str = "sans-serif";

    /// Create every directory the run writes into and return the environment.
    pub fn initialize(paths: Paths) -> VizResult<Self> {
        if let Some(data_dir) = paths.data_path.parent() {
            fs::create_dir_all(data_dir)?;
        }
        fs::create_dir_all(&paths.static_output)?;
        fs::create_dir_all(&paths.interactive_output)?;
        tracing::debug!(base = %paths.base_dir.display(), "environment initialized");

        Ok(Self {
            paths,
            font_family: Self::DEFAULT_FONT.to_string(),
        })
    }

    pub fn with_font(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let env = Environment::initialize(Paths::under(temp_dir.path())).unwrap();

        assert!(env.paths.static_output.is_dir());
        assert!(env.paths.interactive_output.is_dir());
        assert!(env.paths.data_path.parent().unwrap().is_dir());
        assert_eq!(env.font_family, Environment::DEFAULT_FONT);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::under(temp_dir.path());
        Environment::initialize(paths.clone()).unwrap();
        fs::write(paths.static_output.join("keep.png"), b"x").unwrap();

        Environment::initialize(paths.clone()).unwrap();
        assert!(paths.static_output.join("keep.png").exists());
    }
}

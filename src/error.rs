//! Error type shared by the configuration, data and rendering layers.

use thiserror::Error;

pub type VizResult<T> = Result<T, VizError>;

#[derive(Debug, Error)]
pub enum VizError {
    /// A categorical argument (group-by mode, granularity, colour map...) is not recognised.
    #[error("invalid value for `{name}`: {message}")]
    InvalidParameter { name: String, message: String },

    /// A leaf the renderer reads is absent from the resolved configuration.
    #[error("missing configuration key `{path}`")]
    MissingKey { path: String },

    /// A configuration leaf has the wrong shape for the renderer that reads it.
    #[error("configuration key `{path}` must be {expected}")]
    ConfigType { path: String, expected: &'static str },

    #[error("input is missing required column `{0}`")]
    MissingColumn(String),

    #[error("cannot parse timestamp `{0}`")]
    Timestamp(String),

    #[error("no data to plot: {0}")]
    EmptySeries(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("viewer failed: {0}")]
    Viewer(String),

    #[error("statistics error: {0}")]
    Stats(String),
}

impl VizError {
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for VizError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        VizError::Render(e.to_string())
    }
}

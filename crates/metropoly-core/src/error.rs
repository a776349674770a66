use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported data file extension: {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("Property data is missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("Property record #{index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("Property record #{index} has invalid {field}: {value:?}")]
    InvalidField {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Invalid property JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid property CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid spreadsheet: {message}")]
    Spreadsheet { message: String },

    #[error("Invalid board config: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid board manifest: {message}")]
    InvalidManifest { message: String },

    #[error("Palette parse error: {message}")]
    Palette { message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
